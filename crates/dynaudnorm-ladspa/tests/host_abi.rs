//! End-to-end host simulation with the bundled engine.
//!
//! Loads descriptors through `ladspa_descriptor`, drives them only through
//! the C function pointers, and checks the audio that comes back.
#![allow(unsafe_code)]

use dynaudnorm_ladspa::{ControlPort, ffi, ladspa_descriptor};

const SAMPLE_RATE: usize = 8000;
const BLOCK: usize = 256;

fn sine(freq: f32, amplitude: f32, len: usize, phase: usize) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let t = (n + phase) as f32 / SAMPLE_RATE as f32;
            amplitude * (std::f32::consts::TAU * freq * t).sin()
        })
        .collect()
}

fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0_f32, |a, &s| a.max(s.abs()))
}

/// Host-side control block with short frames so the test stays fast.
fn controls() -> [f32; 9] {
    let mut c = [0.0_f32; 9];
    for port in ControlPort::ALL {
        c[port.index()] = port.range().default as f32;
    }
    c[ControlPort::FrameLength.index()] = 20.0;
    c[ControlPort::FilterSize.index()] = 5.0;
    c
}

struct Host {
    desc: &'static ffi::Descriptor,
    handle: ffi::Handle,
}

impl Host {
    fn new(index: usize) -> Self {
        let ptr = ladspa_descriptor(index as _);
        assert!(!ptr.is_null());
        // SAFETY: registry descriptors live until unload.
        let desc = unsafe { &*ptr };
        // SAFETY: valid descriptor from the registry.
        let handle = unsafe { (desc.instantiate.unwrap())(desc, SAMPLE_RATE as _) };
        assert!(!handle.is_null());
        Self { desc, handle }
    }

    /// # Safety
    ///
    /// `data` must stay valid while connected.
    unsafe fn connect(&self, port: usize, data: *mut f32) {
        // SAFETY: forwarded contract.
        unsafe { (self.desc.connect_port.unwrap())(self.handle, port as _, data) }
    }

    fn activate(&self) {
        // SAFETY: connected pointers are kept alive by the test.
        unsafe { (self.desc.activate.unwrap())(self.handle) }
    }

    fn run(&self, frames: usize) {
        // SAFETY: connected buffers hold at least `frames` samples.
        unsafe { (self.desc.run.unwrap())(self.handle, frames as _) }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        // SAFETY: handle from `instantiate`, released exactly once.
        unsafe {
            (self.desc.deactivate.unwrap())(self.handle);
            (self.desc.cleanup.unwrap())(self.handle);
        }
    }
}

#[test]
fn stereo_quiet_sine_is_amplified() {
    let host = Host::new(1);
    let mut ctl = controls();
    let mut in_l = vec![0.0_f32; BLOCK];
    let mut in_r = vec![0.0_f32; BLOCK];
    let mut out_l = vec![0.0_f32; BLOCK];
    let mut out_r = vec![0.0_f32; BLOCK];

    // SAFETY: all buffers outlive `host`.
    unsafe {
        for (i, value) in ctl.iter_mut().enumerate() {
            host.connect(i, value);
        }
        host.connect(9, in_l.as_mut_ptr());
        host.connect(10, out_l.as_mut_ptr());
        host.connect(11, in_r.as_mut_ptr());
        host.connect(12, out_r.as_mut_ptr());
    }
    host.activate();

    let mut collected = Vec::new();
    for block in 0..40 {
        in_l.copy_from_slice(&sine(220.0, 0.05, BLOCK, block * BLOCK));
        in_r.copy_from_slice(&sine(330.0, 0.05, BLOCK, block * BLOCK));
        host.run(BLOCK);
        assert!(out_l.iter().chain(&out_r).all(|s| s.is_finite()));
        collected.extend_from_slice(&out_l);
    }

    // Output lags input by the primed delay (160 * 5 samples); skip it and
    // the gain ramp that follows.
    let settled = &collected[3000..];
    let p = peak(settled);
    assert!(p > 0.3, "quiet input not amplified: peak {p}");
    assert!(p <= 0.05 * 10.0 + 1e-4, "gain exceeded max_gain: peak {p}");
}

#[test]
fn silence_stays_silent() {
    let host = Host::new(0);
    let mut ctl = controls();
    let mut input = vec![0.0_f32; BLOCK];
    let mut output = vec![1.0_f32; BLOCK];

    // SAFETY: all buffers outlive `host`.
    unsafe {
        for (i, value) in ctl.iter_mut().enumerate() {
            host.connect(i, value);
        }
        host.connect(9, input.as_mut_ptr());
        host.connect(10, output.as_mut_ptr());
    }
    host.activate();
    for _ in 0..10 {
        host.run(BLOCK);
        assert!(output.iter().all(|&s| s == 0.0));
    }
}

#[test]
fn in_place_host_buffers() {
    let host = Host::new(0);
    let mut ctl = controls();
    let mut buffer = vec![0.0_f32; BLOCK];

    // SAFETY: all buffers outlive `host`.
    unsafe {
        for (i, value) in ctl.iter_mut().enumerate() {
            host.connect(i, value);
        }
        host.connect(9, buffer.as_mut_ptr());
        host.connect(10, buffer.as_mut_ptr());
    }
    host.activate();

    let mut collected = Vec::new();
    for block in 0..40 {
        buffer.copy_from_slice(&sine(200.0, 0.05, BLOCK, block * BLOCK));
        host.run(BLOCK);
        collected.extend_from_slice(&buffer);
    }
    assert!(collected.iter().all(|s| s.is_finite()));
    assert!(peak(&collected[3000..]) > 0.3);
}

#[test]
fn every_variant_runs() {
    for index in 0..8 {
        let host = Host::new(index);
        let channels = index + 1;
        let mut ctl = controls();
        let mut inputs = vec![sine(440.0, 0.2, BLOCK, 0); channels];
        let mut outputs = vec![vec![0.0_f32; BLOCK]; channels];

        // SAFETY: all buffers outlive `host`.
        unsafe {
            for (i, value) in ctl.iter_mut().enumerate() {
                host.connect(i, value);
            }
            for ch in 0..channels {
                host.connect(9 + 2 * ch, inputs[ch].as_mut_ptr());
                host.connect(10 + 2 * ch, outputs[ch].as_mut_ptr());
            }
        }
        host.activate();
        for _ in 0..4 {
            host.run(BLOCK);
        }
        assert!(outputs.iter().flatten().all(|s| s.is_finite()), "variant {index}");
        drop(host);
    }
}
