//! Per-instance plugin state and lifecycle.
//!
//! ```text
//! new ──► connect_port* ──► activate ──► run* ──► deactivate ──┐
//!              ▲                                                │
//!              └────────────────────────────────────────────────┘
//!                                   drop (cleanup) from any state
//! ```
//!
//! [`PluginInstance`] holds the host's port pointers, the nine control
//! values and, between `activate` and `deactivate`, the engine. The channel
//! count is discovered from connections: it is one past the highest channel
//! whose input port was connected to a non-null buffer, and it never
//! shrinks.
//!
//! All methods that touch host memory are `unsafe`; the callbacks module
//! upholds their contracts on behalf of the host.

use std::ptr;
use std::slice;

use dynaudnorm_core::{Normalizer, NormalizerConfig};

use crate::channels::{CONTROL_PORT_COUNT, ChannelVariant, MAX_CHANNELS};
use crate::ports::{ControlPort, PortRole};
use crate::priming::prime_delay;

/// State of one plugin instance.
pub struct PluginInstance<E: Normalizer> {
    variant: ChannelVariant,
    sample_rate: u32,
    params: NormalizerConfig,
    controls: [*const f32; CONTROL_PORT_COUNT],
    inputs: [*const f32; MAX_CHANNELS],
    outputs: [*mut f32; MAX_CHANNELS],
    channels: usize,
    engine: Option<E>,
}

impl<E: Normalizer> PluginInstance<E> {
    /// Create an instance with default parameters, no connections and no
    /// engine.
    pub fn new(variant: ChannelVariant, sample_rate: u32) -> Self {
        Self {
            variant,
            sample_rate,
            params: NormalizerConfig::new(0, sample_rate),
            controls: [ptr::null(); CONTROL_PORT_COUNT],
            inputs: [ptr::null(); MAX_CHANNELS],
            outputs: [ptr::null_mut(); MAX_CHANNELS],
            channels: 0,
            engine: None,
        }
    }

    /// Variant this instance was created from.
    pub fn variant(&self) -> ChannelVariant {
        self.variant
    }

    /// Sample rate passed at instantiation.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count discovered from input connections.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Current parameter values. `channels` and `sample_rate` are only
    /// filled in when an engine is built.
    pub fn params(&self) -> &NormalizerConfig {
        &self.params
    }

    /// The engine, if activated.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Returns `true` between a successful `activate` and `deactivate`.
    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    /// Set a control value directly, detaching any connected control port.
    ///
    /// Takes effect at the next [`activate`](Self::activate).
    pub fn set_control(&mut self, port: ControlPort, value: f32) {
        self.controls[port.index()] = ptr::null();
        port.apply(&mut self.params, value);
    }

    /// Connect `port` to host memory at `data`.
    ///
    /// Control ports copy the current value and remember the pointer so
    /// [`activate`](Self::activate) sees later writes; a null control pointer
    /// is ignored. Audio ports store the pointer; a non-null input raises the
    /// channel count. Ports past the variant's last audio port are ignored.
    ///
    /// # Safety
    ///
    /// A non-null control `data` must point to a readable `f32` that stays
    /// valid until the port is reconnected or the instance is dropped. Audio
    /// pointers must satisfy the contract of [`run`](Self::run) whenever it
    /// is called.
    pub unsafe fn connect_port(&mut self, port: usize, data: *mut f32) {
        match PortRole::from_index(port, self.variant.channels()) {
            Some(PortRole::Control(control)) => {
                // SAFETY: caller guarantees a non-null control pointer is readable.
                if let Some(&value) = unsafe { data.cast_const().as_ref() } {
                    control.apply(&mut self.params, value);
                    self.controls[control.index()] = data.cast_const();
                }
            }
            Some(PortRole::AudioInput(channel)) => {
                self.inputs[channel] = data.cast_const();
                if !data.is_null() {
                    self.channels = self.channels.max(channel + 1);
                }
            }
            Some(PortRole::AudioOutput(channel)) => {
                self.outputs[channel] = data;
            }
            None => {}
        }
    }

    /// Build, initialize and prime a fresh engine from the current
    /// parameters and discovered channel count.
    ///
    /// If initialization fails the error is logged and the instance stays
    /// inactive; `run` then does nothing.
    ///
    /// # Safety
    ///
    /// Every control pointer still connected must be readable.
    pub unsafe fn activate(&mut self) {
        for (control, &data) in ControlPort::ALL.iter().zip(&self.controls) {
            // SAFETY: caller guarantees connected control pointers are readable.
            if let Some(&value) = unsafe { data.as_ref() } {
                control.apply(&mut self.params, value);
            }
        }
        self.params.channels = self.channels as u32;
        self.params.sample_rate = self.sample_rate;

        self.engine = None;
        let mut engine = E::new(self.params.clone());
        if let Err(err) = engine.initialize() {
            tracing::error!(
                %err,
                channels = self.channels,
                sample_rate = self.sample_rate,
                "engine initialization failed"
            );
            return;
        }

        let delay = prime_delay(&mut engine, self.channels);
        tracing::debug!(
            label = self.variant.label(),
            channels = self.channels,
            sample_rate = self.sample_rate,
            ?delay,
            "activated"
        );
        self.engine = Some(engine);
    }

    /// Process `sample_count` frames from the connected inputs into the
    /// connected outputs.
    ///
    /// Does nothing without an engine or if any input or output of the
    /// discovered channels is unconnected. An input connected to the same
    /// buffer as its output is processed in place. Never allocates, locks
    /// or logs.
    ///
    /// # Safety
    ///
    /// Each connected input and output of the discovered channels must be
    /// valid for `sample_count` samples. Distinct channels must not share
    /// buffers.
    pub unsafe fn run(&mut self, sample_count: usize) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let inputs = &self.inputs[..self.channels];
        let outputs = &self.outputs[..self.channels];
        if inputs.iter().any(|p| p.is_null()) || outputs.iter().any(|p| p.is_null()) {
            return;
        }

        let in_place = inputs
            .iter()
            .zip(outputs)
            .any(|(&input, &output)| ptr::eq(input, output));

        let mut out_bufs: [&mut [f32]; MAX_CHANNELS] = Default::default();
        if in_place {
            for ((&input, &output), slot) in inputs.iter().zip(outputs).zip(&mut out_bufs) {
                if !ptr::eq(input, output) {
                    // SAFETY: both valid for `sample_count`; `copy` tolerates overlap.
                    unsafe { ptr::copy(input, output, sample_count) };
                }
                // SAFETY: valid for `sample_count`, not aliased by any other slice.
                *slot = unsafe { slice::from_raw_parts_mut(output, sample_count) };
            }
            let _ = engine.process_inplace(&mut out_bufs[..self.channels], sample_count);
        } else {
            let mut in_bufs: [&[f32]; MAX_CHANNELS] = Default::default();
            for (&input, slot) in inputs.iter().zip(&mut in_bufs) {
                // SAFETY: valid for `sample_count` and never written during this call.
                *slot = unsafe { slice::from_raw_parts(input, sample_count) };
            }
            for (&output, slot) in outputs.iter().zip(&mut out_bufs) {
                // SAFETY: valid for `sample_count`, disjoint from every input.
                *slot = unsafe { slice::from_raw_parts_mut(output, sample_count) };
            }
            let _ = engine.process(
                &in_bufs[..self.channels],
                &mut out_bufs[..self.channels],
                sample_count,
            );
        }
    }

    /// Drop the engine. Parameters and connections are kept.
    pub fn deactivate(&mut self) {
        if self.engine.take().is_some() {
            tracing::debug!(label = self.variant.label(), "deactivated");
        }
    }
}

impl<E: Normalizer> std::fmt::Debug for PluginInstance<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginInstance")
            .field("variant", &self.variant)
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
