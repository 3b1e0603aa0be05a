//! Frame-based dynamic audio normalizer.
//!
//! The signal is cut into frames of `frame_len` samples. For every frame a
//! gain factor is derived that would bring the frame's peak to the target
//! peak (bounded by the maximum gain and, optionally, a target RMS). The
//! per-frame gains are then smoothed in two stages:
//!
//! 1. a minimum filter over `filter_size` neighbouring frames, so a loud frame
//!    pulls its neighbours' gain down before it arrives,
//! 2. a Gaussian filter over `filter_size` minimum-filtered values.
//!
//! Both stages are centered, so the smoothed gain of frame `k` depends on
//! frames up to `k + filter_size - 1`. Samples are held back by exactly
//! `frame_len * filter_size` samples; at that distance the gain for every
//! emitted sample is always known, so after the delay has filled the engine
//! emits one sample for every sample it consumes.
//!
//! Within a frame the gain is interpolated linearly from the previous frame's
//! gain, which avoids steps at frame boundaries.
//!
//! Optional per-frame stages, applied before the gain:
//!
//! - **DC correction**: subtract the frame mean.
//! - **Compression**: soft-limit samples above `compress_factor` standard
//!   deviations with `t * erf(x * sqrt(pi) / 2t)`, which has unit slope at
//!   zero and saturates at `t`.
//!
//! All buffers are allocated in [`initialize`](Normalizer::initialize);
//! processing never allocates.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::f64::consts::FRAC_2_SQRT_PI;

use crate::config::NormalizerConfig;
use crate::error::NormalizerError;
use crate::gaussian::GaussianFilter;
use crate::history::GainQueue;
use crate::normalizer::{Configuration, Normalizer};

/// Peaks below this are treated as silence.
const SILENCE: f64 = 1e-9;

/// Soft limiter with unit slope at zero that saturates at `threshold`.
///
/// A non-positive threshold disables limiting.
pub fn soft_limit(x: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return x;
    }
    threshold * libm::erf(x / (threshold * FRAC_2_SQRT_PI))
}

/// Dynamic audio normalizer engine.
///
/// # Example
///
/// ```rust
/// use dynaudnorm_core::{DynamicNormalizer, Normalizer, NormalizerConfig};
///
/// let config = NormalizerConfig::new(2, 8000)
///     .with_frame_len_ms(10)
///     .with_filter_size(3);
/// let mut engine = DynamicNormalizer::new(config);
/// engine.initialize().unwrap();
///
/// // 80-sample frames, 3-frame window
/// assert_eq!(engine.internal_delay(), Some(240));
/// ```
#[derive(Debug, Clone)]
pub struct DynamicNormalizer {
    config: NormalizerConfig,
    pipeline: Option<Pipeline>,
}

impl DynamicNormalizer {
    /// The sanitized configuration this engine runs with.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Returns `true` once [`initialize`](Normalizer::initialize) succeeded.
    pub fn is_initialized(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Number of consumed samples per channel not yet emitted.
    pub fn buffered(&self) -> usize {
        self.pipeline
            .as_ref()
            .map_or(0, |p| p.real_in.saturating_sub(p.emitted))
    }

    fn pipeline_mut(&mut self) -> Result<&mut Pipeline, NormalizerError> {
        self.pipeline.as_mut().ok_or(NormalizerError::NotInitialized)
    }
}

impl Normalizer for DynamicNormalizer {
    fn new(config: NormalizerConfig) -> Self {
        Self {
            config: config.sanitized(),
            pipeline: None,
        }
    }

    fn initialize(&mut self) -> Result<(), NormalizerError> {
        self.config.validate()?;
        let pipeline = Pipeline::new(&self.config);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            channels = pipeline.channels,
            frame_len = pipeline.frame_len,
            filter_size = pipeline.filter.size(),
            delay = pipeline.delay,
            "dynamic normalizer initialized"
        );
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<usize, NormalizerError> {
        let p = self.pipeline_mut()?;
        p.check_input(input, frames)?;
        p.check_output(output, frames)?;

        let mut written = 0;
        for i in 0..frames {
            for (ch, buf) in input.iter().enumerate() {
                p.push(ch, buf[i]);
            }
            p.advance(true);
            if p.can_emit() {
                for (ch, buf) in output.iter_mut().enumerate() {
                    buf[written] = p.render(ch);
                }
                p.emitted += 1;
                written += 1;
            }
        }
        Ok(written)
    }

    fn process_inplace(
        &mut self,
        buffers: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<usize, NormalizerError> {
        let p = self.pipeline_mut()?;
        p.check_output(buffers, frames)?;

        // `written <= i`, so output never overtakes unread input.
        let mut written = 0;
        for i in 0..frames {
            for (ch, buf) in buffers.iter().enumerate() {
                p.push(ch, buf[i]);
            }
            p.advance(true);
            if p.can_emit() {
                for (ch, buf) in buffers.iter_mut().enumerate() {
                    buf[written] = p.render(ch);
                }
                p.emitted += 1;
                written += 1;
            }
        }
        Ok(written)
    }

    fn flush_buffer(
        &mut self,
        output: &mut [&mut [f32]],
        capacity: usize,
    ) -> Result<usize, NormalizerError> {
        let p = self.pipeline_mut()?;
        let target = capacity.min(p.real_in.saturating_sub(p.emitted));
        p.check_output(output, target)?;

        let mut written = 0;
        while written < target {
            for ch in 0..p.channels {
                p.push(ch, 0.0);
            }
            p.advance(false);
            if p.can_emit() {
                for (ch, buf) in output.iter_mut().enumerate() {
                    buf[written] = p.render(ch);
                }
                p.emitted += 1;
                written += 1;
            }
        }
        Ok(written)
    }

    fn reset(&mut self) -> Result<(), NormalizerError> {
        let alt_boundary = self.config.alt_boundary;
        let p = self.pipeline_mut()?;
        p.reset(alt_boundary);
        #[cfg(feature = "tracing")]
        tracing::debug!("dynamic normalizer reset");
        Ok(())
    }

    fn configuration(&self) -> Configuration {
        Configuration {
            channels: self.config.channels,
            sample_rate: self.config.sample_rate,
            frame_len: self.config.frame_len_samples() as u32,
            filter_size: self.config.filter_size,
        }
    }

    fn internal_delay(&self) -> Option<usize> {
        self.pipeline.as_ref().map(|p| p.delay)
    }
}

/// Processing state, allocated by `initialize`.
#[derive(Debug, Clone)]
struct Pipeline {
    channels: usize,
    /// Gain lanes: one when coupled, one per channel otherwise.
    lanes: usize,
    frame_len: usize,
    delay: usize,

    target_peak: f64,
    max_gain: f64,
    target_rms: f64,
    compress_factor: f64,
    dc_correction: bool,

    /// Delay line, channel-major, `ring_len` samples per channel.
    samples: Vec<f32>,
    ring_len: usize,

    /// Per-frame analysis results, `frame_cap` frames deep.
    frame_cap: usize,
    frame_mean: Vec<f64>,
    frame_threshold: Vec<f64>,
    frame_gain: Vec<f64>,

    raw: Vec<GainQueue>,
    minimum: Vec<GainQueue>,
    filter: GaussianFilter,
    radius: usize,

    /// Per-lane analysis scratch.
    lane_peak: Vec<f64>,
    lane_energy: Vec<f64>,

    /// Samples consumed per channel, including flush padding.
    total_in: usize,
    /// Samples consumed per channel from callers.
    real_in: usize,
    emitted: usize,
    frames_done: usize,
    gains_done: usize,
}

impl Pipeline {
    fn new(config: &NormalizerConfig) -> Self {
        let channels = config.channels as usize;
        let lanes = match (channels, config.channels_coupled) {
            (0, _) => 0,
            (_, true) => 1,
            (n, false) => n,
        };
        let frame_len = config.frame_len_samples();
        let filter_size = config.filter_size as usize;
        let delay = frame_len * filter_size;
        let ring_len = delay + 1;
        let frame_cap = filter_size + 3;

        let mut pipeline = Self {
            channels,
            lanes,
            frame_len,
            delay,
            target_peak: config.peak,
            max_gain: config.max_gain,
            target_rms: config.target_rms,
            compress_factor: config.compress_factor,
            dc_correction: config.dc_correction,
            samples: vec![0.0; channels * ring_len],
            ring_len,
            frame_cap,
            frame_mean: vec![0.0; frame_cap * channels],
            frame_threshold: vec![0.0; frame_cap * channels],
            frame_gain: vec![1.0; frame_cap * lanes],
            raw: (0..lanes).map(|_| GainQueue::with_capacity(filter_size)).collect(),
            minimum: (0..lanes).map(|_| GainQueue::with_capacity(filter_size)).collect(),
            filter: GaussianFilter::new(filter_size),
            radius: filter_size / 2,
            lane_peak: vec![0.0; lanes],
            lane_energy: vec![0.0; lanes],
            total_in: 0,
            real_in: 0,
            emitted: 0,
            frames_done: 0,
            gains_done: 0,
        };
        pipeline.reset(config.alt_boundary);
        pipeline
    }

    fn reset(&mut self, alt_boundary: bool) {
        self.total_in = 0;
        self.real_in = 0;
        self.emitted = 0;
        self.frames_done = 0;
        self.gains_done = 0;
        for q in self.raw.iter_mut().chain(self.minimum.iter_mut()) {
            q.clear();
        }
        // Frames outside the signal count as unity gain in the alternative
        // mode; otherwise the queues stay empty and are seeded with the
        // first value that reaches them.
        if alt_boundary {
            let radius = self.radius;
            for q in self.raw.iter_mut().chain(self.minimum.iter_mut()) {
                q.fill(1.0, radius);
            }
        }
    }

    fn check_input(&self, input: &[&[f32]], frames: usize) -> Result<(), NormalizerError> {
        if input.len() != self.channels {
            return Err(NormalizerError::ChannelMismatch {
                expected: self.channels,
                actual: input.len(),
            });
        }
        if let Some((channel, buf)) = input.iter().enumerate().find(|(_, b)| b.len() < frames) {
            return Err(NormalizerError::BufferTooShort {
                channel,
                required: frames,
                actual: buf.len(),
            });
        }
        Ok(())
    }

    fn check_output(&self, output: &[&mut [f32]], frames: usize) -> Result<(), NormalizerError> {
        if output.len() != self.channels {
            return Err(NormalizerError::ChannelMismatch {
                expected: self.channels,
                actual: output.len(),
            });
        }
        if let Some((channel, buf)) = output.iter().enumerate().find(|(_, b)| b.len() < frames) {
            return Err(NormalizerError::BufferTooShort {
                channel,
                required: frames,
                actual: buf.len(),
            });
        }
        Ok(())
    }

    #[inline]
    fn push(&mut self, ch: usize, sample: f32) {
        let idx = ch * self.ring_len + self.total_in % self.ring_len;
        self.samples[idx] = sample;
    }

    /// Commit the sample pushed for every channel.
    #[inline]
    fn advance(&mut self, real: bool) {
        self.total_in += 1;
        if real {
            self.real_in += 1;
        }
        if self.total_in % self.frame_len == 0 {
            self.complete_frame();
        }
    }

    #[inline]
    fn can_emit(&self) -> bool {
        self.emitted + self.delay < self.total_in
    }

    /// Output sample for `ch` at position `emitted`.
    #[inline]
    fn render(&self, ch: usize) -> f32 {
        let s = self.emitted;
        let k = s / self.frame_len;
        let j = s % self.frame_len;
        let slot = k % self.frame_cap;
        let lane = self.lane_of(ch);

        let gain_now = self.frame_gain[slot * self.lanes + lane];
        let gain_prev = if k == 0 {
            gain_now
        } else {
            let prev = (k - 1) % self.frame_cap;
            self.frame_gain[prev * self.lanes + lane]
        };
        let t = (j + 1) as f64 / self.frame_len as f64;
        let gain = gain_prev + (gain_now - gain_prev) * t;

        let x = f64::from(self.samples[ch * self.ring_len + s % self.ring_len]);
        let mean = self.frame_mean[slot * self.channels + ch];
        let threshold = self.frame_threshold[slot * self.channels + ch];
        (soft_limit(x - mean, threshold) * gain) as f32
    }

    #[inline]
    fn lane_of(&self, ch: usize) -> usize {
        if self.lanes == 1 { 0 } else { ch }
    }

    /// Analyze the frame that just filled and feed its gain into the
    /// smoothing stages.
    fn complete_frame(&mut self) {
        let slot = self.frames_done % self.frame_cap;
        let start = self.total_in - self.frame_len;
        let n = self.frame_len as f64;

        self.lane_peak.iter_mut().for_each(|v| *v = 0.0);
        self.lane_energy.iter_mut().for_each(|v| *v = 0.0);

        for ch in 0..self.channels {
            let base = ch * self.ring_len;
            let at = |i: usize| f64::from(self.samples[base + (start + i) % self.ring_len]);

            let mean = if self.dc_correction {
                (0..self.frame_len).map(at).sum::<f64>() / n
            } else {
                0.0
            };
            let threshold = if self.compress_factor > 0.0 {
                let variance = (0..self.frame_len)
                    .map(|i| {
                        let d = at(i) - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / n;
                self.compress_factor * libm::sqrt(variance)
            } else {
                0.0
            };

            let mut peak = 0.0_f64;
            let mut energy = 0.0_f64;
            for i in 0..self.frame_len {
                let y = soft_limit(at(i) - mean, threshold);
                peak = peak.max(libm::fabs(y));
                energy += y * y;
            }

            self.frame_mean[slot * self.channels + ch] = mean;
            self.frame_threshold[slot * self.channels + ch] = threshold;

            let lane = self.lane_of(ch);
            self.lane_peak[lane] = self.lane_peak[lane].max(peak);
            self.lane_energy[lane] += energy;
        }
        self.frames_done += 1;

        if self.lanes == 0 {
            return;
        }

        let per_lane = if self.lanes == 1 { self.channels as f64 } else { 1.0 };
        let mut produced = false;
        for lane in 0..self.lanes {
            let rms = libm::sqrt(self.lane_energy[lane] / (n * per_lane));
            let gain = self.frame_gain_for(self.lane_peak[lane], rms);
            if let Some(smoothed) = self.smooth(lane, gain) {
                let gslot = self.gains_done % self.frame_cap;
                self.frame_gain[gslot * self.lanes + lane] = smoothed;
                produced = true;
            }
        }
        if produced {
            self.gains_done += 1;
        }
    }

    /// Local gain for one frame: reach the target peak, never exceed the
    /// maximum gain, and optionally stay at or below the target RMS.
    fn frame_gain_for(&self, peak: f64, rms: f64) -> f64 {
        let mut gain = if peak > SILENCE {
            self.target_peak / peak
        } else {
            self.max_gain
        };
        gain = gain.min(self.max_gain);
        if self.target_rms > 0.0 && rms > SILENCE {
            gain = gain.min(self.target_rms / rms);
        }
        gain
    }

    /// Push one raw gain through the minimum and Gaussian stages.
    ///
    /// Returns the smoothed gain of the frame `radius * 2` frames back once
    /// both windows are full.
    fn smooth(&mut self, lane: usize, gain: f64) -> Option<f64> {
        let radius = self.radius;
        let raw = &mut self.raw[lane];
        if raw.is_empty() {
            raw.fill(gain, radius);
        }
        raw.push(gain);
        if !raw.is_full() {
            return None;
        }
        let min = raw.min().unwrap_or(gain);
        raw.pop();

        let minimum = &mut self.minimum[lane];
        if minimum.is_empty() {
            minimum.fill(min, radius);
        }
        minimum.push(min);
        if !minimum.is_full() {
            return None;
        }
        let smoothed = self.filter.apply(minimum);
        minimum.pop();
        smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(channels: u32) -> NormalizerConfig {
        // 80-sample frames, 3-frame window -> 240 samples delay
        NormalizerConfig::new(channels, 8000)
            .with_frame_len_ms(10)
            .with_filter_size(3)
    }

    fn engine(config: NormalizerConfig) -> DynamicNormalizer {
        let mut engine = DynamicNormalizer::new(config);
        engine.initialize().unwrap();
        engine
    }

    #[test]
    fn soft_limit_has_unit_slope_and_saturates() {
        assert_eq!(soft_limit(0.3, 0.0), 0.3);
        let small = soft_limit(1e-4, 1.0);
        assert!((small - 1e-4).abs() < 1e-9, "slope at zero must be one: {small}");
        assert!(soft_limit(100.0, 0.5) <= 0.5);
        assert!(soft_limit(-100.0, 0.5) >= -0.5);
    }

    #[test]
    fn processing_before_initialize_fails() {
        let mut engine = DynamicNormalizer::new(small_config(1));
        let input = [0.0_f32; 4];
        let mut output = [0.0_f32; 4];
        let err = engine
            .process(&[&input[..]], &mut [&mut output[..]], 4)
            .unwrap_err();
        assert_eq!(err, NormalizerError::NotInitialized);
        assert_eq!(engine.internal_delay(), None);
        assert_eq!(engine.reset(), Err(NormalizerError::NotInitialized));
    }

    #[test]
    fn initialize_rejects_zero_sample_rate() {
        let mut engine = DynamicNormalizer::new(NormalizerConfig::new(1, 0));
        assert!(matches!(
            engine.initialize(),
            Err(NormalizerError::InvalidConfig(_))
        ));
        assert!(!engine.is_initialized());
    }

    #[test]
    fn delay_is_frame_len_times_filter_size() {
        let engine = engine(NormalizerConfig::new(2, 44100));
        assert_eq!(engine.internal_delay(), Some(22050 * 31));
        let conf = engine.configuration();
        assert_eq!(conf.frame_len, 22050);
        assert_eq!(conf.filter_size, 31);
        assert_eq!(conf.channels, 2);
        assert_eq!(conf.sample_rate, 44100);
    }

    #[test]
    fn output_starts_after_delay() {
        let mut engine = engine(small_config(1));
        let input = vec![0.25_f32; 300];
        let mut output = vec![0.0_f32; 300];
        let written = engine
            .process(&[&input[..]], &mut [&mut output[..]], 300)
            .unwrap();
        assert_eq!(written, 300 - 240);
        assert_eq!(engine.buffered(), 240);
    }

    #[test]
    fn channel_mismatch_is_reported() {
        let mut engine = engine(small_config(2));
        let input = [0.0_f32; 8];
        let mut output = [0.0_f32; 8];
        let err = engine
            .process(&[&input[..]], &mut [&mut output[..]], 8)
            .unwrap_err();
        assert_eq!(
            err,
            NormalizerError::ChannelMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn short_buffer_is_reported() {
        let mut engine = engine(small_config(1));
        let input = [0.0_f32; 8];
        let mut output = [0.0_f32; 4];
        let err = engine
            .process(&[&input[..]], &mut [&mut output[..]], 8)
            .unwrap_err();
        assert!(matches!(
            err,
            NormalizerError::BufferTooShort {
                channel: 0,
                required: 8,
                actual: 4
            }
        ));
    }

    #[test]
    fn zero_channel_engine_counts_samples() {
        let mut engine = engine(small_config(0));
        let written = engine.process(&[], &mut [], 500).unwrap();
        assert_eq!(written, 500 - 240);
        assert_eq!(engine.process_inplace(&mut [], 10).unwrap(), 10);
    }

    #[test]
    fn constant_signal_is_amplified_to_peak() {
        let mut engine = engine(small_config(1));
        let input = vec![0.1_f32; 4000];
        let mut output = vec![0.0_f32; 4000];
        let written = engine
            .process(&[&input[..]], &mut [&mut output[..]], 4000)
            .unwrap();
        assert_eq!(written, 4000 - 240);
        // Well past the start, gain has settled at peak / 0.1 = 9.5.
        let settled = output[2000];
        assert!((settled - 0.95).abs() < 1e-3, "got {settled}");
    }

    #[test]
    fn max_gain_bounds_amplification() {
        let mut engine = engine(small_config(1).with_max_gain(2.0));
        let input = vec![0.01_f32; 4000];
        let mut output = vec![0.0_f32; 4000];
        engine
            .process(&[&input[..]], &mut [&mut output[..]], 4000)
            .unwrap();
        assert!(output.iter().all(|&y| y <= 0.02 + 1e-6));
        assert!((output[2000] - 0.02).abs() < 1e-5);
    }

    #[test]
    fn target_rms_limits_gain() {
        let mut engine = engine(small_config(1).with_target_rms(0.2));
        let input = vec![0.1_f32; 4000];
        let mut output = vec![0.0_f32; 4000];
        engine
            .process(&[&input[..]], &mut [&mut output[..]], 4000)
            .unwrap();
        assert!((output[2000] - 0.2).abs() < 1e-4, "got {}", output[2000]);
    }

    #[test]
    fn dc_correction_removes_offset() {
        let mut engine = engine(small_config(1).with_dc_correction(true).with_max_gain(1.0));
        let input: Vec<f32> = (0..4000)
            .map(|i| 0.3 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let mut output = vec![0.0_f32; 4000];
        engine
            .process(&[&input[..]], &mut [&mut output[..]], 4000)
            .unwrap();
        let mean: f32 = output[1000..3000].iter().sum::<f32>() / 2000.0;
        assert!(mean.abs() < 1e-3, "mean {mean}");
    }

    #[test]
    fn uncoupled_channels_get_independent_gain() {
        let mut engine = engine(small_config(2).with_channels_coupled(false));
        let left = vec![0.1_f32; 4000];
        let right = vec![0.5_f32; 4000];
        let mut out_l = vec![0.0_f32; 4000];
        let mut out_r = vec![0.0_f32; 4000];
        engine
            .process(
                &[&left[..], &right[..]],
                &mut [&mut out_l[..], &mut out_r[..]],
                4000,
            )
            .unwrap();
        assert!((out_l[2000] - 0.95).abs() < 1e-3);
        assert!((out_r[2000] - 0.95).abs() < 1e-3);
    }

    #[test]
    fn coupled_channels_share_gain() {
        let mut engine = engine(small_config(2));
        let left = vec![0.1_f32; 4000];
        let right = vec![0.5_f32; 4000];
        let mut out_l = vec![0.0_f32; 4000];
        let mut out_r = vec![0.0_f32; 4000];
        engine
            .process(
                &[&left[..], &right[..]],
                &mut [&mut out_l[..], &mut out_r[..]],
                4000,
            )
            .unwrap();
        // Gain driven by the louder channel: 0.95 / 0.5 = 1.9.
        assert!((out_r[2000] - 0.95).abs() < 1e-3);
        assert!((out_l[2000] - 0.19).abs() < 1e-3);
    }

    #[test]
    fn alt_boundary_starts_from_unity_gain() {
        let mut default_mode = engine(small_config(1));
        let mut alt_mode = engine(small_config(1).with_alt_boundary(true));
        let input = vec![0.1_f32; 1000];
        let mut out_default = vec![0.0_f32; 1000];
        let mut out_alt = vec![0.0_f32; 1000];
        default_mode
            .process(&[&input[..]], &mut [&mut out_default[..]], 1000)
            .unwrap();
        alt_mode
            .process(&[&input[..]], &mut [&mut out_alt[..]], 1000)
            .unwrap();
        // Default mode extends the first frame's gain backwards.
        assert!((out_default[0] - 0.95).abs() < 1e-3, "got {}", out_default[0]);
        // Alternative mode fades in from unity.
        assert!(out_alt[0] < out_default[0]);
        assert!(out_alt[0] >= 0.1 - 1e-6);
    }

    #[test]
    fn inplace_matches_out_of_place() {
        let input: Vec<f32> = (0..3000).map(|i| (i as f32 * 0.05).sin() * 0.2).collect();

        let mut a = engine(small_config(1));
        let mut out = vec![0.0_f32; 3000];
        let na = a.process(&[&input[..]], &mut [&mut out[..]], 3000).unwrap();

        let mut b = engine(small_config(1));
        let mut buf = input.clone();
        let nb = b.process_inplace(&mut [&mut buf[..]], 3000).unwrap();

        assert_eq!(na, nb);
        assert_eq!(&out[..na], &buf[..nb]);
    }

    #[test]
    fn flush_drains_buffered_samples() {
        let mut engine = engine(small_config(1));
        let input = vec![0.2_f32; 500];
        let mut output = vec![0.0_f32; 500];
        let written = engine
            .process(&[&input[..]], &mut [&mut output[..]], 500)
            .unwrap();
        assert_eq!(engine.buffered(), 500 - written);

        let mut tail = vec![0.0_f32; 1000];
        let flushed = engine.flush_buffer(&mut [&mut tail[..]], 1000).unwrap();
        assert_eq!(flushed, 240);
        assert_eq!(engine.flush_buffer(&mut [&mut tail[..]], 1000).unwrap(), 0);
    }

    #[test]
    fn flush_respects_capacity() {
        let mut engine = engine(small_config(1));
        let input = vec![0.2_f32; 100];
        let mut output = vec![0.0_f32; 100];
        engine
            .process(&[&input[..]], &mut [&mut output[..]], 100)
            .unwrap();
        let mut tail = vec![0.0_f32; 30];
        assert_eq!(engine.flush_buffer(&mut [&mut tail[..]], 30).unwrap(), 30);
        assert_eq!(engine.flush_buffer(&mut [&mut tail[..]], 30).unwrap(), 30);
        assert_eq!(engine.flush_buffer(&mut [&mut tail[..]], 30).unwrap(), 30);
        assert_eq!(engine.flush_buffer(&mut [&mut tail[..]], 30).unwrap(), 10);
    }

    #[test]
    fn reset_restores_fresh_state() {
        let input: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.01).sin() * 0.3).collect();

        let mut fresh = engine(small_config(1));
        let mut expected = vec![0.0_f32; 2000];
        fresh
            .process(&[&input[..]], &mut [&mut expected[..]], 2000)
            .unwrap();

        let mut reused = engine(small_config(1));
        let noise = vec![0.7_f32; 1234];
        let mut scratch = vec![0.0_f32; 1234];
        reused
            .process(&[&noise[..]], &mut [&mut scratch[..]], 1234)
            .unwrap();
        reused.reset().unwrap();
        assert_eq!(reused.buffered(), 0);

        let mut actual = vec![0.0_f32; 2000];
        reused
            .process(&[&input[..]], &mut [&mut actual[..]], 2000)
            .unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn silence_stays_silent() {
        let mut engine = engine(small_config(2));
        let zeros = vec![0.0_f32; 1000];
        let mut out_l = vec![1.0_f32; 1000];
        let mut out_r = vec![1.0_f32; 1000];
        let written = engine
            .process(
                &[&zeros[..], &zeros[..]],
                &mut [&mut out_l[..], &mut out_r[..]],
                1000,
            )
            .unwrap();
        assert!(out_l[..written].iter().all(|&s| s == 0.0));
        assert!(out_r[..written].iter().all(|&s| s == 0.0));
    }
}
