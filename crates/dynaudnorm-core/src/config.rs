//! Normalizer configuration and parameter ranges.
//!
//! [`NormalizerConfig`] carries every value an engine needs at construction:
//! the channel count, the sample rate, and the nine user-facing parameters.
//! The [`ParamRange`] constants are the single source of truth for bounds and
//! defaults; plugin adapters derive their host-visible range hints from them.
//!
//! # Example
//!
//! ```rust
//! use dynaudnorm_core::NormalizerConfig;
//!
//! let config = NormalizerConfig::new(2, 44100)
//!     .with_frame_len_ms(250)
//!     .with_max_gain(20.0);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.filter_size, 31);
//! ```

use thiserror::Error;

/// Inclusive numeric range with a default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Lowest accepted value.
    pub min: f64,
    /// Highest accepted value.
    pub max: f64,
    /// Value used when nothing else is specified.
    pub default: f64,
}

impl ParamRange {
    /// Create a range. `default` must lie within `[min, max]`.
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamp `value` into the range. NaN maps to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Returns `true` if `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Frame length in milliseconds.
pub const FRAME_LEN_MS: ParamRange = ParamRange::new(10.0, 8000.0, 500.0);
/// Gaussian filter size in frames (odd).
pub const FILTER_SIZE: ParamRange = ParamRange::new(3.0, 301.0, 31.0);
/// Target peak magnitude.
pub const PEAK: ParamRange = ParamRange::new(0.0, 1.0, 0.95);
/// Maximum amplification factor.
pub const MAX_GAIN: ParamRange = ParamRange::new(1.0, 100.0, 10.0);
/// Target RMS level. Zero disables RMS-based gain.
pub const TARGET_RMS: ParamRange = ParamRange::new(0.0, 1.0, 0.0);
/// Compression factor in standard deviations. Zero disables compression.
pub const COMPRESS_FACTOR: ParamRange = ParamRange::new(0.0, 30.0, 0.0);
/// Channel coupling flag (0 or 1).
pub const CHANNEL_COUPLING: ParamRange = ParamRange::new(0.0, 1.0, 1.0);
/// DC correction flag (0 or 1).
pub const DC_CORRECTION: ParamRange = ParamRange::new(0.0, 1.0, 0.0);
/// Alternative boundary mode flag (0 or 1).
pub const ALT_BOUNDARY: ParamRange = ParamRange::new(0.0, 1.0, 0.0);

/// Errors reported by [`NormalizerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The sample rate is zero.
    #[error("invalid sample rate: {0} Hz")]
    SampleRate(u32),

    /// A parameter lies outside its documented range.
    #[error("parameter '{param}' out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        /// Parameter name.
        param: &'static str,
        /// Offending value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The Gaussian filter needs a center tap.
    #[error("filter size must be odd, got {0}")]
    EvenFilterSize(u32),
}

/// Construction-time configuration for a normalizer engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    /// Number of audio channels. Zero is accepted and yields an engine that
    /// only keeps sample counts.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Analysis frame length in milliseconds.
    pub frame_len_ms: u32,
    /// Gaussian smoothing window in frames.
    pub filter_size: u32,
    /// Target peak magnitude, 0.0..=1.0.
    pub peak: f64,
    /// Maximum gain factor.
    pub max_gain: f64,
    /// Target RMS, 0.0 disables.
    pub target_rms: f64,
    /// Compression factor, 0.0 disables.
    pub compress_factor: f64,
    /// Apply one gain to all channels.
    pub channels_coupled: bool,
    /// Remove per-frame DC offset.
    pub dc_correction: bool,
    /// Assume unity gain outside the signal instead of extending the edges.
    pub alt_boundary: bool,
}

impl NormalizerConfig {
    /// Create a configuration with default parameters.
    pub fn new(channels: u32, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            frame_len_ms: FRAME_LEN_MS.default as u32,
            filter_size: FILTER_SIZE.default as u32,
            peak: PEAK.default,
            max_gain: MAX_GAIN.default,
            target_rms: TARGET_RMS.default,
            compress_factor: COMPRESS_FACTOR.default,
            channels_coupled: CHANNEL_COUPLING.default != 0.0,
            dc_correction: DC_CORRECTION.default != 0.0,
            alt_boundary: ALT_BOUNDARY.default != 0.0,
        }
    }

    /// Set the frame length in milliseconds.
    pub fn with_frame_len_ms(mut self, frame_len_ms: u32) -> Self {
        self.frame_len_ms = frame_len_ms;
        self
    }

    /// Set the Gaussian filter size in frames.
    pub fn with_filter_size(mut self, filter_size: u32) -> Self {
        self.filter_size = filter_size;
        self
    }

    /// Set the target peak magnitude.
    pub fn with_peak(mut self, peak: f64) -> Self {
        self.peak = peak;
        self
    }

    /// Set the maximum gain factor.
    pub fn with_max_gain(mut self, max_gain: f64) -> Self {
        self.max_gain = max_gain;
        self
    }

    /// Set the target RMS.
    pub fn with_target_rms(mut self, target_rms: f64) -> Self {
        self.target_rms = target_rms;
        self
    }

    /// Set the compression factor.
    pub fn with_compress_factor(mut self, compress_factor: f64) -> Self {
        self.compress_factor = compress_factor;
        self
    }

    /// Enable or disable channel coupling.
    pub fn with_channels_coupled(mut self, coupled: bool) -> Self {
        self.channels_coupled = coupled;
        self
    }

    /// Enable or disable DC correction.
    pub fn with_dc_correction(mut self, enabled: bool) -> Self {
        self.dc_correction = enabled;
        self
    }

    /// Enable or disable the alternative boundary mode.
    pub fn with_alt_boundary(mut self, enabled: bool) -> Self {
        self.alt_boundary = enabled;
        self
    }

    /// Return a copy with every parameter clamped into its range.
    ///
    /// An even filter size is rounded up to the next odd value. The sample
    /// rate and channel count are left untouched.
    pub fn sanitized(&self) -> Self {
        let mut filter_size = FILTER_SIZE.clamp(self.filter_size as f64) as u32;
        if filter_size % 2 == 0 {
            filter_size += 1;
        }
        Self {
            channels: self.channels,
            sample_rate: self.sample_rate,
            frame_len_ms: FRAME_LEN_MS.clamp(self.frame_len_ms as f64) as u32,
            filter_size: filter_size.min(FILTER_SIZE.max as u32),
            peak: PEAK.clamp(self.peak),
            max_gain: MAX_GAIN.clamp(self.max_gain),
            target_rms: TARGET_RMS.clamp(self.target_rms),
            compress_factor: COMPRESS_FACTOR.clamp(self.compress_factor),
            channels_coupled: self.channels_coupled,
            dc_correction: self.dc_correction,
            alt_boundary: self.alt_boundary,
        }
    }

    /// Check every value against its range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }

        let checks: [(&'static str, f64, &ParamRange); 6] = [
            ("frame_len_ms", self.frame_len_ms as f64, &FRAME_LEN_MS),
            ("filter_size", self.filter_size as f64, &FILTER_SIZE),
            ("peak", self.peak, &PEAK),
            ("max_gain", self.max_gain, &MAX_GAIN),
            ("target_rms", self.target_rms, &TARGET_RMS),
            ("compress_factor", self.compress_factor, &COMPRESS_FACTOR),
        ];
        for (param, value, range) in checks {
            if !range.contains(value) {
                return Err(ConfigError::OutOfRange {
                    param,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if self.filter_size % 2 == 0 {
            return Err(ConfigError::EvenFilterSize(self.filter_size));
        }
        Ok(())
    }

    /// Frame length in samples: rounded, then made even.
    pub fn frame_len_samples(&self) -> usize {
        let exact = self.sample_rate as f64 * self.frame_len_ms as f64 / 1000.0;
        let frame_len = libm::round(exact) as usize;
        (frame_len + frame_len % 2).max(2)
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self::new(2, 44100)
    }
}
