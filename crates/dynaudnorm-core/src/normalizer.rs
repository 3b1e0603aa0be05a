//! The [`Normalizer`] engine trait.
//!
//! A normalizer is a stateful, per-instance object that consumes planar
//! sample buffers (one slice per channel) and emits normalized samples after
//! a bounded internal delay. Plugin adapters only talk to engines through
//! this trait, so any implementation can be swapped in, including test
//! doubles.
//!
//! ## Contract
//!
//! - `new` only stores the configuration; `initialize` allocates and must be
//!   called (successfully) before any processing.
//! - `process` and `process_inplace` return how many samples per channel were
//!   written to the front of the output buffers. While the internal delay is
//!   filling this may be less than the input count.
//! - `process`, `process_inplace` and `flush_buffer` must not allocate, lock
//!   or block. Plugin hosts call them from the real-time audio thread.
//! - Dropping the engine releases all of its state.

use crate::config::NormalizerConfig;
use crate::error::NormalizerError;

/// Effective configuration an engine reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Number of channels.
    pub channels: u32,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frame length in samples.
    pub frame_len: u32,
    /// Gaussian filter size in frames.
    pub filter_size: u32,
}

/// Operation set of a dynamic audio normalization engine.
///
/// # Example
///
/// ```rust
/// use dynaudnorm_core::{DynamicNormalizer, Normalizer, NormalizerConfig};
///
/// let mut engine = DynamicNormalizer::new(NormalizerConfig::new(1, 8000).with_frame_len_ms(10));
/// engine.initialize().unwrap();
///
/// let input = vec![0.1_f32; 256];
/// let mut output = vec![0.0_f32; 256];
/// let written = engine
///     .process(&[&input[..]], &mut [&mut output[..]], 256)
///     .unwrap();
/// assert!(written <= 256);
/// ```
pub trait Normalizer: Send {
    /// Construct an engine from `config`. No processing state is allocated
    /// until [`initialize`](Self::initialize).
    fn new(config: NormalizerConfig) -> Self
    where
        Self: Sized;

    /// Allocate processing state. Calling it again re-initializes.
    fn initialize(&mut self) -> Result<(), NormalizerError>;

    /// Process `frames` samples per channel from `input` into `output`.
    ///
    /// Both slices of buffers must hold exactly one buffer per configured
    /// channel, each at least `frames` long. Returns the number of samples
    /// written per channel.
    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<usize, NormalizerError>;

    /// Process `frames` samples per channel in place.
    ///
    /// Output samples are written to the front of each buffer; the returned
    /// count says how many are valid.
    fn process_inplace(
        &mut self,
        buffers: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<usize, NormalizerError>;

    /// Drain buffered samples into `output`, at most `capacity` per channel.
    ///
    /// Returns the number written. Zero means the engine holds no more input.
    fn flush_buffer(
        &mut self,
        output: &mut [&mut [f32]],
        capacity: usize,
    ) -> Result<usize, NormalizerError>;

    /// Drop all buffered audio and gain history, keeping the configuration.
    fn reset(&mut self) -> Result<(), NormalizerError>;

    /// Report the effective configuration.
    fn configuration(&self) -> Configuration;

    /// Report the processing delay in samples, or `None` before
    /// initialization.
    fn internal_delay(&self) -> Option<usize>;
}
