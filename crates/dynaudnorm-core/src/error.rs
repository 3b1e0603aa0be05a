//! Error types for normalizer engines.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors returned by [`Normalizer`](crate::Normalizer) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizerError {
    /// Processing was requested before a successful `initialize()`.
    #[error("normalizer is not initialized")]
    NotInitialized,

    /// The number of buffers does not match the configured channel count.
    #[error("channel mismatch: expected {expected} buffers, got {actual}")]
    ChannelMismatch {
        /// Configured channel count.
        expected: usize,
        /// Number of buffers supplied.
        actual: usize,
    },

    /// A channel buffer holds fewer samples than the requested frame count.
    #[error("buffer for channel {channel} too short: need {required} samples, got {actual}")]
    BufferTooShort {
        /// Channel index.
        channel: usize,
        /// Samples required.
        required: usize,
        /// Samples available.
        actual: usize,
    },

    /// The configuration was rejected during initialization.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
