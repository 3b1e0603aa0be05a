//! Dynaudnorm Core - dynamic audio normalization engine
//!
//! This crate defines the [`Normalizer`] trait, the operation set plugin
//! adapters use to drive a normalization engine, together with its
//! configuration and error types, and ships one implementation:
//! [`DynamicNormalizer`].
//!
//! # Core Abstractions
//!
//! - [`Normalizer`] - Engine trait (initialize, process, process in place,
//!   flush, reset, configuration, internal delay)
//! - [`NormalizerConfig`] - Construction parameters with documented ranges
//! - [`NormalizerError`] / [`ConfigError`] - Error types
//!
//! ## Building Blocks
//!
//! - [`GainQueue`] - Fixed-capacity FIFO backing the smoothing stages
//! - [`GaussianFilter`] - Normalized Gaussian kernel
//! - [`soft_limit`] - erf-based soft limiter used for compression
//!
//! # Example
//!
//! ```rust
//! use dynaudnorm_core::{DynamicNormalizer, Normalizer, NormalizerConfig};
//!
//! let config = NormalizerConfig::new(1, 8000).with_frame_len_ms(10).with_filter_size(3);
//! let mut engine = DynamicNormalizer::new(config);
//! engine.initialize().unwrap();
//!
//! // Pre-fill the internal delay so every later block comes back full length.
//! let delay = engine.internal_delay().unwrap();
//! let mut silence = vec![0.0_f32; delay];
//! engine.process_inplace(&mut [&mut silence[..]], delay).unwrap();
//!
//! let mut block = vec![0.1_f32; 64];
//! let written = engine.process_inplace(&mut [&mut block[..]], 64).unwrap();
//! assert_eq!(written, 64);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dynaudnorm-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: All state is allocated in `initialize`; processing
//!   never allocates
//! - **No dependencies on std**: `libm` for math
//! - **Swappable engines**: Adapters are generic over [`Normalizer`]

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod config;
pub mod dynamic;
pub mod error;
pub mod gaussian;
pub mod history;
pub mod normalizer;

pub use config::{ConfigError, NormalizerConfig, ParamRange};
pub use dynamic::{DynamicNormalizer, soft_limit};
pub use error::NormalizerError;
pub use gaussian::GaussianFilter;
pub use history::GainQueue;
pub use normalizer::{Configuration, Normalizer};
