//! Recording engine shared by the adapter tests.
#![allow(dead_code)]

use dynaudnorm_core::{Configuration, Normalizer, NormalizerConfig, NormalizerError};

/// Buffer addresses and frame count of one `process` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCall {
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
    pub frames: usize,
}

/// One `process_inplace` call.
#[derive(Debug, Clone, PartialEq)]
pub struct InplaceCall {
    pub buffers: Vec<usize>,
    pub lengths: Vec<usize>,
    pub frames: usize,
    pub all_zero: bool,
    pub first_samples: Vec<f32>,
}

/// Engine double that records every call.
///
/// Reports an internal delay of `frame_len_ms` samples (none when that is
/// zero) and fails `initialize` when the sample rate is zero.
#[derive(Debug)]
pub struct MockEngine {
    pub config: NormalizerConfig,
    pub initialized: bool,
    pub process_calls: Vec<ProcessCall>,
    pub inplace_calls: Vec<InplaceCall>,
}

impl Normalizer for MockEngine {
    fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            initialized: false,
            process_calls: Vec::new(),
            inplace_calls: Vec::new(),
        }
    }

    fn initialize(&mut self) -> Result<(), NormalizerError> {
        if self.config.sample_rate == 0 {
            return Err(NormalizerError::NotInitialized);
        }
        self.initialized = true;
        Ok(())
    }

    fn process(
        &mut self,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<usize, NormalizerError> {
        self.process_calls.push(ProcessCall {
            inputs: input.iter().map(|b| b.as_ptr() as usize).collect(),
            outputs: output.iter().map(|b| b.as_ptr() as usize).collect(),
            frames,
        });
        Ok(frames)
    }

    fn process_inplace(
        &mut self,
        buffers: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<usize, NormalizerError> {
        self.inplace_calls.push(InplaceCall {
            buffers: buffers.iter().map(|b| b.as_ptr() as usize).collect(),
            lengths: buffers.iter().map(|b| b.len()).collect(),
            frames,
            all_zero: buffers.iter().all(|b| b.iter().all(|&s| s == 0.0)),
            first_samples: buffers.iter().map(|b| b.first().copied().unwrap_or(0.0)).collect(),
        });
        Ok(frames)
    }

    fn flush_buffer(
        &mut self,
        _output: &mut [&mut [f32]],
        _capacity: usize,
    ) -> Result<usize, NormalizerError> {
        Ok(0)
    }

    fn reset(&mut self) -> Result<(), NormalizerError> {
        self.process_calls.clear();
        self.inplace_calls.clear();
        Ok(())
    }

    fn configuration(&self) -> Configuration {
        Configuration {
            channels: self.config.channels,
            sample_rate: self.config.sample_rate,
            frame_len: self.config.frame_len_ms,
            filter_size: self.config.filter_size,
        }
    }

    fn internal_delay(&self) -> Option<usize> {
        (self.initialized && self.config.frame_len_ms > 0).then_some(self.config.frame_len_ms as usize)
    }
}
