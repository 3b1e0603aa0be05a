//! Gaussian smoothing kernel for gain sequences.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::history::GainQueue;

/// Normalized Gaussian kernel of odd size.
///
/// Sigma follows the window size so that the kernel tails reach roughly
/// three standard deviations at the window edges:
///
/// ```text
/// sigma = ((size / 2) - 1) / 3 + 1 / 3
/// ```
#[derive(Debug, Clone)]
pub struct GaussianFilter {
    weights: Vec<f64>,
}

impl GaussianFilter {
    /// Build a kernel with `size` taps. `size` must be odd and non-zero.
    pub fn new(size: usize) -> Self {
        debug_assert!(size % 2 == 1, "Gaussian kernel size must be odd");
        let radius = (size / 2) as f64;
        let sigma = (radius - 1.0) / 3.0 + 1.0 / 3.0;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut weights: Vec<f64> = (0..size)
            .map(|i| {
                let x = i as f64 - radius;
                libm::exp(-(x * x) / two_sigma_sq)
            })
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { weights }
    }

    /// Number of taps.
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// Tap weights, summing to one.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted sum over a full queue, oldest value on the first tap.
    ///
    /// Returns `None` unless the queue holds exactly `size()` values.
    pub fn apply(&self, queue: &GainQueue) -> Option<f64> {
        if queue.len() != self.weights.len() {
            return None;
        }
        let sum = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, w)| w * queue.get(i).unwrap_or(0.0))
            .sum();
        Some(sum)
    }
}
