//! Delay priming.
//!
//! An engine reports its processing delay only once it is initialized.
//! Feeding that many zeros through it before the first host block means every
//! `run` afterwards gets a full block back, already time-aligned.

use dynaudnorm_core::Normalizer;

/// Push `internal_delay()` zeros per channel through `engine`, in place.
///
/// Returns the primed delay, or `None` when the engine reports none. A
/// zero-length delay needs no priming and skips the engine call. Engine
/// errors are logged and otherwise ignored.
pub fn prime_delay<E: Normalizer>(engine: &mut E, channels: usize) -> Option<usize> {
    let delay = engine.internal_delay()?;
    if delay == 0 {
        return Some(0);
    }

    let mut silence: Vec<Vec<f32>> = vec![vec![0.0; delay]; channels];
    let mut buffers: Vec<&mut [f32]> = silence.iter_mut().map(Vec::as_mut_slice).collect();

    match engine.process_inplace(&mut buffers, delay) {
        Ok(_) => tracing::debug!(delay, channels, "primed engine delay"),
        Err(err) => tracing::warn!(%err, delay, channels, "delay priming failed"),
    }
    Some(delay)
}
