//! `extern "C"` lifecycle entry points.
//!
//! Each function is generic over the engine type so one set of trampolines
//! serves the bundled engine and test doubles alike. The host handle is a
//! `Box<PluginInstance<E>>` turned into a raw pointer; null handles and
//! malformed calls are ignored rather than trusted.

use std::ffi::c_ulong;
use std::ptr;

use dynaudnorm_core::Normalizer;

use crate::channels::ChannelVariant;
use crate::ffi;
use crate::instance::PluginInstance;

/// Recover the instance behind `handle`.
///
/// # Safety
///
/// `handle` must be null or a live pointer returned by [`instantiate`] for
/// the same `E`, not aliased for the returned lifetime.
unsafe fn instance_mut<'a, E: Normalizer>(handle: ffi::Handle) -> Option<&'a mut PluginInstance<E>> {
    // SAFETY: forwarded from the caller.
    unsafe { handle.cast::<PluginInstance<E>>().as_mut() }
}

/// `instantiate` slot.
///
/// # Safety
///
/// `descriptor` must be null or point to a valid descriptor.
pub unsafe extern "C" fn instantiate<E: Normalizer>(
    descriptor: *const ffi::Descriptor,
    sample_rate: c_ulong,
) -> ffi::Handle {
    // SAFETY: caller passes null or a valid descriptor.
    let Some(descriptor) = (unsafe { descriptor.as_ref() }) else {
        return ptr::null_mut();
    };
    let Some(variant) = usize::try_from(descriptor.port_count)
        .ok()
        .and_then(ChannelVariant::from_port_count)
    else {
        tracing::warn!(port_count = descriptor.port_count, "instantiate: unknown descriptor");
        return ptr::null_mut();
    };

    let sample_rate = u32::try_from(sample_rate).unwrap_or(u32::MAX);
    tracing::debug!(label = variant.label(), sample_rate, "instantiate");
    Box::into_raw(Box::new(PluginInstance::<E>::new(variant, sample_rate))).cast()
}

/// `connect_port` slot.
///
/// # Safety
///
/// See [`PluginInstance::connect_port`].
pub unsafe extern "C" fn connect_port<E: Normalizer>(
    handle: ffi::Handle,
    port: c_ulong,
    data: *mut ffi::Data,
) {
    // SAFETY: host passes a handle from `instantiate`.
    let Some(instance) = (unsafe { instance_mut::<E>(handle) }) else {
        return;
    };
    let Ok(port) = usize::try_from(port) else {
        return;
    };
    // SAFETY: the host guarantees `data` stays valid while connected.
    unsafe { instance.connect_port(port, data) };
}

/// `activate` slot.
///
/// # Safety
///
/// See [`PluginInstance::activate`].
pub unsafe extern "C" fn activate<E: Normalizer>(handle: ffi::Handle) {
    // SAFETY: host passes a handle from `instantiate`.
    if let Some(instance) = unsafe { instance_mut::<E>(handle) } {
        // SAFETY: connected control ports are valid per the LADSPA contract.
        unsafe { instance.activate() };
    }
}

/// `run` slot.
///
/// # Safety
///
/// See [`PluginInstance::run`].
pub unsafe extern "C" fn run<E: Normalizer>(handle: ffi::Handle, sample_count: c_ulong) {
    // SAFETY: host passes a handle from `instantiate`.
    let Some(instance) = (unsafe { instance_mut::<E>(handle) }) else {
        return;
    };
    let Ok(sample_count) = usize::try_from(sample_count) else {
        return;
    };
    // SAFETY: connected audio buffers hold `sample_count` samples per the
    // LADSPA contract.
    unsafe { instance.run(sample_count) };
}

/// `deactivate` slot.
///
/// # Safety
///
/// `handle` must be null or come from [`instantiate`].
pub unsafe extern "C" fn deactivate<E: Normalizer>(handle: ffi::Handle) {
    // SAFETY: host passes a handle from `instantiate`.
    if let Some(instance) = unsafe { instance_mut::<E>(handle) } {
        instance.deactivate();
    }
}

/// `cleanup` slot. Frees the instance and any engine still attached.
///
/// # Safety
///
/// `handle` must be null or come from [`instantiate`], and must not be used
/// again.
pub unsafe extern "C" fn cleanup<E: Normalizer>(handle: ffi::Handle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: `handle` came from `Box::into_raw` in `instantiate` and the
    // host gives up ownership here.
    let instance = unsafe { Box::from_raw(handle.cast::<PluginInstance<E>>()) };
    tracing::debug!(
        label = instance.variant().label(),
        active = instance.is_active(),
        "cleanup"
    );
    drop(instance);
}
