//! LADSPA plugin adapter for the dynamic audio normalizer.
//!
//! The compiled `cdylib` is a LADSPA library publishing eight plugins, one
//! per channel layout from mono to 7.1. Each drives a
//! [`dynaudnorm_core::DynamicNormalizer`] through the
//! [`Normalizer`](dynaudnorm_core::Normalizer) trait.
//!
//! # Architecture
//!
//! | LADSPA | Here |
//! |--------|------|
//! | `ladspa_descriptor(index)` | [`ladspa_descriptor`] → [`registry::lookup`] |
//! | `LADSPA_Descriptor` | [`PluginDescriptor`] (owns its strings and arrays) |
//! | port table | [`PortLayout`] |
//! | `LADSPA_Handle` | `Box<`[`PluginInstance`]`>` |
//! | `instantiate` .. `cleanup` | [`callbacks`], generic over the engine |
//!
//! | Variant | Label | Unique ID | Ports |
//! |---------|-------|-----------|-------|
//! | Mono | `dynaudnorm_mono` | 9901 | 11 |
//! | Stereo | `dynaudnorm_stereo` | 9902 | 13 |
//! | 2.1 | `dynaudnorm_21` | 9903 | 15 |
//! | 4.0 | `dynaudnorm_40` | 9904 | 17 |
//! | 4.1 | `dynaudnorm_41` | 9905 | 19 |
//! | 5.1 | `dynaudnorm_51` | 9906 | 21 |
//! | 6.1 | `dynaudnorm_61` | 9907 | 23 |
//! | 7.1 | `dynaudnorm_71` | 9908 | 25 |
//!
//! On activation the engine's internal delay is filled with silence, so
//! output lags input by exactly that delay and every `run` returns a full
//! block.
//!
//! # Testing with a custom engine
//!
//! [`DescriptorRegistry::new`] binds the callbacks to any
//! [`Normalizer`](dynaudnorm_core::Normalizer), so a test can drive the full
//! C ABI against a mock:
//!
//! ```rust,ignore
//! let registry = DescriptorRegistry::new::<MockEngine>();
//! let raw = registry.get(1).unwrap().as_raw();
//! let handle = unsafe { (raw.instantiate.unwrap())(raw, 44100) };
//! ```

#![allow(unsafe_code)]

pub mod callbacks;
pub mod channels;
pub mod descriptor;
pub mod ffi;
pub mod instance;
pub mod logging;
pub mod ports;
pub mod priming;
pub mod registry;

use std::ffi::c_ulong;

pub use channels::{ChannelVariant, MAX_CHANNELS};
pub use descriptor::PluginDescriptor;
pub use instance::PluginInstance;
pub use ports::{ControlPort, PortLayout};
pub use registry::DescriptorRegistry;

/// LADSPA enumeration entry point.
///
/// Returns the descriptor at `index`, or null past the last variant.
#[unsafe(no_mangle)]
pub extern "C" fn ladspa_descriptor(index: c_ulong) -> *const ffi::Descriptor {
    match usize::try_from(index) {
        Ok(index) => registry::lookup(index),
        Err(_) => std::ptr::null(),
    }
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
mod load_hooks {
    extern "C" fn on_load() {
        crate::registry::initialize();
    }

    extern "C" fn on_unload() {
        crate::registry::teardown();
    }

    #[used]
    #[unsafe(link_section = ".init_array")]
    static INIT: extern "C" fn() = on_load;

    #[used]
    #[unsafe(link_section = ".fini_array")]
    static FINI: extern "C" fn() = on_unload;
}
