//! Descriptor registry.
//!
//! [`DescriptorRegistry`] owns one [`PluginDescriptor`] per channel variant,
//! indexed the way hosts enumerate them. The process-wide registry behind
//! [`lookup`] is built once by [`initialize`] (library load) and released
//! once by [`teardown`] (library unload); repeated calls are no-ops.

use std::ptr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use dynaudnorm_core::{DynamicNormalizer, Normalizer};

use crate::channels::ChannelVariant;
use crate::descriptor::PluginDescriptor;
use crate::ffi;

/// One descriptor per channel variant, ordered mono to 7.1.
#[derive(Debug)]
pub struct DescriptorRegistry {
    descriptors: Vec<PluginDescriptor>,
}

impl DescriptorRegistry {
    /// Build descriptors for every variant, bound to engine type `E`.
    pub fn new<E: Normalizer + 'static>() -> Self {
        let descriptors = ChannelVariant::ALL
            .iter()
            .map(|&variant| PluginDescriptor::new::<E>(variant))
            .collect();
        Self { descriptors }
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no descriptors were built.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor at `index`.
    pub fn get(&self, index: usize) -> Option<&PluginDescriptor> {
        self.descriptors.get(index)
    }

    /// Descriptor with the given LADSPA label.
    pub fn by_label(&self, label: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|d| d.variant().label() == label)
    }

    /// Iterate over all descriptors.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }
}

enum GlobalState {
    Uninitialized,
    Ready(DescriptorRegistry),
    TornDown,
}

static GLOBAL: Mutex<GlobalState> = Mutex::new(GlobalState::Uninitialized);

fn global() -> MutexGuard<'static, GlobalState> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn build_into(state: &mut GlobalState) {
    crate::logging::init();
    let registry = DescriptorRegistry::new::<DynamicNormalizer>();
    tracing::info!(descriptors = registry.len(), "descriptor registry initialized");
    *state = GlobalState::Ready(registry);
}

/// Build the process-wide registry.
///
/// Returns `true` if this call built it; `false` if it was already built or
/// has been torn down.
pub fn initialize() -> bool {
    let mut state = global();
    match *state {
        GlobalState::Uninitialized => {
            build_into(&mut state);
            true
        }
        GlobalState::Ready(_) => {
            tracing::debug!("descriptor registry already initialized");
            false
        }
        GlobalState::TornDown => {
            tracing::debug!("descriptor registry already torn down; not rebuilding");
            false
        }
    }
}

/// Release the process-wide registry and everything its descriptors own.
///
/// Returns `true` if this call released it.
pub fn teardown() -> bool {
    let mut state = global();
    match std::mem::replace(&mut *state, GlobalState::TornDown) {
        GlobalState::Ready(registry) => {
            drop(registry);
            tracing::info!("descriptor registry torn down");
            true
        }
        GlobalState::Uninitialized => {
            *state = GlobalState::Uninitialized;
            tracing::debug!("descriptor registry teardown before initialize ignored");
            false
        }
        GlobalState::TornDown => false,
    }
}

/// Raw descriptor at `index` from the process-wide registry, or null.
///
/// Builds the registry on first use if no load hook did. The returned
/// pointer stays valid until [`teardown`].
pub fn lookup(index: usize) -> *const ffi::Descriptor {
    let mut state = global();
    if matches!(*state, GlobalState::Uninitialized) {
        build_into(&mut state);
    }
    match &*state {
        GlobalState::Ready(registry) => registry
            .get(index)
            .map_or(ptr::null(), PluginDescriptor::as_ptr),
        _ => ptr::null(),
    }
}
