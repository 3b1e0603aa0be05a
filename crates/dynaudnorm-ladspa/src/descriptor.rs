//! Owned LADSPA descriptors.
//!
//! A [`PluginDescriptor`] owns every string and array its raw
//! [`ffi::Descriptor`] points into. The raw struct is boxed so its address
//! stays fixed for as long as the owner lives; moving the owner only moves
//! heap handles, never the data hosts hold pointers to.

use std::ffi::{CString, c_char, c_ulong};
use std::ptr;

use dynaudnorm_core::Normalizer;

use crate::callbacks;
use crate::channels::ChannelVariant;
use crate::ffi;
use crate::ports::PortLayout;

/// Plugin author string.
pub const MAKER: &str = env!("CARGO_PKG_AUTHORS");
/// Plugin license string.
pub const COPYRIGHT: &str = env!("CARGO_PKG_LICENSE");

/// A fully built descriptor for one channel variant.
pub struct PluginDescriptor {
    variant: ChannelVariant,
    layout: PortLayout,
    raw: Box<ffi::Descriptor>,
    // Storage referenced by `raw`. Never read directly; must outlive it.
    _label: CString,
    _name: CString,
    _maker: CString,
    _copyright: CString,
    _port_names: Vec<CString>,
    _port_name_ptrs: Box<[*const c_char]>,
    _port_descriptors: Box<[ffi::PortDescriptor]>,
    _port_range_hints: Box<[ffi::PortRangeHint]>,
}

// SAFETY: every raw pointer in `raw` and `_port_name_ptrs` points into heap
// storage owned by this struct, and nothing mutates it after construction.
unsafe impl Send for PluginDescriptor {}
// SAFETY: as above; shared access is read-only.
unsafe impl Sync for PluginDescriptor {}

impl PluginDescriptor {
    /// Build the descriptor for `variant`, wiring the lifecycle callbacks to
    /// engine type `E`.
    pub fn new<E: Normalizer + 'static>(variant: ChannelVariant) -> Self {
        let layout = PortLayout::build(variant);

        let label = to_cstring(variant.label());
        let name = to_cstring(&variant.display_name());
        let maker = to_cstring(MAKER);
        let copyright = to_cstring(COPYRIGHT);

        let port_names: Vec<CString> = layout.ports().iter().map(|p| to_cstring(&p.name)).collect();
        let port_name_ptrs: Box<[*const c_char]> =
            port_names.iter().map(|n| n.as_ptr()).collect();
        let port_descriptors: Box<[ffi::PortDescriptor]> =
            layout.ports().iter().map(|p| p.descriptor_bits()).collect();
        let port_range_hints: Box<[ffi::PortRangeHint]> =
            layout.ports().iter().map(|p| p.range_hint()).collect();

        let raw = Box::new(ffi::Descriptor {
            unique_id: variant.unique_id() as c_ulong,
            label: label.as_ptr(),
            properties: ffi::PROPERTY_HARD_RT_CAPABLE,
            name: name.as_ptr(),
            maker: maker.as_ptr(),
            copyright: copyright.as_ptr(),
            port_count: layout.len() as c_ulong,
            port_descriptors: port_descriptors.as_ptr(),
            port_names: port_name_ptrs.as_ptr(),
            port_range_hints: port_range_hints.as_ptr(),
            implementation_data: ptr::null_mut(),
            instantiate: Some(callbacks::instantiate::<E>),
            connect_port: Some(callbacks::connect_port::<E>),
            activate: Some(callbacks::activate::<E>),
            run: Some(callbacks::run::<E>),
            run_adding: None,
            set_run_adding_gain: None,
            deactivate: Some(callbacks::deactivate::<E>),
            cleanup: Some(callbacks::cleanup::<E>),
        });

        Self {
            variant,
            layout,
            raw,
            _label: label,
            _name: name,
            _maker: maker,
            _copyright: copyright,
            _port_names: port_names,
            _port_name_ptrs: port_name_ptrs,
            _port_descriptors: port_descriptors,
            _port_range_hints: port_range_hints,
        }
    }

    /// Channel variant this descriptor publishes.
    pub fn variant(&self) -> ChannelVariant {
        self.variant
    }

    /// Port table.
    pub fn layout(&self) -> &PortLayout {
        &self.layout
    }

    /// The C view handed to hosts. Valid while `self` is alive.
    pub fn as_raw(&self) -> &ffi::Descriptor {
        &self.raw
    }

    /// Stable pointer to the C view.
    pub fn as_ptr(&self) -> *const ffi::Descriptor {
        ptr::from_ref(self.raw.as_ref())
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("variant", &self.variant)
            .field("unique_id", &self.raw.unique_id)
            .field("port_count", &self.raw.port_count)
            .finish_non_exhaustive()
    }
}

// Names come from fixed tables and `format!` on integers.
fn to_cstring(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}
