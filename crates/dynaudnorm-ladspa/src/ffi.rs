//! LADSPA C ABI types and constants.
//!
//! Mirrors `ladspa.h` (LADSPA SDK 1.1). Layouts are `#[repr(C)]` and must not
//! change: hosts read these structures directly. Field names are snake_case
//! versions of the header's names.

use std::ffi::{c_char, c_int, c_ulong, c_void};

/// Sample and control value type (`LADSPA_Data`).
pub type Data = f32;

/// Opaque per-instance handle (`LADSPA_Handle`).
pub type Handle = *mut c_void;

/// Plugin property bitmask (`LADSPA_Properties`).
pub type Properties = c_int;

/// Plugin has a real-time dependency (e.g. listens to a MIDI device).
pub const PROPERTY_REALTIME: Properties = 0x1;
/// Plugin may not be run with input and output on the same buffer.
pub const PROPERTY_INPLACE_BROKEN: Properties = 0x2;
/// Plugin is capable of running in a hard real-time environment.
pub const PROPERTY_HARD_RT_CAPABLE: Properties = 0x4;

/// Port type/direction bitmask (`LADSPA_PortDescriptor`).
pub type PortDescriptor = c_int;

/// Port is an input.
pub const PORT_INPUT: PortDescriptor = 0x1;
/// Port is an output.
pub const PORT_OUTPUT: PortDescriptor = 0x2;
/// Port carries a single control value.
pub const PORT_CONTROL: PortDescriptor = 0x4;
/// Port carries a block of audio samples.
pub const PORT_AUDIO: PortDescriptor = 0x8;

/// Range hint bitmask (`LADSPA_PortRangeHintDescriptor`).
pub type HintDescriptor = c_int;

/// `lower_bound` is meaningful.
pub const HINT_BOUNDED_BELOW: HintDescriptor = 0x1;
/// `upper_bound` is meaningful.
pub const HINT_BOUNDED_ABOVE: HintDescriptor = 0x2;
/// Port is a boolean toggle.
pub const HINT_TOGGLED: HintDescriptor = 0x4;
/// Bounds are multiples of the sample rate.
pub const HINT_SAMPLE_RATE: HintDescriptor = 0x8;
/// Port is best presented on a logarithmic scale.
pub const HINT_LOGARITHMIC: HintDescriptor = 0x10;
/// Port takes integer values.
pub const HINT_INTEGER: HintDescriptor = 0x20;

/// Mask selecting the default-value bits.
pub const HINT_DEFAULT_MASK: HintDescriptor = 0x3C0;
/// No default.
pub const HINT_DEFAULT_NONE: HintDescriptor = 0x0;
/// Default to the lower bound.
pub const HINT_DEFAULT_MINIMUM: HintDescriptor = 0x40;
/// Default between lower bound and middle.
pub const HINT_DEFAULT_LOW: HintDescriptor = 0x80;
/// Default to the middle of the range.
pub const HINT_DEFAULT_MIDDLE: HintDescriptor = 0xC0;
/// Default between middle and upper bound.
pub const HINT_DEFAULT_HIGH: HintDescriptor = 0x100;
/// Default to the upper bound.
pub const HINT_DEFAULT_MAXIMUM: HintDescriptor = 0x140;

/// Range hint for one port (`LADSPA_PortRangeHint`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortRangeHint {
    /// Hint bitmask.
    pub hint_descriptor: HintDescriptor,
    /// Lower bound, valid with [`HINT_BOUNDED_BELOW`].
    pub lower_bound: Data,
    /// Upper bound, valid with [`HINT_BOUNDED_ABOVE`].
    pub upper_bound: Data,
}

/// Plugin descriptor (`LADSPA_Descriptor`).
#[repr(C)]
pub struct Descriptor {
    /// Globally unique plugin ID.
    pub unique_id: c_ulong,
    /// Short identifier, no spaces.
    pub label: *const c_char,
    /// Property bitmask.
    pub properties: Properties,
    /// Human-readable plugin name.
    pub name: *const c_char,
    /// Author.
    pub maker: *const c_char,
    /// License or copyright notice.
    pub copyright: *const c_char,
    /// Number of ports; length of the three port arrays.
    pub port_count: c_ulong,
    /// Port type/direction per port.
    pub port_descriptors: *const PortDescriptor,
    /// Display name per port.
    pub port_names: *const *const c_char,
    /// Range hint per port.
    pub port_range_hints: *const PortRangeHint,
    /// Reserved for the plugin; unused here.
    pub implementation_data: *mut c_void,
    /// Create an instance for a sample rate.
    pub instantiate: Option<unsafe extern "C" fn(*const Descriptor, c_ulong) -> Handle>,
    /// Connect a port to a data location.
    pub connect_port: Option<unsafe extern "C" fn(Handle, c_ulong, *mut Data)>,
    /// Reset state before running.
    pub activate: Option<unsafe extern "C" fn(Handle)>,
    /// Process a block.
    pub run: Option<unsafe extern "C" fn(Handle, c_ulong)>,
    /// Process a block, adding into the outputs.
    pub run_adding: Option<unsafe extern "C" fn(Handle, c_ulong)>,
    /// Set the gain used by `run_adding`.
    pub set_run_adding_gain: Option<unsafe extern "C" fn(Handle, Data)>,
    /// Counterpart of `activate`.
    pub deactivate: Option<unsafe extern "C" fn(Handle)>,
    /// Free the instance.
    pub cleanup: Option<unsafe extern "C" fn(Handle)>,
}

/// Signature of the exported `ladspa_descriptor` symbol.
pub type DescriptorFunction = unsafe extern "C" fn(c_ulong) -> *const Descriptor;
