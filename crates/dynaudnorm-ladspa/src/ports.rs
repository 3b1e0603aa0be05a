//! Port layout builder.
//!
//! Every variant exposes the same nine control ports followed by one
//! (input, output) audio pair per channel:
//!
//! | Index | Port |
//! |-------|------|
//! | 0..=8 | [`ControlPort`] in declaration order |
//! | 9 + 2i | `Input{i}` |
//! | 10 + 2i | `Output{i}` |
//!
//! [`PortLayout::build`] is pure; the descriptor module turns the result into
//! the C arrays a host reads.

use dynaudnorm_core::config::{
    ALT_BOUNDARY, CHANNEL_COUPLING, COMPRESS_FACTOR, DC_CORRECTION, FILTER_SIZE, FRAME_LEN_MS,
    MAX_GAIN, PEAK, TARGET_RMS,
};
use dynaudnorm_core::{NormalizerConfig, ParamRange};

use crate::channels::{CONTROL_PORT_COUNT, ChannelVariant};
use crate::ffi;

/// The nine control ports, in port-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlPort {
    /// Frame length in milliseconds.
    FrameLength,
    /// Gaussian filter size in frames.
    FilterSize,
    /// Target peak magnitude.
    Peak,
    /// Maximum gain factor.
    MaxGain,
    /// Target RMS (0 disables).
    TargetRms,
    /// Compression factor (0 disables).
    CompressFactor,
    /// Channel coupling toggle.
    ChannelCoupling,
    /// DC correction toggle.
    DcCorrection,
    /// Alternative boundary mode toggle.
    AltBoundary,
}

impl ControlPort {
    /// All control ports in index order.
    pub const ALL: [ControlPort; CONTROL_PORT_COUNT] = [
        ControlPort::FrameLength,
        ControlPort::FilterSize,
        ControlPort::Peak,
        ControlPort::MaxGain,
        ControlPort::TargetRms,
        ControlPort::CompressFactor,
        ControlPort::ChannelCoupling,
        ControlPort::DcCorrection,
        ControlPort::AltBoundary,
    ];

    /// Port index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Control port at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Host-visible port name.
    pub const fn name(self) -> &'static str {
        match self {
            ControlPort::FrameLength => "Frame length (ms)",
            ControlPort::FilterSize => "Gaussian filter size (frames)",
            ControlPort::Peak => "Target peak",
            ControlPort::MaxGain => "Maximum gain",
            ControlPort::TargetRms => "Target RMS",
            ControlPort::CompressFactor => "Compression factor",
            ControlPort::ChannelCoupling => "Channel coupling",
            ControlPort::DcCorrection => "DC correction",
            ControlPort::AltBoundary => "Alternative boundary mode",
        }
    }

    /// Value range, shared with the engine configuration.
    pub const fn range(self) -> ParamRange {
        match self {
            ControlPort::FrameLength => FRAME_LEN_MS,
            ControlPort::FilterSize => FILTER_SIZE,
            ControlPort::Peak => PEAK,
            ControlPort::MaxGain => MAX_GAIN,
            ControlPort::TargetRms => TARGET_RMS,
            ControlPort::CompressFactor => COMPRESS_FACTOR,
            ControlPort::ChannelCoupling => CHANNEL_COUPLING,
            ControlPort::DcCorrection => DC_CORRECTION,
            ControlPort::AltBoundary => ALT_BOUNDARY,
        }
    }

    /// Where within the range a host should place its default.
    pub const fn default_hint(self) -> DefaultHint {
        match self {
            ControlPort::FrameLength | ControlPort::FilterSize | ControlPort::MaxGain => {
                DefaultHint::Middle
            }
            ControlPort::Peak => DefaultHint::High,
            ControlPort::ChannelCoupling => DefaultHint::Maximum,
            ControlPort::TargetRms
            | ControlPort::CompressFactor
            | ControlPort::DcCorrection
            | ControlPort::AltBoundary => DefaultHint::Minimum,
        }
    }

    /// Write a host control value into `params`.
    ///
    /// Integer ports truncate toward zero; toggles treat any nonzero value
    /// as on. Range clamping is left to the engine.
    pub fn apply(self, params: &mut NormalizerConfig, value: f32) {
        match self {
            ControlPort::FrameLength => params.frame_len_ms = value as u32,
            ControlPort::FilterSize => params.filter_size = value as u32,
            ControlPort::Peak => params.peak = f64::from(value),
            ControlPort::MaxGain => params.max_gain = f64::from(value),
            ControlPort::TargetRms => params.target_rms = f64::from(value),
            ControlPort::CompressFactor => params.compress_factor = f64::from(value),
            ControlPort::ChannelCoupling => params.channels_coupled = value != 0.0,
            ControlPort::DcCorrection => params.dc_correction = value != 0.0,
            ControlPort::AltBoundary => params.alt_boundary = value != 0.0,
        }
    }
}

/// Default-value position hint (`LADSPA_HINT_DEFAULT_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultHint {
    /// No default.
    None,
    /// Lower bound.
    Minimum,
    /// Midpoint.
    Middle,
    /// Between midpoint and upper bound.
    High,
    /// Upper bound.
    Maximum,
}

impl DefaultHint {
    /// LADSPA hint bits.
    pub const fn bits(self) -> ffi::HintDescriptor {
        match self {
            DefaultHint::None => ffi::HINT_DEFAULT_NONE,
            DefaultHint::Minimum => ffi::HINT_DEFAULT_MINIMUM,
            DefaultHint::Middle => ffi::HINT_DEFAULT_MIDDLE,
            DefaultHint::High => ffi::HINT_DEFAULT_HIGH,
            DefaultHint::Maximum => ffi::HINT_DEFAULT_MAXIMUM,
        }
    }
}

/// Data flow direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    /// Host to plugin.
    Input,
    /// Plugin to host.
    Output,
}

/// What a port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// One value per block.
    Control,
    /// One sample per frame.
    Audio,
}

/// Bounded range hint of a control port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeHint {
    /// Lower bound.
    pub lower: f32,
    /// Upper bound.
    pub upper: f32,
    /// Default position.
    pub default: DefaultHint,
}

impl RangeHint {
    fn for_control(port: ControlPort) -> Self {
        let range = port.range();
        Self {
            lower: range.min as f32,
            upper: range.max as f32,
            default: port.default_hint(),
        }
    }
}

/// One entry of a port layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    /// Direction.
    pub direction: PortDirection,
    /// Control or audio.
    pub kind: PortKind,
    /// Display name.
    pub name: String,
    /// Range hint; `None` for audio ports.
    pub hint: Option<RangeHint>,
}

impl PortInfo {
    /// LADSPA port descriptor bits.
    pub fn descriptor_bits(&self) -> ffi::PortDescriptor {
        let direction = match self.direction {
            PortDirection::Input => ffi::PORT_INPUT,
            PortDirection::Output => ffi::PORT_OUTPUT,
        };
        let kind = match self.kind {
            PortKind::Control => ffi::PORT_CONTROL,
            PortKind::Audio => ffi::PORT_AUDIO,
        };
        direction | kind
    }

    /// LADSPA range hint.
    pub fn range_hint(&self) -> ffi::PortRangeHint {
        match self.hint {
            Some(hint) => ffi::PortRangeHint {
                hint_descriptor: ffi::HINT_BOUNDED_BELOW
                    | ffi::HINT_BOUNDED_ABOVE
                    | hint.default.bits(),
                lower_bound: hint.lower,
                upper_bound: hint.upper,
            },
            None => ffi::PortRangeHint {
                hint_descriptor: ffi::HINT_DEFAULT_NONE,
                lower_bound: 0.0,
                upper_bound: 0.0,
            },
        }
    }
}

/// Role of a port index on a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    /// One of the nine control ports.
    Control(ControlPort),
    /// Audio input of the given channel.
    AudioInput(usize),
    /// Audio output of the given channel.
    AudioOutput(usize),
}

impl PortRole {
    /// Decode `port` for a variant with `channels` channels.
    ///
    /// Returns `None` past the last audio port.
    pub fn from_index(port: usize, channels: usize) -> Option<Self> {
        if let Some(control) = ControlPort::from_index(port) {
            return Some(PortRole::Control(control));
        }
        let audio = port - CONTROL_PORT_COUNT;
        let channel = audio / 2;
        if channel >= channels {
            return None;
        }
        Some(if audio % 2 == 0 {
            PortRole::AudioInput(channel)
        } else {
            PortRole::AudioOutput(channel)
        })
    }
}

/// Ordered port table of one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PortLayout {
    channels: usize,
    ports: Vec<PortInfo>,
}

impl PortLayout {
    /// Build the port table for `variant`.
    pub fn build(variant: ChannelVariant) -> Self {
        let channels = variant.channels();
        let mut ports = Vec::with_capacity(variant.port_count());

        for control in ControlPort::ALL {
            ports.push(PortInfo {
                direction: PortDirection::Input,
                kind: PortKind::Control,
                name: control.name().to_owned(),
                hint: Some(RangeHint::for_control(control)),
            });
        }

        for i in 0..channels {
            ports.push(PortInfo {
                direction: PortDirection::Input,
                kind: PortKind::Audio,
                name: format!("Input{i}"),
                hint: None,
            });
            ports.push(PortInfo {
                direction: PortDirection::Output,
                kind: PortKind::Audio,
                name: format!("Output{i}"),
                hint: None,
            });
        }

        Self { channels, ports }
    }

    /// Number of audio channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always `false`: the control block is never empty.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Port at `index`.
    pub fn get(&self, index: usize) -> Option<&PortInfo> {
        self.ports.get(index)
    }

    /// All ports in index order.
    pub fn ports(&self) -> &[PortInfo] {
        &self.ports
    }

    /// Role of the port at `index`.
    pub fn role(&self, index: usize) -> Option<PortRole> {
        PortRole::from_index(index, self.channels)
    }
}
