//! Supported channel layouts.
//!
//! One plugin variant is published per channel count from mono to 7.1. Each
//! variant has a stable LADSPA label and unique ID, so hosts can keep saved
//! sessions across releases.

/// Largest channel count any variant supports.
pub const MAX_CHANNELS: usize = 8;

/// Number of control ports preceding the audio ports on every variant.
pub const CONTROL_PORT_COUNT: usize = 9;

/// Unique IDs are `UNIQUE_ID_BASE + channels`.
pub const UNIQUE_ID_BASE: u64 = 9900;

/// A published channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelVariant {
    /// 1 channel.
    Mono,
    /// 2 channels.
    Stereo,
    /// 3 channels.
    TwoOne,
    /// 4 channels.
    Quad,
    /// 5 channels.
    FourOne,
    /// 6 channels.
    FiveOne,
    /// 7 channels.
    SixOne,
    /// 8 channels.
    SevenOne,
}

impl ChannelVariant {
    /// All variants, ordered by channel count. Registry index `i` holds
    /// `ALL[i]`.
    pub const ALL: [ChannelVariant; MAX_CHANNELS] = [
        ChannelVariant::Mono,
        ChannelVariant::Stereo,
        ChannelVariant::TwoOne,
        ChannelVariant::Quad,
        ChannelVariant::FourOne,
        ChannelVariant::FiveOne,
        ChannelVariant::SixOne,
        ChannelVariant::SevenOne,
    ];

    /// Number of audio channels.
    pub const fn channels(self) -> usize {
        match self {
            ChannelVariant::Mono => 1,
            ChannelVariant::Stereo => 2,
            ChannelVariant::TwoOne => 3,
            ChannelVariant::Quad => 4,
            ChannelVariant::FourOne => 5,
            ChannelVariant::FiveOne => 6,
            ChannelVariant::SixOne => 7,
            ChannelVariant::SevenOne => 8,
        }
    }

    /// LADSPA label (no spaces, stable across releases).
    pub const fn label(self) -> &'static str {
        match self {
            ChannelVariant::Mono => "dynaudnorm_mono",
            ChannelVariant::Stereo => "dynaudnorm_stereo",
            ChannelVariant::TwoOne => "dynaudnorm_21",
            ChannelVariant::Quad => "dynaudnorm_40",
            ChannelVariant::FourOne => "dynaudnorm_41",
            ChannelVariant::FiveOne => "dynaudnorm_51",
            ChannelVariant::SixOne => "dynaudnorm_61",
            ChannelVariant::SevenOne => "dynaudnorm_71",
        }
    }

    /// Short human-readable layout name, e.g. `"5.1"`.
    pub const fn layout_name(self) -> &'static str {
        match self {
            ChannelVariant::Mono => "Mono",
            ChannelVariant::Stereo => "Stereo",
            ChannelVariant::TwoOne => "2.1",
            ChannelVariant::Quad => "4.0",
            ChannelVariant::FourOne => "4.1",
            ChannelVariant::FiveOne => "5.1",
            ChannelVariant::SixOne => "6.1",
            ChannelVariant::SevenOne => "7.1",
        }
    }

    /// LADSPA unique ID.
    pub const fn unique_id(self) -> u64 {
        UNIQUE_ID_BASE + self.channels() as u64
    }

    /// Total ports: the control block plus one input and one output per
    /// channel.
    pub const fn port_count(self) -> usize {
        CONTROL_PORT_COUNT + 2 * self.channels()
    }

    /// Plugin display name.
    pub fn display_name(self) -> String {
        format!("Dynamic Audio Normalizer ({})", self.layout_name())
    }

    /// Variant with exactly `channels` channels.
    pub fn from_channels(channels: usize) -> Option<Self> {
        channels
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Variant whose port table has `port_count` entries.
    pub fn from_port_count(port_count: usize) -> Option<Self> {
        let audio = port_count.checked_sub(CONTROL_PORT_COUNT)?;
        if audio % 2 != 0 {
            return None;
        }
        Self::from_channels(audio / 2)
    }
}
