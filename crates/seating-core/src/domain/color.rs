//! Group color derivation.
//!
//! Guests are tinted by their group label ("Bride's family", "College", ...).
//! The label is hashed with 32-bit FNV-1a and the hash picks a hue, so the
//! same label always yields the same color, across runs and platforms.

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

const GROUP_SATURATION: u8 = 65;
const GROUP_LIGHTNESS: u8 = 55;

/// A color in HSL space, rendered as a CSS `hsl()` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupColor {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
    /// Saturation in percent.
    pub saturation: u8,
    /// Lightness in percent.
    pub lightness: u8,
}

impl GroupColor {
    /// Neutral grey used for guests without a group.
    pub const UNGROUPED: GroupColor = GroupColor {
        hue: 0,
        saturation: 0,
        lightness: 70,
    };
}

impl std::fmt::Display for GroupColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Maps a group label to its display color.
///
/// Leading and trailing whitespace is ignored; a blank label maps to
/// [`GroupColor::UNGROUPED`].
pub fn group_color(label: &str) -> GroupColor {
    let label = label.trim();
    if label.is_empty() {
        return GroupColor::UNGROUPED;
    }
    GroupColor {
        hue: (fnv1a(label.as_bytes()) % 360) as u16,
        saturation: GROUP_SATURATION,
        lightness: GROUP_LIGHTNESS,
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}
