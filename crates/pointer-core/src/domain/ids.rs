//! Identifier newtypes for logical displays and input devices.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a logical display.
///
/// `-1` is reserved for "no display" ([`DisplayId::INVALID`]) and `0` is the
/// built-in default display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub i32);

impl DisplayId {
    pub const INVALID: DisplayId = DisplayId(-1);
    pub const DEFAULT: DisplayId = DisplayId(0);

    /// Returns `true` unless this is [`DisplayId::INVALID`].
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for DisplayId {
    fn default() -> Self {
        DisplayId::INVALID
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies an input device as assigned by the upstream device reader.
///
/// Negative values never name a real device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub i32);

impl DeviceId {
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
