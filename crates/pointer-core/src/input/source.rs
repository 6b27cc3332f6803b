//! Device source bitmasks and pointer tool types.

use std::ops::BitOr;

/// Capability flags describing where an event or device originates.
///
/// Each source is a class bit combined with a device-specific bit, so a test
/// such as "is this from a mouse" is a subset check via [`Source::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Source(pub u32);

impl Source {
    pub const UNKNOWN: Source = Source(0);

    const CLASS_BUTTON: u32 = 0x0000_0001;
    const CLASS_POINTER: u32 = 0x0000_0002;
    const CLASS_NAVIGATION: u32 = 0x0000_0004;
    const CLASS_POSITION: u32 = 0x0000_0008;

    pub const KEYBOARD: Source = Source(0x0000_0100 | Self::CLASS_BUTTON);
    pub const TOUCHSCREEN: Source = Source(0x0000_1000 | Self::CLASS_POINTER);
    pub const MOUSE: Source = Source(0x0000_2000 | Self::CLASS_POINTER);
    pub const STYLUS: Source = Source(0x0000_4000 | Self::CLASS_POINTER);
    pub const BLUETOOTH_STYLUS: Source = Source(0x0000_8000 | Self::STYLUS.0);
    pub const TRACKBALL: Source = Source(0x0001_0000 | Self::CLASS_NAVIGATION);
    pub const MOUSE_RELATIVE: Source = Source(0x0002_0000 | Self::CLASS_NAVIGATION);
    pub const TOUCHPAD: Source = Source(0x0010_0000 | Self::CLASS_POSITION);

    /// Returns `true` if every bit of `other` is set in `self`.
    pub fn contains(self, other: Source) -> bool {
        self.0 & other.0 == other.0
    }

    /// Mouse or touchpad, but not a drawing tablet (which reports both mouse and stylus).
    pub fn is_mouse_or_touchpad(self) -> bool {
        self.contains(Source::MOUSE_RELATIVE)
            || (self.contains(Source::MOUSE) && !self.contains(Source::STYLUS))
    }

    /// Reports both mouse and stylus capabilities.
    pub fn is_drawing_tablet(self) -> bool {
        self.contains(Source::MOUSE | Source::STYLUS)
    }
}

impl BitOr for Source {
    type Output = Source;

    fn bitor(self, rhs: Source) -> Source {
        Source(self.0 | rhs.0)
    }
}

/// The physical tool that produced a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolType {
    #[default]
    Unknown,
    Finger,
    Stylus,
    Mouse,
    Eraser,
    Palm,
}

impl ToolType {
    pub fn is_stylus(self) -> bool {
        matches!(self, ToolType::Stylus | ToolType::Eraser)
    }
}
