//! Window metadata as delivered by the window-metadata feed.

use crate::domain::ids::DisplayId;

/// Input configuration flags of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowInputConfig(pub u32);

impl WindowInputConfig {
    pub const NOT_VISIBLE: u32 = 1 << 0;
    pub const NOT_FOCUSABLE: u32 = 1 << 1;
    pub const SENSITIVE_FOR_PRIVACY: u32 = 1 << 2;

    pub fn has(self, flag: u32) -> bool {
        self.0 & flag != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub name: String,
    pub display_id: DisplayId,
    pub input_config: WindowInputConfig,
}

impl WindowInfo {
    /// Visible and flagged sensitive for privacy.
    pub fn hides_pointer_indicators(&self) -> bool {
        !self.input_config.has(WindowInputConfig::NOT_VISIBLE)
            && self.input_config.has(WindowInputConfig::SENSITIVE_FOR_PRIVACY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayInfo {
    pub display_id: DisplayId,
    pub logical_width: i32,
    pub logical_height: i32,
}

/// One window-metadata update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowInfosUpdate {
    pub window_infos: Vec<WindowInfo>,
    pub display_infos: Vec<DisplayInfo>,
}
