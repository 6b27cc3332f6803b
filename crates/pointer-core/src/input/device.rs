//! Input device snapshot entries.

use crate::domain::ids::{DeviceId, DisplayId};

use super::source::Source;

/// What the upstream reader knows about one input device.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDeviceInfo {
    pub id: DeviceId,
    pub name: String,
    pub sources: Source,
    /// Display the device is bound to, or [`DisplayId::INVALID`] if it follows the default.
    pub associated_display_id: DisplayId,
    pub enabled: bool,
}

impl InputDeviceInfo {
    pub fn new(id: DeviceId, sources: Source, associated_display_id: DisplayId) -> Self {
        Self {
            id,
            name: format!("device-{}", id.0),
            sources,
            associated_display_id,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
