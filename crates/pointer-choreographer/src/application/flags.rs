//! Runtime feature switches.

use serde::{Deserialize, Serialize};

/// Features that can be toggled per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Move the mouse cursor across adjacent displays when it leaves a viewport.
    #[serde(default = "default_true")]
    pub connected_displays_cursor: bool,
    /// Exclude pointer indicators from screenshots of displays showing sensitive windows.
    #[serde(default = "default_true")]
    pub hide_pointer_indicators_for_secure_windows: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            connected_displays_cursor: default_true(),
            hide_pointer_indicators_for_secure_windows: default_true(),
        }
    }
}

impl FeatureFlags {
    /// The window-metadata listener is only needed when one of these features is on.
    pub fn needs_window_infos(&self) -> bool {
        self.connected_displays_cursor || self.hide_pointer_indicators_for_secure_windows
    }
}
