//! TOML configuration for the `pointer-sim` simulator.
//!
//! Describes the displays, their adjacency, the attached input devices and
//! the runtime feature switches. Example:
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [features]
//! connected_displays_cursor = true
//!
//! [pointer]
//! show_touches = true
//! default_mouse_display = 0
//!
//! [[displays]]
//! id = 0
//! width = 1920
//! height = 1080
//!
//! [[topology]]
//! display = 0
//! adjacent = 1
//! position = "right"
//!
//! [[devices]]
//! id = 1
//! kind = "mouse"
//! ```
//!
//! Every section and most fields are optional; missing fields take the
//! value of the matching `default_*` helper.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pointer_core::{
    AdjacentDisplay, DeviceId, DisplayId, DisplayPosition, DisplayTopology, DisplayViewport,
    InputDeviceInfo, Orientation, Source, TopologyError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::flags::FeatureFlags;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The `[[topology]]` entries do not form a valid adjacency graph.
    #[error("invalid display topology: {0}")]
    Topology(#[from] TopologyError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub pointer: PointerSettings,
    #[serde(default)]
    pub displays: Vec<DisplayEntry>,
    /// Explicit adjacency. When empty, a fallback chain is derived from window updates.
    #[serde(default)]
    pub topology: Vec<TopologyEntry>,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointerSettings {
    #[serde(default)]
    pub show_touches: bool,
    #[serde(default)]
    pub stylus_pointer_icon: bool,
    #[serde(default = "default_mouse_display")]
    pub default_mouse_display: i32,
}

/// One display and its viewport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayEntry {
    pub id: i32,
    /// Panel width in its natural orientation.
    pub width: i32,
    /// Panel height in its natural orientation.
    pub height: i32,
    #[serde(default)]
    pub orientation: Orientation,
}

/// One directed adjacency: `adjacent` sits on the `position` side of `display`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopologyEntry {
    pub display: i32,
    pub adjacent: i32,
    pub position: DisplayPosition,
    #[serde(default)]
    pub offset_px: f32,
}

/// Kind of simulated input device; determines its source bits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Mouse,
    Touchpad,
    Touchscreen,
    /// A touchscreen with stylus support.
    Stylus,
    DrawingTablet,
    Keyboard,
}

impl DeviceKind {
    pub fn sources(self) -> Source {
        match self {
            DeviceKind::Mouse => Source::MOUSE,
            DeviceKind::Touchpad => Source::MOUSE | Source::TOUCHPAD,
            DeviceKind::Touchscreen => Source::TOUCHSCREEN,
            DeviceKind::Stylus => Source::TOUCHSCREEN | Source::STYLUS,
            DeviceKind::DrawingTablet => Source::MOUSE | Source::STYLUS,
            DeviceKind::Keyboard => Source::KEYBOARD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceEntry {
    pub id: i32,
    pub kind: DeviceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display the device is bound to; absent means "follow the default".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_display: Option<i32>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_mouse_display() -> i32 {
    DisplayId::DEFAULT.0
}
fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for PointerSettings {
    fn default() -> Self {
        Self {
            show_touches: false,
            stylus_pointer_icon: false,
            default_mouse_display: default_mouse_display(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl SimulatorConfig {
    pub fn viewports(&self) -> Vec<DisplayViewport> {
        self.displays
            .iter()
            .map(|d| DisplayViewport::new(DisplayId(d.id), d.width, d.height).rotated(d.orientation))
            .collect()
    }

    /// The configured topology, or `None` when no `[[topology]]` entries exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Topology`] on self-adjacency or duplicate entries.
    pub fn display_topology(&self) -> Result<Option<DisplayTopology>, ConfigError> {
        if self.topology.is_empty() {
            return Ok(None);
        }
        let mut topology = DisplayTopology::new();
        for entry in &self.topology {
            topology.add_adjacency(
                DisplayId(entry.display),
                AdjacentDisplay {
                    display_id: DisplayId(entry.adjacent),
                    position: entry.position,
                    offset_px: entry.offset_px,
                },
            )?;
        }
        Ok(Some(topology))
    }

    pub fn input_devices(&self) -> Vec<InputDeviceInfo> {
        self.devices
            .iter()
            .map(|entry| {
                let associated = entry.associated_display.map_or(DisplayId::INVALID, DisplayId);
                let mut info = InputDeviceInfo::new(DeviceId(entry.id), entry.kind.sources(), associated);
                if let Some(name) = &entry.name {
                    info.name = name.clone();
                }
                info.enabled = entry.enabled;
                info
            })
            .collect()
    }

    pub fn default_mouse_display_id(&self) -> DisplayId {
        DisplayId(self.pointer.default_mouse_display)
    }

    /// The display each configured device is bound to, [`DisplayId::INVALID`] when unbound.
    pub fn device_displays(&self) -> BTreeMap<DeviceId, DisplayId> {
        self.devices
            .iter()
            .map(|entry| {
                let display = entry.associated_display.map_or(DisplayId::INVALID, DisplayId);
                (DeviceId(entry.id), display)
            })
            .collect()
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<SimulatorConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<SimulatorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
