//! Scripted input for the simulator.
//!
//! A scenario is a TOML list of steps replayed in order against a
//! choreographer:
//!
//! ```toml
//! [[steps]]
//! kind = "mouse_move"
//! device = 1
//! dx = 50.0
//!
//! [[steps]]
//! kind = "windows"
//! displays = [0, 1]
//! windows = [{ name = "bank", display = 1, sensitive = true }]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use pointer_core::input::notify::{DeviceResetArgs, PointerCaptureChangedArgs};
use pointer_core::input::window::{
    DisplayInfo, WindowInfo, WindowInfosUpdate, WindowInputConfig,
};
use pointer_core::{
    DeviceId, DisplayId, KeyAction, KeyArgs, KeyCode, MetaState, MotionAction, MotionArgs,
    PointerCoords, Source, ToolType, Vec2,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::ConfigError;
use crate::application::choreographer::PointerChoreographer;
use crate::infrastructure::headless::StaticWindowInfosFeed;

/// An ordered list of steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HoverPhase {
    Enter,
    Move,
    Exit,
}

/// A window shown in a `windows` step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowEntry {
    pub name: String,
    pub display: i32,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

/// One scripted action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Relative mouse motion.
    MouseMove {
        device: i32,
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
    },
    /// Mouse motion from a device that reports an absolute cursor position.
    MouseAbsolute { device: i32, x: f32, y: f32 },
    /// Relative touchpad motion (single finger, no gesture).
    TouchpadMove {
        device: i32,
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
    },
    Touch {
        device: i32,
        display: i32,
        phase: TouchPhase,
        x: f32,
        y: f32,
    },
    StylusHover {
        device: i32,
        display: i32,
        phase: HoverPhase,
        x: f32,
        y: f32,
    },
    TabletHover {
        device: i32,
        display: i32,
        phase: HoverPhase,
        x: f32,
        y: f32,
    },
    Key {
        device: i32,
        key_code: i32,
        #[serde(default)]
        meta_state: u32,
        #[serde(default)]
        up: bool,
    },
    Windows {
        #[serde(default)]
        displays: Vec<i32>,
        #[serde(default)]
        windows: Vec<WindowEntry>,
    },
    PointerIconVisibility { display: i32, visible: bool },
    ShowTouches { enabled: bool },
    StylusPointerIcon { enabled: bool },
    DefaultMouseDisplay { display: i32 },
    FocusedDisplay { display: i32 },
    DeviceReset { device: i32 },
    PointerCapture { enabled: bool },
}

impl WindowEntry {
    fn to_window_info(&self) -> WindowInfo {
        let mut flags = 0;
        if self.sensitive {
            flags |= WindowInputConfig::SENSITIVE_FOR_PRIVACY;
        }
        if !self.visible {
            flags |= WindowInputConfig::NOT_VISIBLE;
        }
        WindowInfo {
            name: self.name.clone(),
            display_id: DisplayId(self.display),
            input_config: WindowInputConfig(flags),
        }
    }
}

/// Builds the window-metadata update a `windows` step publishes.
pub fn window_update(displays: &[i32], windows: &[WindowEntry]) -> WindowInfosUpdate {
    WindowInfosUpdate {
        window_infos: windows.iter().map(WindowEntry::to_window_info).collect(),
        display_infos: displays
            .iter()
            .map(|&id| DisplayInfo {
                display_id: DisplayId(id),
                logical_width: 0,
                logical_height: 0,
            })
            .collect(),
    }
}

fn hover_action(phase: HoverPhase) -> MotionAction {
    match phase {
        HoverPhase::Enter => MotionAction::HoverEnter,
        HoverPhase::Move => MotionAction::HoverMove,
        HoverPhase::Exit => MotionAction::HoverExit,
    }
}

/// Replays one step.
///
/// Mouse and touchpad motion carries the display the device is bound to in
/// `device_displays`, or [`DisplayId::INVALID`] for unlisted devices.
pub fn run_step(
    step: &ScenarioStep,
    choreographer: &PointerChoreographer,
    feed: &StaticWindowInfosFeed,
    device_displays: &BTreeMap<DeviceId, DisplayId>,
) {
    debug!(?step, "scenario step");
    let bound_display = |device: i32| {
        device_displays
            .get(&DeviceId(device))
            .copied()
            .unwrap_or(DisplayId::INVALID)
    };
    match step {
        ScenarioStep::MouseMove { device, dx, dy } => {
            choreographer.notify_motion(MotionArgs::new(
                DeviceId(*device),
                Source::MOUSE,
                bound_display(*device),
                MotionAction::HoverMove,
                ToolType::Mouse,
                PointerCoords::relative(*dx, *dy),
            ));
        }
        ScenarioStep::MouseAbsolute { device, x, y } => {
            choreographer.notify_motion(
                MotionArgs::new(
                    DeviceId(*device),
                    Source::MOUSE,
                    bound_display(*device),
                    MotionAction::HoverMove,
                    ToolType::Mouse,
                    PointerCoords::at(*x, *y),
                )
                .with_cursor_position(Vec2::new(*x, *y)),
            );
        }
        ScenarioStep::TouchpadMove { device, dx, dy } => {
            choreographer.notify_motion(MotionArgs::new(
                DeviceId(*device),
                Source::MOUSE | Source::TOUCHPAD,
                bound_display(*device),
                MotionAction::HoverMove,
                ToolType::Finger,
                PointerCoords::relative(*dx, *dy),
            ));
        }
        ScenarioStep::Touch { device, display, phase, x, y } => {
            let action = match phase {
                TouchPhase::Down => MotionAction::Down,
                TouchPhase::Move => MotionAction::Move,
                TouchPhase::Up => MotionAction::Up,
            };
            choreographer.notify_motion(MotionArgs::new(
                DeviceId(*device),
                Source::TOUCHSCREEN,
                DisplayId(*display),
                action,
                ToolType::Finger,
                PointerCoords::at(*x, *y),
            ));
        }
        ScenarioStep::StylusHover { device, display, phase, x, y } => {
            choreographer.notify_motion(MotionArgs::new(
                DeviceId(*device),
                Source::TOUCHSCREEN | Source::STYLUS,
                DisplayId(*display),
                hover_action(*phase),
                ToolType::Stylus,
                PointerCoords::at(*x, *y),
            ));
        }
        ScenarioStep::TabletHover { device, display, phase, x, y } => {
            choreographer.notify_motion(MotionArgs::new(
                DeviceId(*device),
                Source::MOUSE | Source::STYLUS,
                DisplayId(*display),
                hover_action(*phase),
                ToolType::Stylus,
                PointerCoords::at(*x, *y),
            ));
        }
        ScenarioStep::Key { device, key_code, meta_state, up } => {
            let action = if *up { KeyAction::Up } else { KeyAction::Down };
            let mut args = KeyArgs::new(DeviceId(*device), action, KeyCode(*key_code));
            args.meta_state = MetaState(*meta_state);
            choreographer.notify_key(args);
        }
        ScenarioStep::Windows { displays, windows } => {
            if !feed.publish(&window_update(displays, windows)) {
                warn!("window update dropped: no pointer controller has subscribed yet");
            }
        }
        ScenarioStep::PointerIconVisibility { display, visible } => {
            choreographer.set_pointer_icon_visibility(DisplayId(*display), *visible);
        }
        ScenarioStep::ShowTouches { enabled } => choreographer.set_show_touches_enabled(*enabled),
        ScenarioStep::StylusPointerIcon { enabled } => {
            choreographer.set_stylus_pointer_icon_enabled(*enabled);
        }
        ScenarioStep::DefaultMouseDisplay { display } => {
            choreographer.set_default_mouse_display_id(DisplayId(*display));
        }
        ScenarioStep::FocusedDisplay { display } => {
            choreographer.set_focused_display(DisplayId(*display));
        }
        ScenarioStep::DeviceReset { device } => {
            choreographer.notify_device_reset(DeviceResetArgs {
                event_time_ns: 0,
                device_id: DeviceId(*device),
            });
        }
        ScenarioStep::PointerCapture { enabled } => {
            choreographer.notify_pointer_capture_changed(PointerCaptureChangedArgs {
                event_time_ns: 0,
                enabled: *enabled,
            });
        }
    }
}

/// Parses a scenario from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_scenario(content: &str) -> Result<Scenario, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads a scenario file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_scenario(path: &Path) -> Result<Scenario, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
