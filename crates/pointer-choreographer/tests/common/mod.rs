//! Shared fixtures for the choreographer integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pointer_choreographer::application::{FeatureFlags, PointerChoreographer};
use pointer_choreographer::infrastructure::headless::{
    HeadlessPolicy, RecordingInputListener, StaticWindowInfosFeed,
};
use pointer_core::input::notify::InputDevicesChangedArgs;
use pointer_core::input::window::{DisplayInfo, WindowInfo, WindowInfosUpdate, WindowInputConfig};
use pointer_core::{
    AdjacentDisplay, DeviceId, DisplayId, DisplayPosition, DisplayTopology, DisplayViewport,
    InputDeviceInfo, MotionAction, MotionArgs, PointerCoords, Source, ToolType,
};

/// A choreographer wired to headless collaborators.
pub struct Harness {
    pub choreographer: PointerChoreographer,
    pub policy: Arc<HeadlessPolicy>,
    pub listener: Arc<RecordingInputListener>,
    pub feed: Arc<StaticWindowInfosFeed>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FeatureFlags::default(), Vec::new())
    }

    pub fn with_flags(flags: FeatureFlags) -> Self {
        Self::with(flags, Vec::new())
    }

    pub fn with(flags: FeatureFlags, windows: Vec<WindowInfo>) -> Self {
        let policy = Arc::new(HeadlessPolicy::new());
        let listener = Arc::new(RecordingInputListener::new());
        let feed = Arc::new(StaticWindowInfosFeed::new(windows));
        let choreographer =
            PointerChoreographer::new(listener.clone(), policy.clone(), feed.clone(), flags);
        Self {
            choreographer,
            policy,
            listener,
            feed,
        }
    }

    pub fn set_devices(&self, devices: Vec<InputDeviceInfo>) {
        self.choreographer
            .notify_input_devices_changed(InputDevicesChangedArgs { devices });
    }
}

pub fn flags(connected_displays_cursor: bool, hide_for_secure_windows: bool) -> FeatureFlags {
    FeatureFlags {
        connected_displays_cursor,
        hide_pointer_indicators_for_secure_windows: hide_for_secure_windows,
    }
}

// ── Devices ───────────────────────────────────────────────────────────────────

pub fn mouse(id: i32) -> InputDeviceInfo {
    InputDeviceInfo::new(DeviceId(id), Source::MOUSE, DisplayId::INVALID)
}

pub fn mouse_on(id: i32, display: i32) -> InputDeviceInfo {
    InputDeviceInfo::new(DeviceId(id), Source::MOUSE, DisplayId(display))
}

pub fn touchscreen(id: i32, display: i32) -> InputDeviceInfo {
    InputDeviceInfo::new(DeviceId(id), Source::TOUCHSCREEN, DisplayId(display))
}

pub fn stylus(id: i32, display: i32) -> InputDeviceInfo {
    InputDeviceInfo::new(DeviceId(id), Source::TOUCHSCREEN | Source::STYLUS, DisplayId(display))
}

pub fn drawing_tablet(id: i32, display: i32) -> InputDeviceInfo {
    InputDeviceInfo::new(DeviceId(id), Source::MOUSE | Source::STYLUS, DisplayId(display))
}

// ── Events ────────────────────────────────────────────────────────────────────

pub fn mouse_move(device: i32, dx: f32, dy: f32) -> MotionArgs {
    MotionArgs::new(
        DeviceId(device),
        Source::MOUSE,
        DisplayId::INVALID,
        MotionAction::HoverMove,
        ToolType::Mouse,
        PointerCoords::relative(dx, dy),
    )
}

pub fn touchpad_move(device: i32, dx: f32, dy: f32) -> MotionArgs {
    MotionArgs::new(
        DeviceId(device),
        Source::MOUSE | Source::TOUCHPAD,
        DisplayId::INVALID,
        MotionAction::HoverMove,
        ToolType::Finger,
        PointerCoords::relative(dx, dy),
    )
}

pub fn touch(device: i32, display: i32, action: MotionAction, x: f32, y: f32) -> MotionArgs {
    MotionArgs::new(
        DeviceId(device),
        Source::TOUCHSCREEN,
        DisplayId(display),
        action,
        ToolType::Finger,
        PointerCoords::at(x, y),
    )
}

pub fn stylus_hover(device: i32, display: i32, action: MotionAction, x: f32, y: f32) -> MotionArgs {
    MotionArgs::new(
        DeviceId(device),
        Source::TOUCHSCREEN | Source::STYLUS,
        DisplayId(display),
        action,
        ToolType::Stylus,
        PointerCoords::at(x, y),
    )
}

pub fn tablet_hover(device: i32, display: i32, action: MotionAction, x: f32, y: f32) -> MotionArgs {
    MotionArgs::new(
        DeviceId(device),
        Source::MOUSE | Source::STYLUS,
        DisplayId(display),
        action,
        ToolType::Stylus,
        PointerCoords::at(x, y),
    )
}

// ── Displays ──────────────────────────────────────────────────────────────────

pub fn viewport(display: i32, width: i32, height: i32) -> DisplayViewport {
    DisplayViewport::new(DisplayId(display), width, height)
}

/// `right` sits to the right of `left`, edges aligned.
pub fn side_by_side(left: i32, right: i32) -> DisplayTopology {
    let mut topology = DisplayTopology::new();
    topology
        .add_adjacency(
            DisplayId(left),
            AdjacentDisplay {
                display_id: DisplayId(right),
                position: DisplayPosition::Right,
                offset_px: 0.0,
            },
        )
        .expect("valid adjacency");
    topology
        .add_adjacency(
            DisplayId(right),
            AdjacentDisplay {
                display_id: DisplayId(left),
                position: DisplayPosition::Left,
                offset_px: 0.0,
            },
        )
        .expect("valid adjacency");
    topology
}

pub fn sensitive_window(display: i32) -> WindowInfo {
    WindowInfo {
        name: format!("secure-{display}"),
        display_id: DisplayId(display),
        input_config: WindowInputConfig(WindowInputConfig::SENSITIVE_FOR_PRIVACY),
    }
}

/// A window-metadata update listing `displays` and showing `windows`.
pub fn window_update(displays: &[i32], windows: Vec<WindowInfo>) -> WindowInfosUpdate {
    WindowInfosUpdate {
        window_infos: windows,
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
