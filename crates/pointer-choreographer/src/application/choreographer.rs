//! PointerChoreographer: the public entry point of the pointer pipeline stage.
//!
//! Sits between the input reader and the dispatcher. Every notification is
//! forwarded to the next [`InputListener`], sometimes rewritten; along the
//! way the choreographer keeps one pointer controller per mouse display and
//! per touch, stylus or drawing-tablet device.
//!
//! # Locking
//!
//! All state lives behind a single mutex. Policy callbacks and the next
//! listener are always invoked after the lock is released, so they may call
//! back into the choreographer.

use std::sync::{Arc, Mutex, MutexGuard};

use pointer_core::input::notify::{
    DeviceResetArgs, InputDevicesChangedArgs, PointerCaptureChangedArgs, SensorArgs, SwitchArgs,
    VibratorStateArgs,
};
use pointer_core::{
    DeviceId, DisplayId, DisplayTopology, DisplayViewport, KeyAction, KeyArgs, MotionArgs,
    NotifyArgs, PointerIcon, Vec2,
};
use tracing::{debug, info};

use super::flags::FeatureFlags;
use super::interfaces::{ChoreographerPolicy, InputListener, WindowInfosFeed};
use super::privacy::WindowInfosListener;
use super::state::{lock_state, ChoreographerState, PointerDisplayChange};

const INDENT: &str = "  ";
const INDENT2: &str = "    ";

/// Snapshot of which controllers currently exist, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerKeys {
    pub mouse_displays: Vec<DisplayId>,
    pub touch_devices: Vec<DeviceId>,
    pub stylus_devices: Vec<DeviceId>,
    pub drawing_tablet_devices: Vec<DeviceId>,
}

impl ControllerKeys {
    pub fn total(&self) -> usize {
        self.mouse_displays.len()
            + self.touch_devices.len()
            + self.stylus_devices.len()
            + self.drawing_tablet_devices.len()
    }
}

/// The pointer choreographer.
pub struct PointerChoreographer {
    state: Arc<Mutex<ChoreographerState>>,
    next_listener: Arc<dyn InputListener>,
    policy: Arc<dyn ChoreographerPolicy>,
}

impl PointerChoreographer {
    /// Creates a choreographer forwarding to `next_listener`.
    ///
    /// The window-metadata feed is not subscribed until the first pointer
    /// controller is created.
    pub fn new(
        next_listener: Arc<dyn InputListener>,
        policy: Arc<dyn ChoreographerPolicy>,
        window_feed: Arc<dyn WindowInfosFeed>,
        flags: FeatureFlags,
    ) -> Self {
        let state_policy = Arc::clone(&policy);
        let state = Arc::new_cyclic(|weak| {
            Mutex::new(ChoreographerState::new(
                state_policy,
                window_feed,
                flags,
                WindowInfosListener::new(weak.clone()),
            ))
        });
        info!(?flags, "pointer choreographer created");
        Self {
            state,
            next_listener,
            policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChoreographerState> {
        lock_state(&self.state)
    }

    /// A handle the window-metadata feed can deliver updates through.
    pub fn window_infos_listener(&self) -> WindowInfosListener {
        WindowInfosListener::new(Arc::downgrade(&self.state))
    }

    fn notify_pointer_display_change(&self, change: PointerDisplayChange) {
        if let Some((display_id, position)) = change {
            debug!("pointer display changed to {display_id}");
            self.policy.notify_pointer_display_id_changed(display_id, position);
        }
    }

    // ── Input notifications ───────────────────────────────────────────────────

    pub fn notify_input_devices_changed(&self, args: InputDevicesChangedArgs) {
        let change = {
            let mut state = self.lock();
            state.input_device_infos = args.devices.clone();
            state.update_pointer_controllers()
        };
        self.notify_pointer_display_change(change);
        self.next_listener.notify(NotifyArgs::InputDevicesChanged(args));
    }

    pub fn notify_key(&self, args: KeyArgs) {
        self.fade_mouse_cursor_on_key_press(&args);
        self.next_listener.notify(NotifyArgs::Key(args));
    }

    /// Routes a motion event to its pointer controller and forwards it,
    /// rewritten for mouse and touchpad sources.
    ///
    /// # Panics
    ///
    /// Panics on a mouse event carrying more than one pointer.
    pub fn notify_motion(&self, args: MotionArgs) {
        let (new_args, change) = self.lock().process_motion(&args);
        self.notify_pointer_display_change(change);
        self.next_listener.notify(NotifyArgs::Motion(new_args));
    }

    pub fn notify_switch(&self, args: SwitchArgs) {
        self.next_listener.notify(NotifyArgs::Switch(args));
    }

    pub fn notify_sensor(&self, args: SensorArgs) {
        self.next_listener.notify(NotifyArgs::Sensor(args));
    }

    pub fn notify_vibrator_state(&self, args: VibratorStateArgs) {
        self.next_listener.notify(NotifyArgs::VibratorState(args));
    }

    pub fn notify_device_reset(&self, args: DeviceResetArgs) {
        self.lock().process_device_reset(args.device_id);
        self.next_listener.notify(NotifyArgs::DeviceReset(args));
    }

    pub fn notify_pointer_capture_changed(&self, args: PointerCaptureChangedArgs) {
        if args.enabled {
            self.lock().fade_all_mouse_pointers();
        }
        self.next_listener.notify(NotifyArgs::PointerCaptureChanged(args));
    }

    /// Fades the cursor when the user starts typing into a text field.
    ///
    /// Key releases, modifier keys and chorded shortcuts never fade.
    fn fade_mouse_cursor_on_key_press(&self, args: &KeyArgs) {
        if args.action == KeyAction::Up || args.key_code.is_meta_key() {
            return;
        }
        if args.meta_state.has_non_typing_modifiers() {
            return;
        }
        if !self.policy.is_input_method_connection_active() {
            return;
        }
        let faded = self.lock().fade_mouse_for_typing(args.display_id);
        if faded {
            self.policy.notify_mouse_cursor_faded_on_typing();
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Replaces the display adjacency graph.
    ///
    /// Once a topology has been supplied, no fallback topology is synthesized
    /// from window-metadata updates any more.
    pub fn set_display_topology(&self, topology: DisplayTopology) {
        let mut state = self.lock();
        debug!("display topology set with {} display(s)", topology.len());
        state.topology = topology;
        state.topology_supplied = true;
    }

    pub fn set_display_viewports(&self, viewports: Vec<DisplayViewport>) {
        let change = self.lock().apply_display_viewports(viewports);
        self.notify_pointer_display_change(change);
    }

    pub fn set_default_mouse_display_id(&self, display_id: DisplayId) {
        let change = {
            let mut state = self.lock();
            state.default_mouse_display_id = display_id;
            state.update_pointer_controllers()
        };
        self.notify_pointer_display_change(change);
    }

    pub fn set_show_touches_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        if state.show_touches_enabled == enabled {
            return;
        }
        state.show_touches_enabled = enabled;
        let change = state.update_pointer_controllers();
        drop(state);
        self.notify_pointer_display_change(change);
    }

    pub fn set_stylus_pointer_icon_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        if state.stylus_pointer_icon_enabled == enabled {
            return;
        }
        state.stylus_pointer_icon_enabled = enabled;
        let change = state.update_pointer_controllers();
        drop(state);
        self.notify_pointer_display_change(change);
    }

    /// Sets the icon of the pointer `device_id` controls.
    ///
    /// Returns `false` if the device is unknown or has no pointer controller.
    pub fn set_pointer_icon(&self, icon: PointerIcon, display_id: DisplayId, device_id: DeviceId) -> bool {
        self.lock().set_pointer_icon(icon, display_id, device_id)
    }

    /// Hides or re-allows pointers on a display.
    ///
    /// Hiding fades the mouse cursor and stylus pointers on the display
    /// immediately. Allowing them again does not unfade anything; the next
    /// event on the display does.
    pub fn set_pointer_icon_visibility(&self, display_id: DisplayId, visible: bool) {
        self.lock().set_pointer_icon_visibility(display_id, visible);
    }

    pub fn set_focused_display(&self, display_id: DisplayId) {
        self.lock().current_focused_display = display_id;
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn viewport_for_pointer_device(&self, associated_display_id: DisplayId) -> Option<DisplayViewport> {
        self.lock().viewport_for_pointer_device(associated_display_id)
    }

    /// Cursor position on the display a device bound to `display_id` draws on.
    pub fn mouse_cursor_position(&self, display_id: DisplayId) -> Option<Vec2> {
        let state = self.lock();
        let display_id = state.target_mouse_display(display_id);
        state
            .mouse_pointers_by_display
            .get(&display_id)
            .map(|controller| controller.position())
    }

    pub fn default_mouse_display_id(&self) -> DisplayId {
        self.lock().default_mouse_display_id
    }

    pub fn controller_keys(&self) -> ControllerKeys {
        let state = self.lock();
        ControllerKeys {
            mouse_displays: state.mouse_pointers_by_display.keys().copied().collect(),
            touch_devices: state.touch_pointers_by_device.keys().copied().collect(),
            stylus_devices: state.stylus_pointers_by_device.keys().copied().collect(),
            drawing_tablet_devices: state
                .drawing_tablet_pointers_by_device
                .keys()
                .copied()
                .collect(),
        }
    }

    /// Whether the window-metadata feed is currently subscribed.
    pub fn is_window_infos_listener_registered(&self) -> bool {
        self.lock().privacy.is_registered()
    }

    /// Multi-line diagnostic dump of the choreographer and its controllers.
    pub fn dump(&self) -> String {
        let state = self.lock();
        let mut out = String::from("PointerChoreographer:\n");
        out += &format!("{INDENT}Show Touches Enabled: {}\n", state.show_touches_enabled);
        out += &format!(
            "{INDENT}Stylus PointerIcon Enabled: {}\n",
            state.stylus_pointer_icon_enabled
        );
        out += &format!(
            "{INDENT}Default Mouse Display: {}\n",
            state.default_mouse_display_id
        );
        out += &format!(
            "{INDENT}Displays With Pointers Hidden: {:?}\n",
            state.displays_with_pointers_hidden
        );
        out += &format!(
            "{INDENT}Privacy Sensitive Displays: {:?}\n",
            state.privacy.sensitive_displays
        );
        out += &format!("{INDENT}Topology Displays: {}\n", state.topology.len());

        out += &format!("{INDENT}MousePointerControllers:\n");
        for (display_id, controller) in &state.mouse_pointers_by_display {
            out += &format!("{INDENT2}{display_id} : {}\n", add_line_prefix(&controller.dump(), INDENT2));
        }
        out += &format!("{INDENT}TouchPointerControllers:\n");
        for (device_id, controller) in &state.touch_pointers_by_device {
            out += &format!("{INDENT2}{device_id} : {}\n", add_line_prefix(&controller.dump(), INDENT2));
        }
        out += &format!("{INDENT}StylusPointerControllers:\n");
        for (device_id, controller) in &state.stylus_pointers_by_device {
            out += &format!("{INDENT2}{device_id} : {}\n", add_line_prefix(&controller.dump(), INDENT2));
        }
        out += &format!("{INDENT}DrawingTabletControllers:\n");
        for (device_id, controller) in &state.drawing_tablet_pointers_by_device {
            out += &format!("{INDENT2}{device_id} : {}\n", add_line_prefix(&controller.dump(), INDENT2));
        }
        out.push('\n');
        out
    }
}

impl Drop for PointerChoreographer {
    fn drop(&mut self) {
        self.lock().privacy.unregister();
    }
}

/// Indents every line after the first by `prefix`.
fn add_line_prefix(text: &str, prefix: &str) -> String {
    text.trim_end()
        .lines()
        .collect::<Vec<_>>()
        .join(&format!("\n{prefix}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use mockall::predicate::*;
    use pointer_core::input::window::WindowInfosUpdate;
    use pointer_core::{InputDeviceInfo, KeyCode, Source};

    use super::*;
    use crate::application::interfaces::{MockInputListener, MockWindowInfosFeed};
    use crate::infrastructure::headless::HeadlessPolicy;

    fn mouse_device(id: i32) -> InputDeviceInfo {
        InputDeviceInfo::new(DeviceId(id), Source::MOUSE, DisplayId::INVALID)
    }

    fn devices_changed(devices: Vec<InputDeviceInfo>) -> InputDevicesChangedArgs {
        InputDevicesChangedArgs { devices }
    }

    // ── Forwarding ────────────────────────────────────────────────────────────

    #[test]
    fn test_switch_is_forwarded_unchanged() {
        // Arrange
        let args = SwitchArgs {
            event_time_ns: 5,
            switch_values: 1,
            switch_mask: 1,
        };
        let mut listener = MockInputListener::new();
        listener
            .expect_notify()
            .with(eq(NotifyArgs::Switch(args.clone())))
            .times(1)
            .return_const(());
        let feed = MockWindowInfosFeed::new();
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            Arc::new(HeadlessPolicy::new()),
            Arc::new(feed),
            FeatureFlags::default(),
        );

        // Act / Assert
        choreographer.notify_switch(args);
    }

    // ── Window-metadata subscription ──────────────────────────────────────────

    #[test]
    fn test_first_controller_registers_and_drop_unregisters() {
        // Arrange
        let mut listener = MockInputListener::new();
        listener.expect_notify().return_const(());
        let mut feed = MockWindowInfosFeed::new();
        feed.expect_register().times(1).returning(|_| Vec::new());
        feed.expect_unregister().times(1).return_const(());
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            Arc::new(HeadlessPolicy::new()),
            Arc::new(feed),
            FeatureFlags::default(),
        );

        // Act
        choreographer.notify_input_devices_changed(devices_changed(vec![mouse_device(1)]));

        // Assert
        assert!(choreographer.is_window_infos_listener_registered());
        drop(choreographer);
    }

    #[test]
    fn test_no_registration_when_features_disabled() {
        // Arrange
        let mut listener = MockInputListener::new();
        listener.expect_notify().return_const(());
        let mut feed = MockWindowInfosFeed::new();
        feed.expect_register().never();
        feed.expect_unregister().never();
        let flags = FeatureFlags {
            connected_displays_cursor: false,
            hide_pointer_indicators_for_secure_windows: false,
        };
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            Arc::new(HeadlessPolicy::new()),
            Arc::new(feed),
            flags,
        );

        // Act
        choreographer.notify_input_devices_changed(devices_changed(vec![mouse_device(1)]));

        // Assert
        assert!(!choreographer.is_window_infos_listener_registered());
    }

    #[test]
    fn test_listener_handle_outliving_choreographer_is_inert() {
        // Arrange
        let mut listener = MockInputListener::new();
        listener.expect_notify().return_const(());
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            Arc::new(HeadlessPolicy::new()),
            Arc::new(MockWindowInfosFeed::new()),
            FeatureFlags::default(),
        );
        let handle = choreographer.window_infos_listener();
        assert!(handle.is_attached());

        // Act
        drop(choreographer);
        handle.on_window_infos_changed(&WindowInfosUpdate::default());

        // Assert
        assert!(!handle.is_attached());
    }

    // ── Typing fade ───────────────────────────────────────────────────────────

    #[test]
    fn test_typing_fades_cursor_and_notifies_policy() {
        // Arrange
        let mut listener = MockInputListener::new();
        listener.expect_notify().return_const(());
        let mut feed = MockWindowInfosFeed::new();
        feed.expect_register().returning(|_| Vec::new());
        feed.expect_unregister().return_const(());
        let policy = Arc::new(HeadlessPolicy::new());
        policy.set_input_method_active(true);
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            policy.clone(),
            Arc::new(feed),
            FeatureFlags::default(),
        );
        choreographer.notify_input_devices_changed(devices_changed(vec![mouse_device(1)]));

        // Act
        choreographer.notify_key(KeyArgs::new(DeviceId(2), KeyAction::Down, KeyCode::A));

        // Assert
        assert_eq!(policy.faded_on_typing_count(), 1);
        assert!(!policy.controllers()[0].is_visible());
    }

    #[test]
    fn test_modifier_key_does_not_fade_cursor() {
        // Arrange
        let mut listener = MockInputListener::new();
        listener.expect_notify().return_const(());
        let mut feed = MockWindowInfosFeed::new();
        feed.expect_register().returning(|_| Vec::new());
        feed.expect_unregister().return_const(());
        let policy = Arc::new(HeadlessPolicy::new());
        policy.set_input_method_active(true);
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            policy.clone(),
            Arc::new(feed),
            FeatureFlags::default(),
        );
        choreographer.notify_input_devices_changed(devices_changed(vec![mouse_device(1)]));

        // Act
        choreographer.notify_key(KeyArgs::new(DeviceId(2), KeyAction::Down, KeyCode::SHIFT_LEFT));

        // Assert
        assert_eq!(policy.faded_on_typing_count(), 0);
        assert!(policy.controllers()[0].is_visible());
    }

    // ── Dump ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_add_line_prefix_indents_continuation_lines() {
        assert_eq!(add_line_prefix("a\nb\n", "  "), "a\n  b");
    }

    #[test]
    fn test_dump_lists_mouse_controllers() {
        // Arrange
        let mut listener = MockInputListener::new();
        listener.expect_notify().return_const(());
        let mut feed = MockWindowInfosFeed::new();
        feed.expect_register().returning(|_| Vec::new());
        feed.expect_unregister().return_const(());
        let choreographer = PointerChoreographer::new(
            Arc::new(listener),
            Arc::new(HeadlessPolicy::new()),
            Arc::new(feed),
            FeatureFlags::default(),
        );
        choreographer.notify_input_devices_changed(devices_changed(vec![mouse_device(1)]));

        // Act
        let dump = choreographer.dump();

        // Assert
        assert!(dump.starts_with("PointerChoreographer:\n"));
        assert!(dump.contains("MousePointerControllers:\n    0 : "));
        assert!(dump.contains("Show Touches Enabled: false"));
        assert!(dump.ends_with("DrawingTabletControllers:\n\n"));
    }
}
