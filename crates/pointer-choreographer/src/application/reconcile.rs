//! Reconciliation of the controller maps against the input-device snapshot.
//!
//! Runs after every change that can alter which controllers should exist:
//! a new device list, a new default mouse display, or toggling show-touches
//! or the stylus pointer icon. Mouse cursors are created eagerly here;
//! touch, stylus and drawing-tablet controllers are only created lazily by
//! their first event, and reconciliation merely decides which of them may
//! survive.

use std::collections::BTreeSet;

use pointer_core::{DeviceId, DisplayId, Source};
use tracing::debug;

use super::interfaces::{ControllerType, Transition};
use super::state::{ChoreographerState, PointerDisplayChange};

impl ChoreographerState {
    pub(crate) fn update_pointer_controllers(&mut self) -> PointerDisplayChange {
        let mut mouse_displays_to_keep: BTreeSet<DisplayId> = BTreeSet::new();
        let mut touch_devices_to_keep: BTreeSet<DeviceId> = BTreeSet::new();
        let mut stylus_devices_to_keep: BTreeSet<DeviceId> = BTreeSet::new();
        let mut drawing_tablets_to_keep: BTreeSet<DeviceId> = BTreeSet::new();

        let devices = self.input_device_infos.clone();
        for info in devices.iter().filter(|info| info.enabled) {
            let sources = info.sources;
            let is_known_mouse = self.mouse_devices.contains(&info.id);

            if sources.is_mouse_or_touchpad() || is_known_mouse {
                let display_id = self.target_mouse_display(info.associated_display_id);
                mouse_displays_to_keep.insert(display_id);

                let is_new_controller = !self.mouse_pointers_by_display.contains_key(&display_id);
                if is_new_controller {
                    let controller =
                        self.create_controller_for_display(ControllerType::Mouse, display_id);
                    self.mouse_pointers_by_display.insert(display_id, controller);
                    self.on_controller_added_or_removed();
                }
                self.mouse_devices.insert(info.id);

                // A newly seen mouse, or a cursor that did not exist yet, becomes visible.
                if (!is_known_mouse || is_new_controller) && self.can_unfade_on_display(display_id) {
                    if let Some(controller) = self.mouse_pointers_by_display.get_mut(&display_id) {
                        controller.unfade(Transition::Immediate);
                    }
                }
            }

            let has_associated_display = info.associated_display_id.is_valid();
            if sources.contains(Source::TOUCHSCREEN)
                && self.show_touches_enabled
                && has_associated_display
            {
                touch_devices_to_keep.insert(info.id);
            }
            if sources.contains(Source::STYLUS)
                && self.stylus_pointer_icon_enabled
                && has_associated_display
            {
                stylus_devices_to_keep.insert(info.id);
            }
            if sources.is_drawing_tablet() && has_associated_display {
                drawing_tablets_to_keep.insert(info.id);
            }
        }

        let before = self.controller_count();
        self.mouse_pointers_by_display
            .retain(|display_id, _| mouse_displays_to_keep.contains(display_id));
        self.touch_pointers_by_device
            .retain(|device_id, _| touch_devices_to_keep.contains(device_id));
        self.stylus_pointers_by_device
            .retain(|device_id, _| stylus_devices_to_keep.contains(device_id));
        self.drawing_tablet_pointers_by_device
            .retain(|device_id, _| drawing_tablets_to_keep.contains(device_id));

        let present: BTreeSet<DeviceId> = self.input_device_infos.iter().map(|info| info.id).collect();
        self.mouse_devices.retain(|device_id| present.contains(device_id));

        let removed = before - self.controller_count();
        if removed > 0 {
            debug!("reconciliation released {removed} pointer controller(s)");
        }

        self.on_controller_added_or_removed();
        self.calculate_pointer_display_change()
    }

    fn controller_count(&self) -> usize {
        self.mouse_pointers_by_display.len()
            + self.touch_pointers_by_device.len()
            + self.stylus_pointers_by_device.len()
            + self.drawing_tablet_pointers_by_device.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Weak};

    use pointer_core::{DisplayViewport, InputDeviceInfo};

    use super::*;
    use crate::application::flags::FeatureFlags;
    use crate::application::interfaces::ChoreographerPolicy;
    use crate::application::privacy::WindowInfosListener;
    use crate::infrastructure::headless::{HeadlessPolicy, StaticWindowInfosFeed};

    fn state() -> (ChoreographerState, Arc<HeadlessPolicy>) {
        let policy = Arc::new(HeadlessPolicy::new());
        let state = ChoreographerState::new(
            policy.clone(),
            Arc::new(StaticWindowInfosFeed::default()),
            FeatureFlags::default(),
            WindowInfosListener::new(Weak::new()),
        );
        (state, policy)
    }

    fn mouse(id: i32, display: DisplayId) -> InputDeviceInfo {
        InputDeviceInfo::new(DeviceId(id), Source::MOUSE, display)
    }

    #[test]
    fn test_mouse_without_association_gets_cursor_on_default_display() {
        // Arrange
        let (mut state, policy) = state();
        state.input_device_infos = vec![mouse(1, DisplayId::INVALID)];

        // Act
        state.update_pointer_controllers();

        // Assert
        assert!(state.mouse_pointers_by_display.contains_key(&DisplayId::DEFAULT));
        assert!(state.mouse_devices.contains(&DeviceId(1)));
        assert!(policy.controllers_of_type(ControllerType::Mouse)[0].is_visible());
    }

    #[test]
    fn test_two_mice_on_same_display_share_one_cursor() {
        let (mut state, policy) = state();
        state.input_device_infos = vec![mouse(1, DisplayId::INVALID), mouse(2, DisplayId::INVALID)];

        state.update_pointer_controllers();

        assert_eq!(state.mouse_pointers_by_display.len(), 1);
        assert_eq!(policy.controllers_of_type(ControllerType::Mouse).len(), 1);
    }

    #[test]
    fn test_associated_mouse_gets_cursor_on_its_display() {
        let (mut state, _policy) = state();
        state.input_device_infos = vec![mouse(1, DisplayId(5))];

        state.update_pointer_controllers();

        assert_eq!(
            state.mouse_pointers_by_display.keys().copied().collect::<Vec<_>>(),
            vec![DisplayId(5)]
        );
    }

    #[test]
    fn test_disabled_device_gets_no_cursor() {
        let (mut state, _policy) = state();
        state.input_device_infos = vec![mouse(1, DisplayId::INVALID).disabled()];

        state.update_pointer_controllers();

        assert!(state.mouse_pointers_by_display.is_empty());
    }

    #[test]
    fn test_removing_mouse_releases_cursor() {
        // Arrange
        let (mut state, policy) = state();
        state.input_device_infos = vec![mouse(1, DisplayId::INVALID)];
        state.update_pointer_controllers();

        // Act
        state.input_device_infos.clear();
        state.update_pointer_controllers();

        // Assert
        assert!(state.mouse_pointers_by_display.is_empty());
        assert!(state.mouse_devices.is_empty());
        assert!(policy.controllers_of_type(ControllerType::Mouse)[0].is_released());
    }

    #[test]
    fn test_cursor_gets_viewport_when_known_at_creation() {
        let (mut state, policy) = state();
        state.viewports = vec![DisplayViewport::new(DisplayId::DEFAULT, 800, 600)];
        state.input_device_infos = vec![mouse(1, DisplayId::INVALID)];

        state.update_pointer_controllers();

        assert_eq!(
            policy.controllers_of_type(ControllerType::Mouse)[0].display_id(),
            DisplayId::DEFAULT
        );
    }

    #[test]
    fn test_touch_controller_dropped_when_show_touches_disabled() {
        // Arrange
        let (mut state, policy) = state();
        state.show_touches_enabled = true;
        state.input_device_infos = vec![InputDeviceInfo::new(
            DeviceId(7),
            Source::TOUCHSCREEN,
            DisplayId(0),
        )];
        let controller = policy.create_pointer_controller(ControllerType::Touch);
        state.touch_pointers_by_device.insert(DeviceId(7), controller);
        state.update_pointer_controllers();
        assert_eq!(state.touch_pointers_by_device.len(), 1);

        // Act
        state.show_touches_enabled = false;
        state.update_pointer_controllers();

        // Assert
        assert!(state.touch_pointers_by_device.is_empty());
    }

    #[test]
    fn test_reconcile_reports_display_change_once() {
        // Arrange
        let (mut state, _policy) = state();
        state.viewports = vec![DisplayViewport::new(DisplayId::DEFAULT, 800, 600)];
        state.input_device_infos = vec![mouse(1, DisplayId::INVALID)];

        // Act
        let first = state.update_pointer_controllers();
        let second = state.update_pointer_controllers();

        // Assert
        assert_eq!(first.map(|(display, _)| display), Some(DisplayId::DEFAULT));
        assert_eq!(second, None);
    }
}
