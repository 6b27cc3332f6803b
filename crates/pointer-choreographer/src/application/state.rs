//! The single lock-protected state shared by every choreographer entry point.
//!
//! All mutable choreographer data lives in [`ChoreographerState`] behind one
//! `Mutex`. Entry points lock it, run one of the `impl ChoreographerState`
//! blocks spread across the sibling modules, and release it before calling
//! out to the next listener or the policy.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pointer_core::{
    DeviceId, DisplayId, DisplayTopology, DisplayViewport, InputDeviceInfo, PointerIcon,
    PointerIconStyle, Source, Vec2,
};
use tracing::{debug, warn};

use super::flags::FeatureFlags;
use super::interfaces::{
    ChoreographerPolicy, ControllerType, PointerController, Transition, WindowInfosFeed,
};
use super::privacy::{PrivacyTracker, WindowInfosListener};

/// A pending "pointer display changed" notification: the display hosting the
/// default mouse cursor and the cursor position on it.
pub(crate) type PointerDisplayChange = Option<(DisplayId, Vec2)>;

pub(crate) type ControllerMap<K> = BTreeMap<K, Box<dyn PointerController>>;

/// Locks the state, recovering the data if a previous holder panicked.
pub(crate) fn lock_state(state: &Mutex<ChoreographerState>) -> MutexGuard<'_, ChoreographerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct ChoreographerState {
    pub(crate) policy: Arc<dyn ChoreographerPolicy>,
    pub(crate) flags: FeatureFlags,

    pub(crate) input_device_infos: Vec<InputDeviceInfo>,
    /// Devices that have produced mouse or touchpad events (or were reconciled as such).
    pub(crate) mouse_devices: BTreeSet<DeviceId>,

    pub(crate) mouse_pointers_by_display: ControllerMap<DisplayId>,
    pub(crate) touch_pointers_by_device: ControllerMap<DeviceId>,
    pub(crate) stylus_pointers_by_device: ControllerMap<DeviceId>,
    pub(crate) drawing_tablet_pointers_by_device: ControllerMap<DeviceId>,

    pub(crate) viewports: Vec<DisplayViewport>,
    pub(crate) topology: DisplayTopology,
    /// Set once a topology has been supplied explicitly; disables fallback synthesis.
    pub(crate) topology_supplied: bool,

    pub(crate) default_mouse_display_id: DisplayId,
    pub(crate) notified_pointer_display_id: DisplayId,
    pub(crate) current_focused_display: DisplayId,
    pub(crate) show_touches_enabled: bool,
    pub(crate) stylus_pointer_icon_enabled: bool,
    pub(crate) displays_with_pointers_hidden: BTreeSet<DisplayId>,

    pub(crate) privacy: PrivacyTracker,
}

impl ChoreographerState {
    pub(crate) fn new(
        policy: Arc<dyn ChoreographerPolicy>,
        window_feed: Arc<dyn WindowInfosFeed>,
        flags: FeatureFlags,
        listener: WindowInfosListener,
    ) -> Self {
        Self {
            policy,
            flags,
            input_device_infos: Vec::new(),
            mouse_devices: BTreeSet::new(),
            mouse_pointers_by_display: BTreeMap::new(),
            touch_pointers_by_device: BTreeMap::new(),
            stylus_pointers_by_device: BTreeMap::new(),
            drawing_tablet_pointers_by_device: BTreeMap::new(),
            viewports: Vec::new(),
            topology: DisplayTopology::new(),
            topology_supplied: false,
            default_mouse_display_id: DisplayId::DEFAULT,
            notified_pointer_display_id: DisplayId::INVALID,
            current_focused_display: DisplayId::DEFAULT,
            show_touches_enabled: false,
            stylus_pointer_icon_enabled: false,
            displays_with_pointers_hidden: BTreeSet::new(),
            privacy: PrivacyTracker::new(window_feed, listener),
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────────

    pub(crate) fn find_viewport(&self, display_id: DisplayId) -> Option<&DisplayViewport> {
        self.viewports.iter().find(|vp| vp.display_id == display_id)
    }

    pub(crate) fn find_input_device(&self, device_id: DeviceId) -> Option<&InputDeviceInfo> {
        self.input_device_infos.iter().find(|info| info.id == device_id)
    }

    /// The display a mouse associated with `associated_display_id` draws on.
    pub(crate) fn target_mouse_display(&self, associated_display_id: DisplayId) -> DisplayId {
        if associated_display_id.is_valid() {
            associated_display_id
        } else {
            self.default_mouse_display_id
        }
    }

    pub(crate) fn can_unfade_on_display(&self, display_id: DisplayId) -> bool {
        !self.displays_with_pointers_hidden.contains(&display_id)
    }

    pub(crate) fn has_any_controller(&self) -> bool {
        !(self.mouse_pointers_by_display.is_empty()
            && self.touch_pointers_by_device.is_empty()
            && self.stylus_pointers_by_device.is_empty()
            && self.drawing_tablet_pointers_by_device.is_empty())
    }

    // ── Controller creation ───────────────────────────────────────────────────

    /// Creates a controller and hands it the viewport of `display_id` if one is known.
    pub(crate) fn create_controller_for_display(
        &self,
        controller_type: ControllerType,
        display_id: DisplayId,
    ) -> Box<dyn PointerController> {
        let mut controller = self.policy.create_pointer_controller(controller_type);
        if let Some(viewport) = self.find_viewport(display_id) {
            controller.set_display_viewport(viewport);
        }
        debug!("created {controller_type:?} pointer controller for display {display_id}");
        controller
    }

    /// Ensures a mouse controller exists for the display resolved from
    /// `associated_display_id` and returns that display.
    pub(crate) fn ensure_mouse_controller(&mut self, associated_display_id: DisplayId) -> DisplayId {
        let display_id = self.target_mouse_display(associated_display_id);
        if !self.mouse_pointers_by_display.contains_key(&display_id) {
            let controller = self.create_controller_for_display(ControllerType::Mouse, display_id);
            self.mouse_pointers_by_display.insert(display_id, controller);
            self.on_controller_added_or_removed();
        }
        display_id
    }

    pub(crate) fn unfade_mouse_if_allowed(&mut self, display_id: DisplayId) {
        if !self.can_unfade_on_display(display_id) {
            return;
        }
        if let Some(controller) = self.mouse_pointers_by_display.get_mut(&display_id) {
            controller.unfade(Transition::Immediate);
        }
    }

    // ── Pointer display notification ──────────────────────────────────────────

    /// Resolves the display and position of the default mouse cursor and
    /// returns them if the display differs from the last value notified.
    pub(crate) fn calculate_pointer_display_change(&mut self) -> PointerDisplayChange {
        let (display_id, position) = match self
            .mouse_pointers_by_display
            .get(&self.default_mouse_display_id)
        {
            Some(controller) => (controller.display_id(), controller.position()),
            None => (DisplayId::INVALID, Vec2::ZERO),
        };

        if display_id == self.notified_pointer_display_id {
            return None;
        }
        self.notified_pointer_display_id = display_id;
        Some((display_id, position))
    }

    // ── Viewports ─────────────────────────────────────────────────────────────

    /// Stores the new viewport list and pushes each viewport to the mouse
    /// controller on that display and to stylus and drawing-tablet controllers
    /// whose device is associated with it.
    pub(crate) fn apply_display_viewports(
        &mut self,
        viewports: Vec<DisplayViewport>,
    ) -> PointerDisplayChange {
        let devices = &self.input_device_infos;
        let associated_display = |device_id: DeviceId| {
            devices
                .iter()
                .find(|info| info.id == device_id)
                .map(|info| info.associated_display_id)
        };

        for viewport in &viewports {
            if let Some(controller) = self.mouse_pointers_by_display.get_mut(&viewport.display_id) {
                controller.set_display_viewport(viewport);
            }
            let per_device = self
                .stylus_pointers_by_device
                .iter_mut()
                .chain(self.drawing_tablet_pointers_by_device.iter_mut());
            for (&device_id, controller) in per_device {
                if associated_display(device_id) == Some(viewport.display_id) {
                    controller.set_display_viewport(viewport);
                }
            }
        }

        debug!("display viewports updated: {} viewport(s)", viewports.len());
        self.viewports = viewports;
        self.calculate_pointer_display_change()
    }

    /// The viewport a pointer device bound to `associated_display_id` draws on.
    pub(crate) fn viewport_for_pointer_device(
        &self,
        associated_display_id: DisplayId,
    ) -> Option<DisplayViewport> {
        let display_id = self.target_mouse_display(associated_display_id);
        let viewport = self.find_viewport(display_id).cloned();
        if viewport.is_none() {
            debug!("no viewport for pointer device on display {display_id}");
        }
        viewport
    }

    // ── Device and capture events ─────────────────────────────────────────────

    pub(crate) fn process_device_reset(&mut self, device_id: DeviceId) {
        let removed_touch = self.touch_pointers_by_device.remove(&device_id).is_some();
        let removed_stylus = self.stylus_pointers_by_device.remove(&device_id).is_some();
        let removed_tablet = self
            .drawing_tablet_pointers_by_device
            .remove(&device_id)
            .is_some();
        if removed_touch || removed_stylus || removed_tablet {
            debug!("device {device_id} reset; released its pointer controllers");
        }
        self.on_controller_added_or_removed();
    }

    pub(crate) fn fade_all_mouse_pointers(&mut self) {
        for controller in self.mouse_pointers_by_display.values_mut() {
            controller.fade(Transition::Immediate);
        }
    }

    /// Fades the mouse cursor on the display a typing key press targets.
    ///
    /// Returns `true` if a cursor was found to fade.
    pub(crate) fn fade_mouse_for_typing(&mut self, key_display_id: DisplayId) -> bool {
        let display_id = if key_display_id.is_valid() {
            key_display_id
        } else {
            self.current_focused_display
        };
        match self.mouse_pointers_by_display.get_mut(&display_id) {
            Some(controller) => {
                controller.fade(Transition::Gradual);
                true
            }
            None => false,
        }
    }

    // ── Icons and visibility ──────────────────────────────────────────────────

    /// Applies `icon` to the controller owned by `device_id`.
    ///
    /// Drawing tablets are tried first, then styluses, then the mouse cursor on
    /// `display_id`. Returns `false` if no matching controller exists.
    pub(crate) fn set_pointer_icon(
        &mut self,
        icon: PointerIcon,
        display_id: DisplayId,
        device_id: DeviceId,
    ) -> bool {
        if !device_id.is_valid() {
            warn!("cannot set pointer icon: invalid device id {device_id}");
            return false;
        }
        let Some(sources) = self.find_input_device(device_id).map(|info| info.sources) else {
            warn!("cannot set pointer icon: unknown device {device_id}");
            return false;
        };

        if sources.is_drawing_tablet() {
            if let Some(controller) = self.drawing_tablet_pointers_by_device.get_mut(&device_id) {
                apply_icon(&icon, controller.as_mut());
                return true;
            }
        }

        if sources.contains(Source::STYLUS) {
            if let Some(controller) = self.stylus_pointers_by_device.get_mut(&device_id) {
                let icon = match icon {
                    PointerIcon::Style(PointerIconStyle::NotSpecified)
                        if self.show_touches_enabled =>
                    {
                        PointerIcon::Style(PointerIconStyle::SpotHover)
                    }
                    other => other,
                };
                apply_icon(&icon, controller.as_mut());
                return true;
            }
        }

        if sources.contains(Source::MOUSE) {
            return match self.mouse_pointers_by_display.get_mut(&display_id) {
                Some(controller) => {
                    apply_icon(&icon, controller.as_mut());
                    true
                }
                None => {
                    warn!("no mouse pointer on display {display_id} for device {device_id}");
                    false
                }
            };
        }

        warn!("no pointer controller for device {device_id} to set the icon on");
        false
    }

    pub(crate) fn set_pointer_icon_visibility(&mut self, display_id: DisplayId, visible: bool) {
        if visible {
            self.displays_with_pointers_hidden.remove(&display_id);
            // The next event on the display unfades the pointer.
            return;
        }

        self.displays_with_pointers_hidden.insert(display_id);
        if let Some(controller) = self.mouse_pointers_by_display.get_mut(&display_id) {
            controller.fade(Transition::Immediate);
        }
        for controller in self.stylus_pointers_by_device.values_mut() {
            if controller.display_id() == display_id {
                controller.fade(Transition::Immediate);
            }
        }
    }
}

/// Pushes an icon to a controller.
pub(crate) fn apply_icon(icon: &PointerIcon, controller: &mut dyn PointerController) {
    match icon {
        PointerIcon::Custom(sprite) => controller.set_custom_pointer_icon(sprite),
        PointerIcon::Style(style) => controller.update_pointer_icon(*style),
    }
}
