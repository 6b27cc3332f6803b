//! Classification and per-class handling of motion events.
//!
//! Every motion event is routed to at most one handler, picked by
//! [`classify_motion`] in priority order: mouse, touchpad, drawing tablet,
//! stylus hover (only with the stylus pointer icon enabled), touchscreen.
//! Mouse and touchpad events are rewritten to the cursor's display and
//! position; the other classes only drive their controllers.

use pointer_core::{
    MotionAction, MotionArgs, MotionClassification, PointerIconStyle, PointerIdBits,
    Source, MAX_POINTER_ID,
};
use tracing::warn;

use super::interfaces::{ControllerType, SpotIdToIndex, Transition};
use super::state::{ChoreographerState, PointerDisplayChange};

/// Which handler a motion event goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventClass {
    Mouse,
    Touchpad,
    DrawingTablet,
    StylusHover,
    Touchscreen,
}

/// Picks the handler for `args`, or `None` if the event passes through untouched.
pub fn classify_motion(args: &MotionArgs, stylus_pointer_icon_enabled: bool) -> Option<PointerEventClass> {
    if args.is_from_mouse() {
        Some(PointerEventClass::Mouse)
    } else if args.is_from_touchpad() {
        Some(PointerEventClass::Touchpad)
    } else if args.is_from_drawing_tablet() {
        Some(PointerEventClass::DrawingTablet)
    } else if stylus_pointer_icon_enabled && args.is_stylus_hover() {
        Some(PointerEventClass::StylusHover)
    } else if args.source.contains(Source::TOUCHSCREEN) {
        Some(PointerEventClass::Touchscreen)
    } else {
        None
    }
}

/// Builds the pointer-id lookup passed to `set_spots`.
///
/// Up, cancel and hover-exit clear every spot. A pointer-up omits the
/// pointer that is lifting.
pub(crate) fn spot_mapping(args: &MotionArgs) -> (SpotIdToIndex, PointerIdBits) {
    let mut id_to_index = [0usize; MAX_POINTER_ID + 1];
    let mut id_bits = PointerIdBits::default();

    if matches!(
        args.action,
        MotionAction::Up | MotionAction::Cancel | MotionAction::HoverExit
    ) {
        return (id_to_index, id_bits);
    }

    for (index, properties) in args.pointer_properties.iter().enumerate() {
        if args.action == MotionAction::PointerUp(index) || properties.id > MAX_POINTER_ID {
            continue;
        }
        id_to_index[properties.id] = index;
        id_bits.mark(properties.id);
    }
    (id_to_index, id_bits)
}

impl ChoreographerState {
    /// Runs the handler for `args` and returns the event to forward along
    /// with any pointer-display change it caused.
    pub(crate) fn process_motion(&mut self, args: &MotionArgs) -> (MotionArgs, PointerDisplayChange) {
        match classify_motion(args, self.stylus_pointer_icon_enabled) {
            Some(PointerEventClass::Mouse) => {
                let new_args = self.process_mouse_event(args);
                (new_args, self.calculate_pointer_display_change())
            }
            Some(PointerEventClass::Touchpad) => {
                let new_args = self.process_touchpad_event(args);
                (new_args, self.calculate_pointer_display_change())
            }
            Some(PointerEventClass::DrawingTablet) => {
                self.process_drawing_tablet_event(args);
                (args.clone(), None)
            }
            Some(PointerEventClass::StylusHover) => {
                self.process_stylus_hover_event(args);
                (args.clone(), None)
            }
            Some(PointerEventClass::Touchscreen) => {
                self.process_touchscreen_event(args);
                (args.clone(), None)
            }
            None => (args.clone(), None),
        }
    }

    fn process_mouse_event(&mut self, args: &MotionArgs) -> MotionArgs {
        if args.pointer_count() != 1 {
            panic!(
                "only mouse events with a single pointer are supported, got {} pointers from device {}",
                args.pointer_count(),
                args.device_id
            );
        }

        self.mouse_devices.insert(args.device_id);
        let display_id = self.ensure_mouse_controller(args.display_id);
        let mut new_args = args.clone();
        new_args.display_id = display_id;

        match args.cursor_position {
            Some(cursor) => {
                // Absolute device: derive relative motion from the cursor jump.
                if let Some(controller) = self.mouse_pointers_by_display.get_mut(&display_id) {
                    let previous = controller.position();
                    if let Some(coords) = new_args.pointer_coords.first_mut() {
                        coords.relative_x = cursor.x - previous.x;
                        coords.relative_y = cursor.y - previous.y;
                    }
                    controller.set_position(cursor);
                }
            }
            None => self.process_pointer_device_motion(&mut new_args),
        }

        self.unfade_mouse_if_allowed(new_args.display_id);
        new_args
    }

    fn process_touchpad_event(&mut self, args: &MotionArgs) -> MotionArgs {
        self.mouse_devices.insert(args.device_id);
        let display_id = self.ensure_mouse_controller(args.display_id);
        let mut new_args = args.clone();
        new_args.display_id = display_id;

        if args.pointer_count() == 1 && args.classification == MotionClassification::None {
            self.process_pointer_device_motion(&mut new_args);
        } else if let Some(controller) = self.mouse_pointers_by_display.get(&display_id) {
            // Gestures report pointers relative to the cursor.
            let cursor = controller.position();
            for coords in &mut new_args.pointer_coords {
                coords.x += cursor.x;
                coords.y += cursor.y;
            }
            new_args.cursor_position = Some(cursor);
        }

        self.unfade_mouse_if_allowed(new_args.display_id);
        new_args
    }

    fn process_drawing_tablet_event(&mut self, args: &MotionArgs) {
        if !args.display_id.is_valid() {
            return;
        }
        if args.pointer_count() != 1 {
            warn!(
                "drawing tablet event from device {} has {} pointers; using the first",
                args.device_id,
                args.pointer_count()
            );
        }

        if !self.drawing_tablet_pointers_by_device.contains_key(&args.device_id) {
            let controller = self.create_controller_for_display(ControllerType::Mouse, args.display_id);
            self.drawing_tablet_pointers_by_device.insert(args.device_id, controller);
            self.on_controller_added_or_removed();
        }

        let can_unfade = self.can_unfade_on_display(args.display_id);
        let Some(controller) = self.drawing_tablet_pointers_by_device.get_mut(&args.device_id) else {
            return;
        };
        if let Some(coords) = args.pointer_coords.first() {
            controller.set_position(coords.position());
        }
        if args.action == MotionAction::HoverExit {
            controller.fade(Transition::Immediate);
            controller.update_pointer_icon(PointerIconStyle::NotSpecified);
        } else if can_unfade {
            controller.unfade(Transition::Immediate);
        }
    }

    fn process_stylus_hover_event(&mut self, args: &MotionArgs) {
        if !args.display_id.is_valid() {
            return;
        }
        if args.pointer_count() != 1 {
            warn!(
                "stylus hover event from device {} has {} pointers; using the first",
                args.device_id,
                args.pointer_count()
            );
        }

        if !self.stylus_pointers_by_device.contains_key(&args.device_id) {
            let controller =
                self.create_controller_for_display(ControllerType::Stylus, args.display_id);
            self.stylus_pointers_by_device.insert(args.device_id, controller);
            self.on_controller_added_or_removed();
        }

        let can_unfade = self.can_unfade_on_display(args.display_id);
        let exit_icon = if self.show_touches_enabled {
            PointerIconStyle::SpotHover
        } else {
            PointerIconStyle::NotSpecified
        };
        let Some(controller) = self.stylus_pointers_by_device.get_mut(&args.device_id) else {
            return;
        };
        if let Some(coords) = args.pointer_coords.first() {
            controller.set_position(coords.position());
        }
        if args.action == MotionAction::HoverExit {
            controller.fade(Transition::Immediate);
            controller.update_pointer_icon(exit_icon);
        } else if can_unfade {
            controller.unfade(Transition::Immediate);
        }
    }

    fn process_touchscreen_event(&mut self, args: &MotionArgs) {
        if !args.display_id.is_valid() {
            return;
        }

        if args.action == MotionAction::Down {
            if let Some(controller) = self.mouse_pointers_by_display.get_mut(&args.display_id) {
                controller.fade(Transition::Gradual);
            }
        }

        if !self.show_touches_enabled {
            return;
        }

        if !self.touch_pointers_by_device.contains_key(&args.device_id) {
            let controller = self.policy.create_pointer_controller(ControllerType::Touch);
            self.touch_pointers_by_device.insert(args.device_id, controller);
            self.on_controller_added_or_removed();
        }

        let (id_to_index, id_bits) = spot_mapping(args);
        if let Some(controller) = self.touch_pointers_by_device.get_mut(&args.device_id) {
            controller.set_spots(&args.pointer_coords, &id_to_index, id_bits, args.display_id);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
