//! Relative mouse movement and cursor transfer between adjacent displays.
//!
//! When a relative move pushes the cursor past a viewport edge, the
//! controller reports the unconsumed part of the delta. With the
//! connected-displays feature on, that residual is resolved against the
//! display topology and the cursor controller is re-keyed onto the
//! neighbouring display.

use pointer_core::domain::topology::{crossing_boundary, destination_position};
use pointer_core::{DisplayId, MotionArgs, Vec2};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::interfaces::Transition;
use super::state::ChoreographerState;

/// Errors raised while moving the cursor between displays.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoreographerError {
    /// The destination display already owns a mouse cursor.
    #[error("cannot move cursor from display {source_display} to {destination}: destination already has a mouse cursor")]
    DestinationOccupied {
        source_display: DisplayId,
        destination: DisplayId,
    },
}

impl ChoreographerState {
    /// Applies the relative delta of a single-pointer mouse or touchpad event
    /// to the cursor on `args.display_id`, then rewrites the event's display
    /// and coordinates to the cursor's resulting location.
    pub(crate) fn process_pointer_device_motion(&mut self, args: &mut MotionArgs) {
        let Some(coords) = args.pointer_coords.first() else {
            return;
        };
        let delta = Vec2::new(coords.relative_x, coords.relative_y);

        let source_display = args.display_id;
        let Some(controller) = self.mouse_pointers_by_display.get_mut(&source_display) else {
            return;
        };
        let unconsumed = controller.move_by(delta.x, delta.y);

        if self.flags.connected_displays_cursor && unconsumed.is_nonzero() {
            match self.handle_unconsumed_delta(source_display, unconsumed) {
                Ok(Some(destination)) => args.display_id = destination,
                Ok(None) => {}
                Err(err) => error!("{err}"),
            }
        }

        let Some(controller) = self.mouse_pointers_by_display.get(&args.display_id) else {
            return;
        };
        let position = controller.position();
        if let Some(coords) = args.pointer_coords.first_mut() {
            coords.x = position.x;
            coords.y = position.y;
        }
        args.cursor_position = Some(position);
    }

    /// Moves the cursor on `source_display` to the neighbour it is being
    /// pushed into, if any.
    ///
    /// Returns the destination display when the cursor moved. Returns
    /// `Ok(None)` when no neighbour matches, in which case the cursor stays
    /// clamped on the source display.
    pub(crate) fn handle_unconsumed_delta(
        &mut self,
        source_display: DisplayId,
        unconsumed: Vec2,
    ) -> Result<Option<DisplayId>, ChoreographerError> {
        let Some(controller) = self.mouse_pointers_by_display.get(&source_display) else {
            return Ok(None);
        };

        let source_transform = controller.display_transform();
        let rotated_delta = source_transform.transform_without_translation(unconsumed);
        let rotated_position = source_transform.transform(controller.position());
        let (boundary, cursor_offset) = crossing_boundary(rotated_delta, rotated_position);

        let Some((destination_viewport, destination_offset)) = self
            .topology
            .find_destination(source_display, boundary, cursor_offset, &self.viewports)
            .map(|(viewport, offset)| (viewport.clone(), offset))
        else {
            return Ok(None);
        };
        let destination = destination_viewport.display_id;

        if self.mouse_pointers_by_display.contains_key(&destination) {
            return Err(ChoreographerError::DestinationOccupied {
                source_display,
                destination,
            });
        }
        let Some(mut controller) = self.mouse_pointers_by_display.remove(&source_display) else {
            return Ok(None);
        };

        controller.fade(Transition::Immediate);
        self.default_mouse_display_id = destination;
        controller.set_display_viewport(&destination_viewport);

        let rotated_destination = destination_position(
            &destination_viewport,
            cursor_offset - destination_offset,
            boundary,
        );
        let destination_point = match controller.display_transform().inverse() {
            Some(inverse) => inverse.transform(rotated_destination),
            None => {
                warn!("display {destination} has a degenerate transform; using rotated position");
                rotated_destination
            }
        };
        controller.set_position(destination_point);
        if self.can_unfade_on_display(destination) {
            controller.unfade(Transition::Immediate);
        }

        self.mouse_pointers_by_display.insert(destination, controller);
        // Skip-screenshot flags follow the cursor's new display.
        if self.privacy.is_registered() {
            self.apply_skip_screenshot_flags();
        }
        debug!(
            "cursor moved from display {source_display} to {destination} at ({}, {})",
            destination_point.x, destination_point.y
        );
        Ok(Some(destination))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pointer_core::{
        AdjacentDisplay, DisplayPosition, DisplayTopology, DisplayViewport, Orientation,
    };

    use super::*;
    use crate::application::flags::FeatureFlags;
    use crate::application::interfaces::ControllerType;
    use crate::application::privacy::WindowInfosListener;
    use crate::infrastructure::headless::{HeadlessPolicy, StaticWindowInfosFeed};

    fn side_by_side() -> DisplayTopology {
        let mut topology = DisplayTopology::new();
        topology
            .add_adjacency(
                DisplayId(0),
                AdjacentDisplay {
                    display_id: DisplayId(1),
                    position: DisplayPosition::Right,
                    offset_px: 0.0,
                },
            )
            .unwrap();
        topology
            .add_adjacency(
                DisplayId(1),
                AdjacentDisplay {
                    display_id: DisplayId(0),
                    position: DisplayPosition::Left,
                    offset_px: 0.0,
                },
            )
            .unwrap();
        topology
    }

    fn state_with_cursor_at(position: Vec2) -> (ChoreographerState, Arc<HeadlessPolicy>) {
        let policy = Arc::new(HeadlessPolicy::new());
        let mut state = ChoreographerState::new(
            policy.clone(),
            Arc::new(StaticWindowInfosFeed::default()),
            FeatureFlags::default(),
            WindowInfosListener::new(std::sync::Weak::new()),
        );
        state.topology = side_by_side();
        state.topology_supplied = true;
        state.viewports = vec![
            DisplayViewport::new(DisplayId(0), 1000, 800),
            DisplayViewport::new(DisplayId(1), 600, 400),
        ];
        let display = state.ensure_mouse_controller(DisplayId::INVALID);
        let controller = state.mouse_pointers_by_display.get_mut(&display).unwrap();
        controller.set_position(position);
        controller.unfade(Transition::Immediate);
        (state, policy)
    }

    #[test]
    fn test_unconsumed_delta_moves_controller_to_neighbour() {
        // Arrange
        let (mut state, policy) = state_with_cursor_at(Vec2::new(999.0, 300.0));

        // Act
        let moved = state.handle_unconsumed_delta(DisplayId(0), Vec2::new(50.0, 0.0));

        // Assert
        assert_eq!(moved, Ok(Some(DisplayId(1))));
        assert_eq!(state.default_mouse_display_id, DisplayId(1));
        assert!(!state.mouse_pointers_by_display.contains_key(&DisplayId(0)));
        let cursor = &policy.controllers_of_type(ControllerType::Mouse)[0];
        assert_eq!(cursor.display_id(), DisplayId(1));
        assert_eq!(cursor.position(), Vec2::new(0.0, 300.0));
        assert!(cursor.is_visible());
    }

    #[test]
    fn test_unconsumed_delta_outside_neighbour_span_keeps_cursor() {
        // Arrange: display 1 is only 400 tall, so y=700 misses it.
        let (mut state, _policy) = state_with_cursor_at(Vec2::new(999.0, 700.0));

        // Act
        let moved = state.handle_unconsumed_delta(DisplayId(0), Vec2::new(50.0, 0.0));

        // Assert
        assert_eq!(moved, Ok(None));
        assert!(state.mouse_pointers_by_display.contains_key(&DisplayId(0)));
        assert_eq!(state.default_mouse_display_id, DisplayId(0));
    }

    #[test]
    fn test_occupied_destination_abandons_transfer() {
        // Arrange
        let (mut state, _policy) = state_with_cursor_at(Vec2::new(999.0, 300.0));
        state.ensure_mouse_controller(DisplayId(1));

        // Act
        let moved = state.handle_unconsumed_delta(DisplayId(0), Vec2::new(50.0, 0.0));

        // Assert
        assert_eq!(
            moved,
            Err(ChoreographerError::DestinationOccupied {
                source_display: DisplayId(0),
                destination: DisplayId(1),
            })
        );
        assert_eq!(state.mouse_pointers_by_display.len(), 2);
        assert_eq!(state.default_mouse_display_id, DisplayId(0));
    }

    #[test]
    fn test_transfer_into_rotated_display_maps_back_to_natural_space() {
        // Arrange: display 1 is a 600x1200 panel turned a quarter, so its
        // logical space is 1200 wide and 600 tall.
        let (mut state, policy) = state_with_cursor_at(Vec2::new(999.0, 300.0));
        state.viewports[1] =
            DisplayViewport::new(DisplayId(1), 600, 1200).rotated(Orientation::Rotation90);

        // Act
        let moved = state.handle_unconsumed_delta(DisplayId(0), Vec2::new(50.0, 0.0));

        // Assert: logical (0, 300) is natural (600 - 300, 0).
        assert_eq!(moved, Ok(Some(DisplayId(1))));
        let cursor = &policy.controllers_of_type(ControllerType::Mouse)[0];
        assert_eq!(cursor.position(), Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_transfer_into_hidden_display_keeps_cursor_faded() {
        // Arrange
        let (mut state, policy) = state_with_cursor_at(Vec2::new(999.0, 300.0));
        state.set_pointer_icon_visibility(DisplayId(1), false);

        // Act
        let moved = state.handle_unconsumed_delta(DisplayId(0), Vec2::new(50.0, 0.0));

        // Assert
        assert_eq!(moved, Ok(Some(DisplayId(1))));
        assert!(!policy.controllers_of_type(ControllerType::Mouse)[0].is_visible());
    }
}
