//! Collaborator interfaces consumed by the choreographer.
//!
//! The choreographer depends only on these traits. Production wiring plugs in
//! the real renderer, policy and window-metadata service; tests and the
//! `pointer-sim` binary plug in the headless implementations from
//! `infrastructure::headless`.

use pointer_core::{
    DisplayId, DisplayViewport, NotifyArgs, PointerCoords, PointerIconStyle, PointerIdBits,
    SpriteIcon, Transform, Vec2, MAX_POINTER_ID,
};
use pointer_core::input::window::WindowInfo;

use super::privacy::WindowInfosListener;

/// Which kind of pointer representation a controller draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerType {
    /// A single mouse cursor.
    Mouse,
    /// A set of touch spots.
    Touch,
    /// A single stylus hover pointer.
    Stylus,
}

/// How a fade or unfade is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Immediate,
    Gradual,
}

/// Maps a pointer id to its index in an event's coordinate list.
pub type SpotIdToIndex = [usize; MAX_POINTER_ID + 1];

/// One on-screen pointer or touch-spot set.
///
/// Positions are in the display panel's natural (un-rotated) coordinate space.
pub trait PointerController: Send {
    /// Human-readable state for diagnostics.
    fn dump(&self) -> String;

    /// Moves the pointer and returns the part of the delta that could not be
    /// applied because the pointer hit the viewport bounds.
    #[must_use]
    fn move_by(&mut self, delta_x: f32, delta_y: f32) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    fn position(&self) -> Vec2;

    fn fade(&mut self, transition: Transition);

    /// Makes the pointer visible again. The pointer never unfades on its own.
    fn unfade(&mut self, transition: Transition);

    /// Replaces the displayed touch spots.
    fn set_spots(
        &mut self,
        coords: &[PointerCoords],
        id_to_index: &SpotIdToIndex,
        id_bits: PointerIdBits,
        display_id: DisplayId,
    );

    /// The display the pointer is shown on, or [`DisplayId::INVALID`] without a viewport.
    fn display_id(&self) -> DisplayId;

    fn set_display_viewport(&mut self, viewport: &DisplayViewport);

    fn update_pointer_icon(&mut self, style: PointerIconStyle);

    fn set_custom_pointer_icon(&mut self, icon: &SpriteIcon);

    /// Excludes this pointer from screenshots of `display_id` until cleared.
    fn set_skip_screenshot_flag_for_display(&mut self, display_id: DisplayId);

    fn clear_skip_screenshot_flags(&mut self);

    /// Transform from natural space into the current viewport's rotated space.
    fn display_transform(&self) -> Transform;
}

/// System policy hooks.
pub trait ChoreographerPolicy: Send + Sync {
    fn create_pointer_controller(&self, controller_type: ControllerType) -> Box<dyn PointerController>;

    /// Called whenever the display hosting the mouse cursor changes.
    fn notify_pointer_display_id_changed(&self, display_id: DisplayId, position: Vec2);

    fn notify_mouse_cursor_faded_on_typing(&self);

    fn is_input_method_connection_active(&self) -> bool;
}

/// The next stage of the input pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait InputListener: Send + Sync {
    fn notify(&self, args: NotifyArgs);
}

/// Window-metadata service the privacy listener subscribes to.
///
/// `register` is invoked while the choreographer holds its lock, so the
/// implementation must return the initial snapshot instead of pushing it
/// through the listener synchronously.
#[cfg_attr(test, mockall::automock)]
pub trait WindowInfosFeed: Send + Sync {
    /// Subscribes `listener` and returns the current window list.
    fn register(&self, listener: WindowInfosListener) -> Vec<WindowInfo>;

    fn unregister(&self);
}
