//! Display viewport geometry.

use super::geometry::{Orientation, Transform};
use super::ids::DisplayId;

/// The logical bounds and rotation of one display.
///
/// Logical bounds are in the rotated coordinate space; `device_width` and
/// `device_height` describe the panel in its natural orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayViewport {
    pub display_id: DisplayId,
    pub orientation: Orientation,
    pub logical_left: i32,
    pub logical_top: i32,
    pub logical_right: i32,
    pub logical_bottom: i32,
    pub device_width: i32,
    pub device_height: i32,
    pub is_active: bool,
}

impl DisplayViewport {
    /// Creates an unrotated, active viewport of the given size anchored at the origin.
    pub fn new(display_id: DisplayId, width: i32, height: i32) -> Self {
        Self {
            display_id,
            orientation: Orientation::Rotation0,
            logical_left: 0,
            logical_top: 0,
            logical_right: width,
            logical_bottom: height,
            device_width: width,
            device_height: height,
            is_active: true,
        }
    }

    /// Returns a copy with the given orientation; logical bounds are swapped
    /// for quarter turns.
    pub fn rotated(mut self, orientation: Orientation) -> Self {
        let quarter_turn = matches!(orientation, Orientation::Rotation90 | Orientation::Rotation270);
        if quarter_turn {
            self.logical_right = self.logical_left + self.device_height;
            self.logical_bottom = self.logical_top + self.device_width;
        } else {
            self.logical_right = self.logical_left + self.device_width;
            self.logical_bottom = self.logical_top + self.device_height;
        }
        self.orientation = orientation;
        self
    }

    pub fn logical_width(&self) -> i32 {
        self.logical_right - self.logical_left
    }

    pub fn logical_height(&self) -> i32 {
        self.logical_bottom - self.logical_top
    }

    /// Transform from the panel's natural space into this viewport's rotated space.
    pub fn rotation_transform(&self) -> Transform {
        Transform::from_orientation(
            self.orientation,
            self.device_width as f32,
            self.device_height as f32,
        )
    }
}
