//! Motion event model.

use crate::domain::geometry::Vec2;
use crate::domain::ids::{DeviceId, DisplayId};

use super::source::{Source, ToolType};

/// Highest pointer id a motion event may carry.
pub const MAX_POINTER_ID: usize = 31;

/// What happened in a motion event.
///
/// `PointerDown` and `PointerUp` carry the index (not the id) of the pointer
/// that went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAction {
    Down,
    Up,
    Move,
    Cancel,
    PointerDown(usize),
    PointerUp(usize),
    HoverEnter,
    HoverMove,
    HoverExit,
    Scroll,
    ButtonPress,
    ButtonRelease,
}

impl MotionAction {
    pub fn is_hover(self) -> bool {
        matches!(
            self,
            MotionAction::HoverEnter | MotionAction::HoverMove | MotionAction::HoverExit
        )
    }
}

/// Gesture classification attached by upstream gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionClassification {
    #[default]
    None,
    AmbiguousGesture,
    DeepPress,
    TwoFingerSwipe,
    MultiFingerSwipe,
    Pinch,
}

/// Identity of one pointer within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerProperties {
    pub id: usize,
    pub tool_type: ToolType,
}

/// Axis values for one pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerCoords {
    pub x: f32,
    pub y: f32,
    pub relative_x: f32,
    pub relative_y: f32,
    pub pressure: f32,
}

impl PointerCoords {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn relative(dx: f32, dy: f32) -> Self {
        Self {
            relative_x: dx,
            relative_y: dy,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A set of pointer ids, one bit per id up to [`MAX_POINTER_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerIdBits(pub u32);

impl PointerIdBits {
    /// Ids above [`MAX_POINTER_ID`] are ignored.
    pub fn mark(&mut self, id: usize) {
        if id <= MAX_POINTER_ID {
            self.0 |= 1 << id;
        }
    }

    pub fn has(&self, id: usize) -> bool {
        id <= MAX_POINTER_ID && self.0 & (1 << id) != 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A motion sample as it travels through the input pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionArgs {
    pub event_time_ns: i64,
    pub device_id: DeviceId,
    pub source: Source,
    pub display_id: DisplayId,
    pub action: MotionAction,
    pub classification: MotionClassification,
    pub pointer_properties: Vec<PointerProperties>,
    pub pointer_coords: Vec<PointerCoords>,
    /// Absolute cursor position, present only for devices that know it.
    pub cursor_position: Option<Vec2>,
}

impl MotionArgs {
    /// Creates a single-pointer event; use the builder methods for the rest.
    pub fn new(
        device_id: DeviceId,
        source: Source,
        display_id: DisplayId,
        action: MotionAction,
        tool_type: ToolType,
        coords: PointerCoords,
    ) -> Self {
        Self {
            event_time_ns: 0,
            device_id,
            source,
            display_id,
            action,
            classification: MotionClassification::None,
            pointer_properties: vec![PointerProperties { id: 0, tool_type }],
            pointer_coords: vec![coords],
            cursor_position: None,
        }
    }

    pub fn with_pointer(mut self, id: usize, tool_type: ToolType, coords: PointerCoords) -> Self {
        self.pointer_properties.push(PointerProperties { id, tool_type });
        self.pointer_coords.push(coords);
        self
    }

    pub fn with_classification(mut self, classification: MotionClassification) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_cursor_position(mut self, position: Vec2) -> Self {
        self.cursor_position = Some(position);
        self
    }

    pub fn pointer_count(&self) -> usize {
        self.pointer_properties.len()
    }

    /// Tool type of the first pointer.
    pub fn primary_tool_type(&self) -> ToolType {
        self.pointer_properties
            .first()
            .map(|p| p.tool_type)
            .unwrap_or_default()
    }

    pub fn is_from_mouse(&self) -> bool {
        self.source.contains(Source::MOUSE) && self.primary_tool_type() == ToolType::Mouse
    }

    pub fn is_from_touchpad(&self) -> bool {
        self.source.contains(Source::MOUSE) && self.primary_tool_type() == ToolType::Finger
    }

    pub fn is_from_drawing_tablet(&self) -> bool {
        self.source.is_drawing_tablet() && self.primary_tool_type().is_stylus()
    }

    /// A stylus-sourced event with at least one stylus pointer.
    pub fn is_stylus_event(&self) -> bool {
        self.source.contains(Source::STYLUS)
            && self.pointer_properties.iter().any(|p| p.tool_type.is_stylus())
    }

    pub fn is_stylus_hover(&self) -> bool {
        self.is_stylus_event() && self.action.is_hover()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(source: Source, tool: ToolType, action: MotionAction) -> MotionArgs {
        MotionArgs::new(
            DeviceId(1),
            source,
            DisplayId::DEFAULT,
            action,
            tool,
            PointerCoords::default(),
        )
    }

    #[test]
    fn test_mouse_source_with_finger_tool_is_touchpad_not_mouse() {
        let e = event(Source::MOUSE, ToolType::Finger, MotionAction::HoverMove);
        assert!(e.is_from_touchpad());
        assert!(!e.is_from_mouse());
    }

    #[test]
    fn test_drawing_tablet_requires_stylus_tool() {
        let tablet = Source::MOUSE | Source::STYLUS;
        assert!(event(tablet, ToolType::Stylus, MotionAction::HoverMove).is_from_drawing_tablet());
        assert!(!event(tablet, ToolType::Mouse, MotionAction::HoverMove).is_from_drawing_tablet());
    }

    #[test]
    fn test_stylus_hover_requires_hover_action() {
        let source = Source::STYLUS | Source::TOUCHSCREEN;
        assert!(event(source, ToolType::Stylus, MotionAction::HoverEnter).is_stylus_hover());
        assert!(!event(source, ToolType::Stylus, MotionAction::Down).is_stylus_hover());
        assert!(!event(source, ToolType::Finger, MotionAction::HoverMove).is_stylus_hover());
    }

    #[test]
    fn test_pointer_id_bits_mark_and_count() {
        let mut bits = PointerIdBits::default();
        bits.mark(0);
        bits.mark(5);
        assert!(bits.has(5));
        assert!(!bits.has(1));
        assert_eq!(bits.count(), 2);
    }

    #[test]
    fn test_with_pointer_appends_properties_and_coords() {
        let e = event(Source::TOUCHSCREEN, ToolType::Finger, MotionAction::Move)
            .with_pointer(3, ToolType::Finger, PointerCoords::at(1.0, 2.0));
        assert_eq!(e.pointer_count(), 2);
        assert_eq!(e.pointer_properties[1].id, 3);
        assert_eq!(e.pointer_coords[1].position(), Vec2::new(1.0, 2.0));
    }
}
