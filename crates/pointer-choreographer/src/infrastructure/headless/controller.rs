//! A pointer controller that records its state instead of drawing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use pointer_core::{
    DisplayId, DisplayViewport, PointerCoords, PointerIcon, PointerIconStyle, PointerIdBits,
    SpriteIcon, Transform, Vec2, MAX_POINTER_ID,
};
use tracing::trace;

use super::lock;
use crate::application::interfaces::{ControllerType, PointerController, SpotIdToIndex, Transition};

/// Touch spots as last set on a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotSnapshot {
    pub display_id: DisplayId,
    /// Spot position by pointer id.
    pub positions: BTreeMap<usize, Vec2>,
}

/// Everything a headless controller has been told.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerRecord {
    pub controller_type: ControllerType,
    pub position: Vec2,
    pub viewport: Option<DisplayViewport>,
    pub visible: bool,
    pub last_transition: Option<Transition>,
    pub icon: Option<PointerIcon>,
    pub spots: Option<SpotSnapshot>,
    pub skip_screenshot_displays: BTreeSet<DisplayId>,
    /// Set once the choreographer drops the controller.
    pub released: bool,
}

impl ControllerRecord {
    fn new(controller_type: ControllerType) -> Self {
        Self {
            controller_type,
            position: Vec2::ZERO,
            viewport: None,
            visible: false,
            last_transition: None,
            icon: None,
            spots: None,
            skip_screenshot_displays: BTreeSet::new(),
            released: false,
        }
    }
}

/// Read-side handle onto a headless controller's record.
///
/// Stays valid after the controller itself is dropped.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    id: usize,
    record: Arc<Mutex<ControllerRecord>>,
}

impl ControllerHandle {
    /// Creation order, starting at zero.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn snapshot(&self) -> ControllerRecord {
        lock(&self.record).clone()
    }

    pub fn controller_type(&self) -> ControllerType {
        lock(&self.record).controller_type
    }

    pub fn position(&self) -> Vec2 {
        lock(&self.record).position
    }

    pub fn display_id(&self) -> DisplayId {
        lock(&self.record)
            .viewport
            .as_ref()
            .map_or(DisplayId::INVALID, |vp| vp.display_id)
    }

    pub fn is_visible(&self) -> bool {
        lock(&self.record).visible
    }

    pub fn icon(&self) -> Option<PointerIcon> {
        lock(&self.record).icon.clone()
    }

    pub fn spots(&self) -> Option<SpotSnapshot> {
        lock(&self.record).spots.clone()
    }

    pub fn skip_screenshot_displays(&self) -> BTreeSet<DisplayId> {
        lock(&self.record).skip_screenshot_displays.clone()
    }

    pub fn is_released(&self) -> bool {
        lock(&self.record).released
    }
}

/// Headless [`PointerController`].
///
/// Starts faded with no viewport. Relative moves are clamped to the
/// viewport's bounds in natural space and the remainder is reported back.
pub struct HeadlessPointerController {
    handle: ControllerHandle,
}

impl HeadlessPointerController {
    pub fn new(id: usize, controller_type: ControllerType) -> Self {
        Self {
            handle: ControllerHandle {
                id,
                record: Arc::new(Mutex::new(ControllerRecord::new(controller_type))),
            },
        }
    }

    pub fn handle(&self) -> ControllerHandle {
        self.handle.clone()
    }
}

/// The viewport's extent in natural coordinates, as `(min, max)` with `max` exclusive.
fn natural_bounds(viewport: &DisplayViewport) -> Option<(Vec2, Vec2)> {
    let inverse = viewport.rotation_transform().inverse()?;
    let a = inverse.transform(Vec2::new(
        viewport.logical_left as f32,
        viewport.logical_top as f32,
    ));
    let b = inverse.transform(Vec2::new(
        viewport.logical_right as f32,
        viewport.logical_bottom as f32,
    ));
    Some((
        Vec2::new(a.x.min(b.x), a.y.min(b.y)),
        Vec2::new(a.x.max(b.x), a.y.max(b.y)),
    ))
}

impl PointerController for HeadlessPointerController {
    fn dump(&self) -> String {
        let record = lock(&self.handle.record);
        let display = record
            .viewport
            .as_ref()
            .map_or(DisplayId::INVALID, |vp| vp.display_id);
        let mut out = format!(
            "type: {:?}\nposition: ({}, {})\ndisplay: {display}\nvisible: {}\n",
            record.controller_type, record.position.x, record.position.y, record.visible
        );
        match &record.icon {
            Some(PointerIcon::Custom(sprite)) => {
                out.push_str(&format!("icon: custom {}x{}\n", sprite.width, sprite.height));
            }
            Some(PointerIcon::Style(style)) => out.push_str(&format!("icon: {style:?}\n")),
            None => {}
        }
        if !record.skip_screenshot_displays.is_empty() {
            out.push_str(&format!(
                "skip screenshot: {:?}\n",
                record.skip_screenshot_displays
            ));
        }
        out
    }

    fn move_by(&mut self, delta_x: f32, delta_y: f32) -> Vec2 {
        let mut record = lock(&self.handle.record);
        let target = Vec2::new(record.position.x + delta_x, record.position.y + delta_y);
        let Some((min, max)) = record.viewport.as_ref().and_then(natural_bounds) else {
            record.position = target;
            return Vec2::ZERO;
        };

        let clamped = Vec2::new(
            target.x.clamp(min.x, (max.x - 1.0).max(min.x)),
            target.y.clamp(min.y, (max.y - 1.0).max(min.y)),
        );
        record.position = clamped;
        Vec2::new(target.x - clamped.x, target.y - clamped.y)
    }

    fn set_position(&mut self, position: Vec2) {
        lock(&self.handle.record).position = position;
    }

    fn position(&self) -> Vec2 {
        lock(&self.handle.record).position
    }

    fn fade(&mut self, transition: Transition) {
        let mut record = lock(&self.handle.record);
        record.visible = false;
        record.last_transition = Some(transition);
    }

    fn unfade(&mut self, transition: Transition) {
        let mut record = lock(&self.handle.record);
        record.visible = true;
        record.last_transition = Some(transition);
    }

    fn set_spots(
        &mut self,
        coords: &[PointerCoords],
        id_to_index: &SpotIdToIndex,
        id_bits: PointerIdBits,
        display_id: DisplayId,
    ) {
        let positions = (0..=MAX_POINTER_ID)
            .filter(|&id| id_bits.has(id))
            .filter_map(|id| coords.get(id_to_index[id]).map(|c| (id, c.position())))
            .collect();
        lock(&self.handle.record).spots = Some(SpotSnapshot {
            display_id,
            positions,
        });
    }

    fn display_id(&self) -> DisplayId {
        self.handle.display_id()
    }

    fn set_display_viewport(&mut self, viewport: &DisplayViewport) {
        trace!("controller {} viewport -> display {}", self.handle.id, viewport.display_id);
        lock(&self.handle.record).viewport = Some(viewport.clone());
    }

    fn update_pointer_icon(&mut self, style: PointerIconStyle) {
        lock(&self.handle.record).icon = Some(PointerIcon::Style(style));
    }

    fn set_custom_pointer_icon(&mut self, icon: &SpriteIcon) {
        lock(&self.handle.record).icon = Some(PointerIcon::Custom(icon.clone()));
    }

    fn set_skip_screenshot_flag_for_display(&mut self, display_id: DisplayId) {
        lock(&self.handle.record)
            .skip_screenshot_displays
            .insert(display_id);
    }

    fn clear_skip_screenshot_flags(&mut self) {
        lock(&self.handle.record).skip_screenshot_displays.clear();
    }

    fn display_transform(&self) -> Transform {
        lock(&self.handle.record)
            .viewport
            .as_ref()
            .map_or(Transform::IDENTITY, DisplayViewport::rotation_transform)
    }
}

impl Drop for HeadlessPointerController {
    fn drop(&mut self) {
        lock(&self.handle.record).released = true;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
