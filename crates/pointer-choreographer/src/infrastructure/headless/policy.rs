//! A policy that hands out headless controllers and records its callbacks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use pointer_core::{DisplayId, Vec2};
use tracing::info;

use super::controller::{ControllerHandle, HeadlessPointerController};
use super::lock;
use crate::application::interfaces::{ChoreographerPolicy, ControllerType, PointerController};

/// Headless [`ChoreographerPolicy`].
///
/// Keeps a handle to every controller it created, in creation order, plus
/// the pointer-display notifications it received.
#[derive(Debug, Default)]
pub struct HeadlessPolicy {
    controllers: Mutex<Vec<ControllerHandle>>,
    display_changes: Mutex<Vec<(DisplayId, Vec2)>>,
    faded_on_typing: AtomicUsize,
    input_method_active: AtomicBool,
}

impl HeadlessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls what `is_input_method_connection_active` reports.
    pub fn set_input_method_active(&self, active: bool) {
        self.input_method_active.store(active, Ordering::SeqCst);
    }

    /// Every controller created so far, released ones included.
    pub fn controllers(&self) -> Vec<ControllerHandle> {
        lock(&self.controllers).clone()
    }

    pub fn controllers_of_type(&self, controller_type: ControllerType) -> Vec<ControllerHandle> {
        lock(&self.controllers)
            .iter()
            .filter(|handle| handle.controller_type() == controller_type)
            .cloned()
            .collect()
    }

    /// Controllers the choreographer still holds.
    pub fn live_controllers(&self) -> Vec<ControllerHandle> {
        lock(&self.controllers)
            .iter()
            .filter(|handle| !handle.is_released())
            .cloned()
            .collect()
    }

    pub fn display_changes(&self) -> Vec<(DisplayId, Vec2)> {
        lock(&self.display_changes).clone()
    }

    pub fn faded_on_typing_count(&self) -> usize {
        self.faded_on_typing.load(Ordering::SeqCst)
    }
}

impl ChoreographerPolicy for HeadlessPolicy {
    fn create_pointer_controller(&self, controller_type: ControllerType) -> Box<dyn PointerController> {
        let mut controllers = lock(&self.controllers);
        let controller = HeadlessPointerController::new(controllers.len(), controller_type);
        controllers.push(controller.handle());
        Box::new(controller)
    }

    fn notify_pointer_display_id_changed(&self, display_id: DisplayId, position: Vec2) {
        info!(
            "pointer display changed: display {display_id} at ({}, {})",
            position.x, position.y
        );
        lock(&self.display_changes).push((display_id, position));
    }

    fn notify_mouse_cursor_faded_on_typing(&self) {
        info!("mouse cursor faded on typing");
        self.faded_on_typing.fetch_add(1, Ordering::SeqCst);
    }

    fn is_input_method_connection_active(&self) -> bool {
        self.input_method_active.load(Ordering::SeqCst)
    }
}
