//! An in-process window-metadata feed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use pointer_core::input::window::{WindowInfo, WindowInfosUpdate};
use tracing::debug;

use super::lock;
use crate::application::interfaces::WindowInfosFeed;
use crate::application::privacy::WindowInfosListener;

/// Holds the current window list and pushes updates to the registered listener.
#[derive(Debug, Default)]
pub struct StaticWindowInfosFeed {
    windows: Mutex<Vec<WindowInfo>>,
    listener: Mutex<Option<WindowInfosListener>>,
    registrations: AtomicUsize,
    unregistrations: AtomicUsize,
}

impl StaticWindowInfosFeed {
    /// Creates a feed whose registration snapshot is `windows`.
    pub fn new(windows: Vec<WindowInfo>) -> Self {
        Self {
            windows: Mutex::new(windows),
            ..Self::default()
        }
    }

    /// Stores `update` as the current state and delivers it to the listener.
    ///
    /// Returns `false` if no listener is registered.
    pub fn publish(&self, update: &WindowInfosUpdate) -> bool {
        *lock(&self.windows) = update.window_infos.clone();
        // Deliver without holding our own lock; the listener takes the choreographer's.
        let listener = lock(&self.listener).clone();
        match listener {
            Some(listener) => {
                listener.on_window_infos_changed(update);
                true
            }
            None => {
                debug!("window infos update with no listener registered");
                false
            }
        }
    }

    pub fn is_registered(&self) -> bool {
        lock(&self.listener).is_some()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn unregistration_count(&self) -> usize {
        self.unregistrations.load(Ordering::SeqCst)
    }
}

impl WindowInfosFeed for StaticWindowInfosFeed {
    fn register(&self, listener: WindowInfosListener) -> Vec<WindowInfo> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        *lock(&self.listener) = Some(listener);
        lock(&self.windows).clone()
    }

    fn unregister(&self) {
        self.unregistrations.fetch_add(1, Ordering::SeqCst);
        *lock(&self.listener) = None;
    }
}
