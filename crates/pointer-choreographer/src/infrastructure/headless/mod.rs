//! Headless collaborators.
//!
//! In-memory implementations of every trait the choreographer consumes.
//! They draw nothing; instead each one records what it was asked to do so
//! the simulator can log it and tests can assert on it.

mod controller;
mod listener;
mod policy;
mod window_feed;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use controller::{ControllerHandle, ControllerRecord, HeadlessPointerController, SpotSnapshot};
pub use listener::RecordingInputListener;
pub use policy::HeadlessPolicy;
pub use window_feed::StaticWindowInfosFeed;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
