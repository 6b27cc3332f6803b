//! Application layer: the pointer choreographer and the traits it depends on.
//!
//! - **`choreographer`** – the public [`PointerChoreographer`] entry point.
//! - **`interfaces`** – pointer controller, policy, listener and feed traits.
//! - **`state`** – the lock-protected state and its shared helpers.
//! - **`reconcile`** – controller maps kept in step with the device snapshot.
//! - **`route_motion`** – per-source motion handling.
//! - **`cross_display`** – cursor transfer between adjacent displays.
//! - **`privacy`** – skip-screenshot flags and the window-metadata listener.
//!
//! Nothing here touches a real renderer or window service; all such
//! collaborators are injected as trait objects.

pub mod choreographer;
pub mod cross_display;
pub mod flags;
pub mod interfaces;
pub mod privacy;
mod reconcile;
pub mod route_motion;
pub(crate) mod state;

pub use choreographer::{ControllerKeys, PointerChoreographer};
pub use cross_display::ChoreographerError;
pub use flags::FeatureFlags;
pub use interfaces::{
    ChoreographerPolicy, ControllerType, InputListener, PointerController, SpotIdToIndex,
    Transition, WindowInfosFeed,
};
pub use privacy::WindowInfosListener;
