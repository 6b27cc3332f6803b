//! # pointer-choreographer
//!
//! Decides which pointer controllers exist and where they are drawn, for
//! every mouse, touchpad, touchscreen, stylus and drawing tablet feeding an
//! input pipeline, and forwards each input notification to the next stage.
//!
//! - **`application`** – the [`PointerChoreographer`] and its collaborator traits.
//! - **`infrastructure`** – headless collaborators, TOML configuration and
//!   scenario files used by the `pointer-sim` binary and the tests.

pub mod application;
pub mod infrastructure;

pub use application::{
    ChoreographerError, ChoreographerPolicy, ControllerKeys, ControllerType, FeatureFlags,
    InputListener, PointerChoreographer, PointerController, Transition, WindowInfosFeed,
    WindowInfosListener,
};
