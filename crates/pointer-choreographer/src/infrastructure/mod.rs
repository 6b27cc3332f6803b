//! Infrastructure layer for the choreographer.
//!
//! Contains the headless collaborators (pointer controllers, policy, window
//! feed, recording listener) and file-system storage for the simulator's
//! configuration and scenario files.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pointer_core`, but MUST NOT be imported by the `application` layer
//! outside of its tests.

pub mod headless;
pub mod storage;
