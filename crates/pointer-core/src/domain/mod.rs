//! Domain entities for the pointer choreographer.
//!
//! Everything here is pure data and geometry: no locks, no collaborators, no
//! logging configuration. The application layer in `pointer-choreographer`
//! builds on these types.

pub mod geometry;
pub mod icon;
pub mod ids;

/// Display adjacency graph and the edge-crossing geometry built on it.
///
/// See [`topology::DisplayTopology`] for the main type.
pub mod topology;
pub mod viewport;
