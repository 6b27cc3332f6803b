//! Storage infrastructure: simulator configuration and scenario files.
//!
//! - `config` reads the display, topology and device description.
//! - `scenario` reads and replays scripted input steps.
//!
//! Both are read-only; nothing is ever written back.

pub mod config;
pub mod scenario;
