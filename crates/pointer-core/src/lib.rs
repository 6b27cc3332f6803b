//! # pointer-core
//!
//! Shared domain types for the pointer choreographer: display identifiers,
//! viewport geometry, the display adjacency graph used for multi-display
//! cursor crossing, pointer icons, and the input event model.
//!
//! This crate has no knowledge of pointer controllers, locks, or the policy
//! that owns them; that lives in `pointer-choreographer`.
//!
//! - **`domain`** – ids, geometry, viewports, topology and icons.
//! - **`input`** – source bitmasks, motion/key events, device and window
//!   metadata, and the downstream notification envelope.

pub mod domain;
pub mod input;

pub use domain::geometry::{Orientation, Transform, Vec2};
pub use domain::icon::{PointerIcon, PointerIconStyle, SpriteIcon};
pub use domain::ids::{DeviceId, DisplayId};
pub use domain::topology::{
    AdjacentDisplay, DisplayPosition, DisplayTopology, TopologyError, FALLBACK_OFFSET_PX,
};
pub use domain::viewport::DisplayViewport;
pub use input::device::InputDeviceInfo;
pub use input::key::{KeyAction, KeyArgs, KeyCode, MetaState};
pub use input::motion::{
    MotionAction, MotionArgs, MotionClassification, PointerCoords, PointerIdBits,
    PointerProperties, MAX_POINTER_ID,
};
pub use input::notify::NotifyArgs;
pub use input::source::{Source, ToolType};
