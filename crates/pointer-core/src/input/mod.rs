//! Input event model shared by the choreographer and its collaborators.
//!
//! - **`source`** – device source bitmasks and tool types used for classification.
//! - **`motion`** / **`key`** – the two event kinds the choreographer inspects.
//! - **`device`** – the per-device snapshot entries driving reconciliation.
//! - **`window`** – window metadata used to detect privacy-sensitive displays.
//! - **`notify`** – the envelope forwarded to the next pipeline stage.

pub mod device;
pub mod key;
pub mod motion;
pub mod notify;
pub mod source;
pub mod window;
