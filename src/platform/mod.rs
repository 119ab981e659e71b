//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input mapping (keyboard codes, touch pads)
//! - Canvas sizing

pub mod input;
pub mod viewport;

pub use input::{Command, Direction, command_for_key, direction_for_key};
pub use viewport::Viewport;
