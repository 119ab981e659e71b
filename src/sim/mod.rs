//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Seeded RNG only (runs are reproducible from their seed)
//! - Entities live in plain `Vec`s owned by `GameState`
//! - Rendering only ever borrows the state

pub mod geometry;
pub mod spawner;
pub mod state;
pub mod tick;

pub use geometry::{Rect, rounded_rect_outline};
pub use spawner::difficulty_for_distance;
pub use state::{
    EndReason, GamePhase, GameState, Obstacle, Pickup, PickupKind, Road, Snapshot, Vehicle,
};
pub use tick::{DriveInput, StepOutcome, step};
