//! Arcade Driving - A lane-dodging arcade driving game
//!
//! Core modules:
//! - `sim`: Simulation (vehicle kinematics, spawning, collisions, fuel, scoring)
//! - `renderer`: Frame building and WebGPU rendering pipeline
//! - `session`: Frame loop driver and run lifecycle
//! - `platform`: Browser/native platform abstraction (input, viewport)
//! - `persistence`: Key-value storage backends

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::BestScore;
pub use session::{Frame, Session};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Per-step terms (steering, drift, scroll, spawn motion) are applied once per
/// simulation call. Fuel and distance terms scale with elapsed milliseconds.
pub mod consts {
    /// Largest elapsed time fed into one step (ms)
    pub const MAX_FRAME_DT: f32 = 32.0;
    /// Converts speed x milliseconds into distance/fuel units
    pub const MS_SCALE: f32 = 0.06;

    /// Road layout
    pub const LANE_COUNT: u32 = 3;
    pub const ROAD_MARGIN_FRACTION: f32 = 0.08;
    pub const ROAD_MARGIN_MIN: f32 = 20.0;
    pub const ROAD_MARGIN_MAX: f32 = 60.0;
    /// Gap kept between the vehicle and the road edge
    pub const ROAD_INSET: f32 = 8.0;
    /// Scroll offset gained per unit of speed each step
    pub const SCROLL_PER_SPEED: f32 = 2.0;

    /// Vehicle size (width is a fraction of the canvas width, clamped)
    pub const VEHICLE_WIDTH_FRACTION: f32 = 0.08;
    pub const VEHICLE_WIDTH_MIN: f32 = 26.0;
    pub const VEHICLE_WIDTH_MAX: f32 = 40.0;
    pub const VEHICLE_ASPECT: f32 = 1.6;
    /// Distance between the vehicle's rest row and the bottom edge
    pub const VEHICLE_BOTTOM_GAP: f32 = 30.0;

    /// Forward speed
    pub const MAX_SPEED: f32 = 10.0;
    pub const ACCEL: f32 = 0.2;
    pub const BRAKE: f32 = 0.3;

    /// Lateral velocity added per step while steering
    pub const STEER_IMPULSE: f32 = 0.9;
    /// Lateral velocity multiplier applied every step
    pub const LATERAL_DAMPING: f32 = 0.85;
    /// Lean angle per unit of steering (degrees)
    pub const LEAN_DEGREES: f32 = 8.0;

    /// Speed at which the cosmetic vertical drift is zero
    pub const DRIFT_NEUTRAL_SPEED: f32 = 3.0;
    pub const DRIFT_PER_SPEED: f32 = 0.2;
    /// Maximum cosmetic drift away from the rest row (pixels).
    /// The drift term itself is unbounded; this clamp is the only limit.
    pub const DRIFT_LIMIT: f32 = 40.0;

    /// Fraction of vehicle speed added to every entity's fall speed
    pub const RELATIVE_MOTION: f32 = 0.6;
    /// Entities are dropped once they fall this far below the bottom edge
    pub const PRUNE_MARGIN: f32 = 80.0;
    /// Spawned entities start this far above the top edge
    pub const SPAWN_OFFSET: f32 = 20.0;

    /// Obstacle spawn gate: max(floor, base / difficulty) ms
    pub const OBSTACLE_GATE_FLOOR: f64 = 300.0;
    pub const OBSTACLE_GATE_BASE: f64 = 900.0;
    pub const OBSTACLE_MIN_WIDTH: f32 = 24.0;
    pub const OBSTACLE_WIDTH_RANGE: (f32, f32) = (0.85, 1.1);
    pub const OBSTACLE_ASPECT_RANGE: (f32, f32) = (1.4, 1.8);
    pub const OBSTACLE_SPEED_RANGE: (f32, f32) = (1.5, 4.0);

    /// Pickup spawn gate: max(floor, base / difficulty) ms
    pub const PICKUP_GATE_FLOOR: f64 = 800.0;
    pub const PICKUP_GATE_BASE: f64 = 1600.0;
    pub const PICKUP_MIN_SIZE: f32 = 14.0;
    pub const PICKUP_SIZE_FRACTION: f32 = 0.6;
    pub const PICKUP_SPEED: f32 = 2.5;
    /// Probability that a spawned pickup is fuel rather than a coin
    pub const FUEL_PICKUP_CHANCE: f64 = 0.7;

    /// Fuel
    pub const FUEL_MAX: f32 = 100.0;
    pub const FUEL_REFILL: f32 = 25.0;
    pub const FUEL_BURN_BASE: f32 = 0.02;
    pub const FUEL_BURN_PER_SPEED: f32 = 0.01;

    /// Score bonus for a collected coin
    pub const COIN_BONUS: u64 = 100;

    /// Difficulty = 1 + min(DIFFICULTY_MAX_BONUS, distance / DIFFICULTY_DISTANCE)
    pub const DIFFICULTY_DISTANCE: f32 = 3000.0;
    pub const DIFFICULTY_MAX_BONUS: f32 = 2.5;
}
