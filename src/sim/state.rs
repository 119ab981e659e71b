//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]. The render pass only
//! borrows it; the step function is the only writer.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    Idle,
    /// Active gameplay
    Running,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Collision,
    OutOfFuel,
}

/// The road the vehicle drives on
#[derive(Debug, Clone)]
pub struct Road {
    pub left: f32,
    pub right: f32,
    pub lane_count: u32,
    lane_width: f32,
    /// Dash-line phase; grows with speed, never read by gameplay
    pub scroll: f32,
}

impl Road {
    /// Road inset from both canvas edges
    pub fn for_width(canvas_width: f32, lane_count: u32) -> Self {
        let margin = (canvas_width * ROAD_MARGIN_FRACTION).clamp(ROAD_MARGIN_MIN, ROAD_MARGIN_MAX);
        let mut road = Self {
            left: 0.0,
            right: 0.0,
            lane_count: lane_count.max(1),
            lane_width: 0.0,
            scroll: 0.0,
        };
        road.set_bounds(margin, canvas_width - margin);
        road
    }

    /// Move the road edges; keeps the lane width in sync
    pub fn set_bounds(&mut self, left: f32, right: f32) {
        self.left = left;
        self.right = right;
        self.lane_width = (right - left) / self.lane_count as f32;
    }

    pub fn lane_width(&self) -> f32 {
        self.lane_width
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Horizontal center of lane `index`
    pub fn lane_center(&self, index: u32) -> f32 {
        self.left + index as f32 * self.lane_width + self.lane_width * 0.5
    }
}

/// The player's vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub rect: Rect,
    /// Lateral velocity (pixels per step)
    pub vx: f32,
    /// Forward speed in `[0, MAX_SPEED]`
    pub speed: f32,
    /// Lean in degrees, cosmetic
    pub angle: f32,
    /// Row the cosmetic vertical drift is measured from
    pub rest_y: f32,
}

impl Vehicle {
    /// Vehicle sized for the canvas, centered on the road at its rest row
    pub fn new(canvas_width: f32, canvas_height: f32, road: &Road) -> Self {
        let w = (canvas_width * VEHICLE_WIDTH_FRACTION).clamp(VEHICLE_WIDTH_MIN, VEHICLE_WIDTH_MAX);
        let h = w * VEHICLE_ASPECT;
        let x = (road.left + road.right) / 2.0 - w / 2.0;
        let rest_y = canvas_height - h - VEHICLE_BOTTOM_GAP;
        Self {
            rect: Rect::new(x, rest_y, w, h),
            vx: 0.0,
            speed: 0.0,
            angle: 0.0,
            rest_y,
        }
    }

    /// Horizontal range the vehicle may occupy on `road`
    pub fn x_limits(&self, road: &Road) -> (f32, f32) {
        (
            road.left + ROAD_INSET,
            road.right - self.rect.size.x - ROAD_INSET,
        )
    }
}

/// Traffic colors (red, amber, green, blue, cyan, violet)
pub const OBSTACLE_PALETTE_LEN: usize = 6;

/// Oncoming traffic
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    /// Downward velocity fixed at spawn time
    pub vy: f32,
    /// Index into the traffic palette
    pub color: u8,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Fuel,
    Coin,
}

/// A collectible
#[derive(Debug, Clone)]
pub struct Pickup {
    pub rect: Rect,
    pub vy: f32,
    pub kind: PickupKind,
}

/// Read-only per-frame summary for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Speed x10, rounded (shown as km/h)
    pub speed: u32,
    /// Whole distance units travelled
    pub distance: u64,
    pub score: u64,
    /// Rounded fuel percentage, never negative
    pub fuel: u32,
    pub best: u64,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Canvas size in logical pixels
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    pub road: Road,
    pub vehicle: Vehicle,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Pickup>,
    /// Elapsed simulation time (ms); drives the spawn gates
    pub clock_ms: f64,
    pub last_obstacle_ms: f64,
    pub last_pickup_ms: f64,
    pub distance: f32,
    pub score: u64,
    pub fuel: f32,
    pub difficulty: f32,
    /// Steps taken this run
    pub steps: u64,
}

impl GameState {
    /// Fresh run for a canvas of the given logical size
    pub fn new(width: f32, height: f32, lane_count: u32, seed: u64) -> Self {
        let road = Road::for_width(width, lane_count);
        let vehicle = Vehicle::new(width, height, &road);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            phase: GamePhase::Idle,
            end_reason: None,
            road,
            vehicle,
            obstacles: Vec::new(),
            pickups: Vec::new(),
            clock_ms: 0.0,
            last_obstacle_ms: 0.0,
            last_pickup_ms: 0.0,
            distance: 0.0,
            score: 0,
            fuel: FUEL_MAX,
            difficulty: 1.0,
            steps: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// End the run; the first reason sticks
    pub fn end(&mut self, reason: EndReason) {
        if self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            self.end_reason = Some(reason);
        }
    }

    /// HUD summary of the current state
    pub fn snapshot(&self, best: u64) -> Snapshot {
        Snapshot {
            speed: (self.vehicle.speed * 10.0).round() as u32,
            distance: self.distance.floor() as u64,
            score: self.score,
            fuel: self.fuel.round().max(0.0) as u32,
            best,
        }
    }
}
