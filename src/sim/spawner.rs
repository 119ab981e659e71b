//! Time-gated traffic and pickup generation
//!
//! Gates compare the run's spawn clock against the last spawn of each class.
//! Shorter gates at higher difficulty, clamped by a floor.

use rand::Rng;

use super::geometry::Rect;
use super::state::{GameState, OBSTACLE_PALETTE_LEN, Obstacle, Pickup, PickupKind};
use crate::consts::*;

/// Difficulty multiplier for a cumulative distance, capped at 3.5
#[inline]
pub fn difficulty_for_distance(distance: f32) -> f32 {
    1.0 + (distance.max(0.0) / DIFFICULTY_DISTANCE).min(DIFFICULTY_MAX_BONUS)
}

/// Milliseconds that must pass between obstacle spawns
#[inline]
pub fn obstacle_gate_ms(difficulty: f32) -> f64 {
    OBSTACLE_GATE_FLOOR.max(OBSTACLE_GATE_BASE / difficulty as f64)
}

/// Milliseconds that must pass between pickup spawns
#[inline]
pub fn pickup_gate_ms(difficulty: f32) -> f64 {
    PICKUP_GATE_FLOOR.max(PICKUP_GATE_BASE / difficulty as f64)
}

/// Run both spawn gates against the current clock
pub fn run_spawn_gates(state: &mut GameState) {
    if state.clock_ms - state.last_obstacle_ms > obstacle_gate_ms(state.difficulty) {
        spawn_obstacle(state);
    }
    if state.clock_ms - state.last_pickup_ms > pickup_gate_ms(state.difficulty) {
        spawn_pickup(state);
    }
}

/// Append one obstacle centered in a random lane, fully above the screen
pub fn spawn_obstacle(state: &mut GameState) {
    let lane = state.rng.random_range(0..state.road.lane_count);
    let center_x = state.road.lane_center(lane);

    let (w_lo, w_hi) = OBSTACLE_WIDTH_RANGE;
    let (a_lo, a_hi) = OBSTACLE_ASPECT_RANGE;
    let (v_lo, v_hi) = OBSTACLE_SPEED_RANGE;
    let width = (state.vehicle.rect.size.x * state.rng.random_range(w_lo..w_hi)).max(OBSTACLE_MIN_WIDTH);
    let height = width * state.rng.random_range(a_lo..a_hi);
    let vy = state.rng.random_range(v_lo..v_hi) * state.difficulty;
    let color = state.rng.random_range(0..OBSTACLE_PALETTE_LEN) as u8;

    state.obstacles.push(Obstacle {
        rect: Rect::new(center_x - width / 2.0, -height - SPAWN_OFFSET, width, height),
        vy,
        color,
    });
    state.last_obstacle_ms = state.clock_ms;
}

/// Append one pickup centered in a random lane, fully above the screen
pub fn spawn_pickup(state: &mut GameState) {
    let lane = state.rng.random_range(0..state.road.lane_count);
    let center_x = state.road.lane_center(lane);
    let size = (state.vehicle.rect.size.x * PICKUP_SIZE_FRACTION).max(PICKUP_MIN_SIZE);
    let kind = if state.rng.random_bool(FUEL_PICKUP_CHANCE) {
        PickupKind::Fuel
    } else {
        PickupKind::Coin
    };

    state.pickups.push(Pickup {
        rect: Rect::new(center_x - size / 2.0, -size - SPAWN_OFFSET, size, size),
        vy: PICKUP_SPEED,
        kind,
    });
    state.last_pickup_ms = state.clock_ms;
}
