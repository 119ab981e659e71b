//! Per-frame simulation step
//!
//! One call advances the run by one frame. Steering, drift and lean are
//! applied per call; fuel and distance scale with the elapsed milliseconds.

use super::spawner::{difficulty_for_distance, run_spawn_gates};
use super::state::{EndReason, GamePhase, GameState, PickupKind};
use crate::consts::*;

/// Held directions, sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DriveInput {
    /// -1 (left), 0, or 1 (right); opposite keys cancel
    pub fn steer(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Run is still going
    Continue,
    /// Run ended during this step (or earlier)
    Ended(EndReason),
    /// Nothing to simulate (run not started)
    Idle,
}

/// Advance the run by one frame of `dt` milliseconds
pub fn step(state: &mut GameState, input: &DriveInput, dt: f32) -> StepOutcome {
    match state.phase {
        GamePhase::Idle => return StepOutcome::Idle,
        GamePhase::GameOver => {
            return StepOutcome::Ended(state.end_reason.unwrap_or(EndReason::Collision));
        }
        GamePhase::Running => {}
    }

    let dt = dt.max(0.0);
    state.steps += 1;
    state.clock_ms += dt as f64;
    state.difficulty = difficulty_for_distance(state.distance);

    drive_vehicle(state, input);

    state.road.scroll += state.vehicle.speed * SCROLL_PER_SPEED;

    run_spawn_gates(state);
    advance_entities(state);

    if state.obstacles.iter().any(|o| o.rect.overlaps(&state.vehicle.rect)) {
        log::debug!("Collision at distance {:.0}", state.distance);
        state.end(EndReason::Collision);
        return StepOutcome::Ended(EndReason::Collision);
    }

    collect_pickups(state);

    let speed = state.vehicle.speed;
    state.fuel -= (FUEL_BURN_BASE + speed * FUEL_BURN_PER_SPEED) * dt * MS_SCALE;
    if state.fuel <= 0.0 {
        state.fuel = 0.0;
        log::debug!("Out of fuel at distance {:.0}", state.distance);
        state.end(EndReason::OutOfFuel);
        return StepOutcome::Ended(EndReason::OutOfFuel);
    }

    state.distance += speed * dt * MS_SCALE;
    state.score += speed.floor() as u64;

    StepOutcome::Continue
}

/// Speed, lateral motion, drift, lean and road clamping
fn drive_vehicle(state: &mut GameState, input: &DriveInput) {
    let vehicle = &mut state.vehicle;

    if input.up {
        vehicle.speed += ACCEL;
    }
    if input.down {
        vehicle.speed -= BRAKE;
    }
    vehicle.speed = vehicle.speed.clamp(0.0, MAX_SPEED);

    let steer = input.steer();
    vehicle.vx += steer * STEER_IMPULSE;
    vehicle.vx *= LATERAL_DAMPING;
    vehicle.rect.pos.x += vehicle.vx;

    // Faster driving creeps the car up the screen, slower lets it sink back
    let drift = (vehicle.speed - DRIFT_NEUTRAL_SPEED) * DRIFT_PER_SPEED;
    vehicle.rect.pos.y = (vehicle.rect.pos.y - drift).clamp(
        vehicle.rest_y - DRIFT_LIMIT,
        vehicle.rest_y + DRIFT_LIMIT,
    );

    vehicle.angle = steer * LEAN_DEGREES;

    let (min_x, max_x) = vehicle.x_limits(&state.road);
    vehicle.rect.pos.x = vehicle.rect.pos.x.clamp(min_x, max_x.max(min_x));
}

/// Move traffic and pickups down the screen, dropping what fell off
fn advance_entities(state: &mut GameState) {
    let relative = state.vehicle.speed * RELATIVE_MOTION;
    for obstacle in &mut state.obstacles {
        obstacle.rect.pos.y += obstacle.vy + relative;
    }
    for pickup in &mut state.pickups {
        pickup.rect.pos.y += pickup.vy + relative;
    }

    let cutoff = state.height + PRUNE_MARGIN;
    state.obstacles.retain(|o| o.rect.pos.y <= cutoff);
    state.pickups.retain(|p| p.rect.pos.y <= cutoff);
}

/// Apply and remove every pickup under the vehicle
fn collect_pickups(state: &mut GameState) {
    for i in (0..state.pickups.len()).rev() {
        if !state.pickups[i].rect.overlaps(&state.vehicle.rect) {
            continue;
        }
        let pickup = state.pickups.remove(i);
        match pickup.kind {
            PickupKind::Fuel => state.fuel = (state.fuel + FUEL_REFILL).min(FUEL_MAX),
            PickupKind::Coin => state.score += COIN_BONUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::state::{Obstacle, Pickup};
    use proptest::prelude::*;

    const W: f32 = 600.0;
    const H: f32 = 700.0;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(W, H, 3, seed);
        state.phase = GamePhase::Running;
        state
    }

    /// Running state whose spawn gates stay closed for the next `ms`
    fn running_quiet(seed: u64, ms: f64) -> GameState {
        let mut state = running(seed);
        state.last_obstacle_ms = ms;
        state.last_pickup_ms = ms;
        state
    }

    fn input(left: bool, right: bool, up: bool, down: bool) -> DriveInput {
        DriveInput {
            left,
            right,
            up,
            down,
        }
    }

    #[test]
    fn test_idle_and_game_over_do_not_advance() {
        let mut state = GameState::new(W, H, 3, 1);
        assert_eq!(step(&mut state, &DriveInput::default(), 16.0), StepOutcome::Idle);
        assert_eq!(state.steps, 0);

        state.phase = GamePhase::Running;
        state.end(EndReason::OutOfFuel);
        let fuel = state.fuel;
        assert_eq!(
            step(&mut state, &input(false, false, true, false), 16.0),
            StepOutcome::Ended(EndReason::OutOfFuel)
        );
        assert_eq!(state.fuel, fuel);
        assert_eq!(state.vehicle.speed, 0.0);
    }

    #[test]
    fn test_fuel_burn_at_standstill() {
        let mut state = running_quiet(7, 1.0e9);
        for _ in 0..100 {
            assert_eq!(step(&mut state, &DriveInput::default(), 16.0), StepOutcome::Continue);
        }
        assert!((state.fuel - 98.08).abs() < 1e-3, "fuel {}", state.fuel);
        assert_eq!(state.snapshot(0).fuel, 98);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_speed_accel_and_brake() {
        let mut state = running_quiet(1, 1.0e9);
        let gas = input(false, false, true, false);
        for _ in 0..5 {
            step(&mut state, &gas, 16.0);
        }
        assert!((state.vehicle.speed - 1.0).abs() < 1e-5);

        // No input holds speed
        step(&mut state, &DriveInput::default(), 16.0);
        assert!((state.vehicle.speed - 1.0).abs() < 1e-5);

        let brake = input(false, false, false, true);
        for _ in 0..10 {
            step(&mut state, &brake, 16.0);
        }
        assert_eq!(state.vehicle.speed, 0.0);

        for _ in 0..200 {
            step(&mut state, &gas, 0.0);
        }
        assert_eq!(state.vehicle.speed, MAX_SPEED);
    }

    #[test]
    fn test_distance_and_score_accrual() {
        let mut state = running_quiet(1, 1.0e9);
        state.vehicle.speed = 5.5;
        step(&mut state, &DriveInput::default(), 10.0);
        assert!((state.distance - 3.3).abs() < 1e-4);
        assert_eq!(state.score, 5);
        assert!((state.road.scroll - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_steering_damps_and_leans() {
        let mut state = running_quiet(1, 1.0e9);
        let x0 = state.vehicle.rect.pos.x;
        step(&mut state, &input(false, true, false, false), 16.0);
        assert!((state.vehicle.vx - 0.765).abs() < 1e-5);
        assert!((state.vehicle.rect.pos.x - (x0 + 0.765)).abs() < 1e-4);
        assert_eq!(state.vehicle.angle, LEAN_DEGREES);

        step(&mut state, &DriveInput::default(), 16.0);
        assert!((state.vehicle.vx - 0.765 * 0.85).abs() < 1e-5);
        assert_eq!(state.vehicle.angle, 0.0);

        // Both directions cancel
        step(&mut state, &input(true, true, false, false), 16.0);
        assert_eq!(state.vehicle.angle, 0.0);
    }

    #[test]
    fn test_vehicle_clamped_to_road() {
        let mut state = running_quiet(1, 1.0e9);
        for _ in 0..300 {
            step(&mut state, &input(true, false, false, false), 1.0);
        }
        let (min_x, _) = state.vehicle.x_limits(&state.road);
        assert_eq!(state.vehicle.rect.pos.x, min_x);
    }

    #[test]
    fn test_drift_stays_near_rest_row() {
        let mut state = running_quiet(1, 1.0e9);
        let rest = state.vehicle.rest_y;
        // Standing still sinks the car until the limit
        for _ in 0..500 {
            step(&mut state, &DriveInput::default(), 0.0);
        }
        assert_eq!(state.vehicle.rect.pos.y, rest + DRIFT_LIMIT);

        state.vehicle.speed = MAX_SPEED;
        for _ in 0..500 {
            step(&mut state, &DriveInput::default(), 0.0);
        }
        assert_eq!(state.vehicle.rect.pos.y, rest - DRIFT_LIMIT);
    }

    #[test]
    fn test_collision_ends_run_before_accrual() {
        let mut state = running_quiet(1, 1.0e9);
        state.vehicle.speed = 4.0;
        let car = state.vehicle.rect;
        state.obstacles.push(Obstacle {
            rect: Rect::new(car.pos.x, car.pos.y - 30.0, car.size.x, 40.0),
            vy: 2.0,
            color: 0,
        });
        // Coin under the car must not be collected on the collision frame
        state.pickups.push(Pickup {
            rect: Rect::new(car.pos.x, car.pos.y, 10.0, 10.0),
            vy: 0.0,
            kind: PickupKind::Coin,
        });

        let outcome = step(&mut state, &DriveInput::default(), 16.0);
        assert_eq!(outcome, StepOutcome::Ended(EndReason::Collision));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.fuel, FUEL_MAX);
        assert_eq!(state.pickups.len(), 1);
    }

    #[test]
    fn test_fuel_pickup_caps_at_max() {
        let mut state = running_quiet(1, 1.0e9);
        state.fuel = 80.0;
        let car = state.vehicle.rect;
        state.pickups.push(Pickup {
            rect: Rect::new(car.pos.x + 4.0, car.pos.y + 4.0, 20.0, 20.0),
            vy: 0.0,
            kind: PickupKind::Fuel,
        });
        step(&mut state, &DriveInput::default(), 0.0);
        assert_eq!(state.fuel, FUEL_MAX);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_multiple_pickups_in_one_step() {
        let mut state = running_quiet(1, 1.0e9);
        state.fuel = 50.0;
        let car = state.vehicle.rect;
        for kind in [PickupKind::Coin, PickupKind::Fuel, PickupKind::Coin] {
            state.pickups.push(Pickup {
                rect: Rect::new(car.pos.x + 2.0, car.pos.y + 2.0, 10.0, 10.0),
                vy: 0.0,
                kind,
            });
        }
        // Far away, stays
        state.pickups.push(Pickup {
            rect: Rect::new(car.pos.x, -200.0, 10.0, 10.0),
            vy: 0.0,
            kind: PickupKind::Coin,
        });
        step(&mut state, &DriveInput::default(), 0.0);
        assert_eq!(state.score, 2 * COIN_BONUS);
        assert_eq!(state.fuel, 75.0);
        assert_eq!(state.pickups.len(), 1);
    }

    #[test]
    fn test_out_of_fuel_ends_before_accrual() {
        let mut state = running_quiet(1, 1.0e9);
        state.fuel = 0.01;
        state.vehicle.speed = 6.0;
        let outcome = step(&mut state, &DriveInput::default(), 16.0);
        assert_eq!(outcome, StepOutcome::Ended(EndReason::OutOfFuel));
        assert_eq!(state.fuel, 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.snapshot(0).fuel, 0);
    }

    #[test]
    fn test_prune_boundary() {
        let mut state = running_quiet(1, 1.0e9);
        let cutoff = H + PRUNE_MARGIN;
        // Far left lane edge so nothing touches the car
        let x = state.road.left;
        state.obstacles.push(Obstacle {
            rect: Rect::new(x, cutoff - 1.0, 1.0, 1.0),
            vy: 1.0,
            color: 0,
        });
        state.obstacles.push(Obstacle {
            rect: Rect::new(x, cutoff - 1.0, 1.0, 1.0),
            vy: 1.5,
            color: 1,
        });
        state.pickups.push(Pickup {
            rect: Rect::new(x, cutoff - 1.0, 1.0, 1.0),
            vy: 1.0,
            kind: PickupKind::Coin,
        });
        state.pickups.push(Pickup {
            rect: Rect::new(x, cutoff - 1.0, 1.0, 1.0),
            vy: 1.5,
            kind: PickupKind::Fuel,
        });
        step(&mut state, &DriveInput::default(), 0.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].rect.pos.y, cutoff);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].rect.pos.y, cutoff);
        assert_eq!(state.pickups[0].kind, PickupKind::Coin);
    }

    #[test]
    fn test_entities_keep_spawn_velocity() {
        let mut state = running(3);
        // Let a few obstacles spawn at difficulty 1
        let mut first_vy = None;
        for _ in 0..80 {
            step(&mut state, &DriveInput::default(), 16.0);
            if let Some(o) = state.obstacles.first() {
                first_vy.get_or_insert(o.vy);
            }
        }
        let vy = first_vy.expect("an obstacle should have spawned");
        state.distance = 6000.0;
        step(&mut state, &DriveInput::default(), 16.0);
        assert_eq!(state.difficulty, 3.0);
        assert_eq!(state.obstacles[0].vy, vy);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = running(99);
        let mut b = running(99);
        let inputs = [
            input(false, false, true, false),
            input(true, false, true, false),
            input(false, true, false, false),
            DriveInput::default(),
        ];
        for i in 0..400 {
            let inp = inputs[i % inputs.len()];
            step(&mut a, &inp, 16.0);
            step(&mut b, &inp, 16.0);
        }
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.vehicle.rect, b.vehicle.rect);
    }

    fn arb_input() -> impl Strategy<Value = DriveInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(left, right, up, down)| input(left, right, up, down))
    }

    proptest! {
        #[test]
        fn prop_step_invariants(
            seed in any::<u64>(),
            frames in prop::collection::vec((arb_input(), 0.0f32..32.0), 1..300),
        ) {
            let mut state = running(seed);
            let mut last_difficulty = state.difficulty;
            for (inp, dt) in frames {
                let before: Vec<(f32, f32, f32)> = state
                    .obstacles
                    .iter()
                    .map(|o| (o.rect.pos.x, o.vy, o.rect.pos.y))
                    .collect();
                let pickups_before: Vec<(f32, f32, f32)> = state
                    .pickups
                    .iter()
                    .map(|p| (p.rect.pos.x, p.vy, p.rect.pos.y))
                    .collect();
                let last_spawn = state.last_obstacle_ms;
                let last_pickup_spawn = state.last_pickup_ms;
                let outcome = step(&mut state, &inp, dt);

                let v = &state.vehicle;
                let (min_x, max_x) = v.x_limits(&state.road);
                prop_assert!(v.rect.pos.x >= min_x - 1e-3 && v.rect.pos.x <= max_x + 1e-3);
                prop_assert!((0.0..=MAX_SPEED).contains(&v.speed));
                prop_assert!((0.0..=FUEL_MAX).contains(&state.fuel));
                prop_assert!(state.difficulty >= last_difficulty);
                prop_assert!(state.difficulty <= 1.0 + DIFFICULTY_MAX_BONUS);
                last_difficulty = state.difficulty;

                for o in &state.obstacles {
                    prop_assert!(o.rect.pos.y <= state.height + PRUNE_MARGIN);
                }

                // Survivors keep their order and only ever move down
                let spawned = usize::from(state.last_obstacle_ms != last_spawn);
                let existing = state.obstacles.len() - spawned;
                let mut earlier = before.iter();
                for o in state.obstacles.iter().take(existing) {
                    let matched = earlier.find(|&&(x, vy, _)| x == o.rect.pos.x && vy == o.vy);
                    prop_assert!(matched.is_some());
                    if let Some(&(_, _, y)) = matched {
                        prop_assert!(o.rect.pos.y > y);
                    }
                }

                for p in &state.pickups {
                    prop_assert!(p.rect.pos.y <= state.height + PRUNE_MARGIN);
                }

                // Pickups share a lane x and fall speed, so match each survivor
                // by the exact displacement this step applied
                let relative = state.vehicle.speed * RELATIVE_MOTION;
                let spawned = usize::from(state.last_pickup_ms != last_pickup_spawn);
                let existing = state.pickups.len() - spawned;
                for p in state.pickups.iter().take(existing) {
                    let matched = pickups_before.iter().find(|&&(x, vy, y)| {
                        x == p.rect.pos.x && vy == p.vy && y + (vy + relative) == p.rect.pos.y
                    });
                    prop_assert!(matched.is_some());
                    if let Some(&(_, _, y)) = matched {
                        prop_assert!(p.rect.pos.y > y);
                    }
                }

                if outcome != StepOutcome::Continue {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                    break;
                }
            }
        }
    }
}
