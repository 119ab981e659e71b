//! Frame building
//!
//! Turns a borrowed `GameState` into one triangle list in logical pixels.
//! Draw order: background, road, lane dashes, vehicle, traffic, pickups.

use glam::Vec2;

use super::shapes::{self, Paint};
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::geometry::Rect;
use crate::sim::state::{GameState, PickupKind, Road, Vehicle};

pub const DASH_LENGTH: f32 = 24.0;
pub const DASH_GAP: f32 = 24.0;
pub const LANE_LINE_WIDTH: f32 = 4.0;
pub const CORNER_RADIUS: f32 = 6.0;
const WINDSHIELD_RADIUS: f32 = 4.0;
const TAIL_LIGHT_HEIGHT: f32 = 4.0;

/// Build every vertex for the current frame
pub fn build_frame(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let segments = settings.quality.corner_segments();
    let mut vertices = Vec::with_capacity(
        64 + (state.obstacles.len() + state.pickups.len() + 3) * 6 * (segments as usize + 1),
    );

    vertices.extend(shapes::rect(
        &Rect::new(0.0, 0.0, state.width, state.height),
        colors::BACKGROUND,
    ));
    vertices.extend(shapes::rect(
        &Rect::new(state.road.left, 0.0, state.road.width(), state.height),
        colors::ROAD,
    ));

    for dash in lane_dashes(&state.road, state.height) {
        vertices.extend(shapes::rect(&dash, colors::LANE_MARKING));
    }

    vertices.extend(vehicle(&state.vehicle, segments, settings.lean_enabled()));

    for obstacle in &state.obstacles {
        vertices.extend(shapes::rounded_rect(
            &obstacle.rect,
            CORNER_RADIUS,
            segments,
            Paint::Fill,
            colors::traffic(obstacle.color),
        ));
    }

    for pickup in &state.pickups {
        let color = match pickup.kind {
            PickupKind::Fuel => colors::PICKUP_FUEL,
            PickupKind::Coin => colors::PICKUP_COIN,
        };
        vertices.extend(shapes::rounded_rect(
            &pickup.rect,
            CORNER_RADIUS,
            segments,
            Paint::Fill,
            color,
        ));
    }

    vertices
}

/// Dash rectangles on the interior lane boundaries (never the road edges)
///
/// The first dash starts one dash length above the top edge, shifted down by
/// the scroll phase, and dashes repeat every dash + gap until the bottom.
pub fn lane_dashes(road: &Road, height: f32) -> Vec<Rect> {
    let period = DASH_LENGTH + DASH_GAP;
    let start = -DASH_LENGTH + road.scroll.rem_euclid(period);

    let mut dashes = Vec::new();
    for lane in 1..road.lane_count {
        let x = road.left + lane as f32 * road.lane_width();
        let mut y = start;
        while y < height {
            dashes.push(Rect::new(x - LANE_LINE_WIDTH / 2.0, y, LANE_LINE_WIDTH, DASH_LENGTH));
            y += period;
        }
    }
    dashes
}

/// Body, windshield and tail lights, leaned around the car's center
pub fn vehicle(vehicle: &Vehicle, segments: u32, lean: bool) -> Vec<Vertex> {
    let Vec2 { x: w, y: h } = vehicle.rect.size;

    let body = Rect::new(-w / 2.0, -h / 2.0, w, h);
    let windshield = Rect::new(-w * 0.35, -h * 0.3, w * 0.7, h * 0.35);
    let tail_lights = Rect::new(-w * 0.4, h * 0.45, w * 0.8, TAIL_LIGHT_HEIGHT);

    let mut vertices =
        shapes::rounded_rect(&body, CORNER_RADIUS, segments, Paint::Fill, colors::VEHICLE_BODY);
    vertices.extend(shapes::rounded_rect(
        &windshield,
        WINDSHIELD_RADIUS,
        segments,
        Paint::Fill,
        colors::WINDSHIELD,
    ));
    vertices.extend(shapes::rect(&tail_lights, colors::TAIL_LIGHT));

    let angle = if lean {
        vehicle.angle.to_radians()
    } else {
        0.0
    };
    shapes::place(&mut vertices, vehicle.rect.center(), angle);
    vertices
}
