//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in logical pixel coordinates.

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::geometry::{Rect, rounded_rect_outline};

/// How to paint a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill,
    /// Outline with the given line width
    Stroke(f32),
}

/// Filled axis-aligned rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(rt, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, t, color),
        Vertex::new(rt, b, color),
    ]
}

/// Fill a convex closed path as a fan around its centroid
pub fn fill_path(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let center = points.iter().copied().sum::<Vec2>() / points.len() as f32;

    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}

/// Stroke a closed path; each edge becomes a quad centered on the edge
pub fn stroke_path(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let half = width / 2.0;

    let mut vertices = Vec::with_capacity(points.len() * 6);
    for (i, p1) in points.iter().copied().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let a = p1 + perp;
        let b = p1 - perp;
        let c = p2 + perp;
        let d = p2 - perp;

        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
        vertices.push(Vertex::new(c.x, c.y, color));

        vertices.push(Vertex::new(c.x, c.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
        vertices.push(Vertex::new(d.x, d.y, color));
    }
    vertices
}

/// Rounded rectangle, filled or stroked
pub fn rounded_rect(r: &Rect, radius: f32, segments: u32, paint: Paint, color: [f32; 4]) -> Vec<Vertex> {
    let outline = rounded_rect_outline(r, radius, segments);
    match paint {
        Paint::Fill => fill_path(&outline, color),
        Paint::Stroke(width) => stroke_path(&outline, width, color),
    }
}

/// Rotate vertices built around the origin, then move them to `center`
pub fn place(vertices: &mut [Vertex], center: Vec2, angle_radians: f32) {
    let rotation = Vec2::from_angle(angle_radians);
    for v in vertices.iter_mut() {
        let p = rotation.rotate(Vec2::from(v.position)) + center;
        v.position = p.to_array();
    }
}
