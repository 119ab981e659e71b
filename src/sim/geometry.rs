//! Axis-aligned rectangles and rounded-rectangle outlines
//!
//! Screen space: origin top-left, +y points down the road.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Corner radius actually usable for this rectangle
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.min(self.size.x / 2.0).min(self.size.y / 2.0).max(0.0)
    }
}

/// Build the closed outline of a rounded rectangle
///
/// Walks clockwise on screen starting at the top edge, one quarter arc per
/// corner with `segments` steps each. The radius is clamped to half of the
/// shorter side so opposite arcs never cross.
pub fn rounded_rect_outline(rect: &Rect, radius: f32, segments: u32) -> Vec<Vec2> {
    let r = rect.clamp_radius(radius);
    if r <= f32::EPSILON || segments == 0 {
        return vec![
            Vec2::new(rect.left(), rect.top()),
            Vec2::new(rect.right(), rect.top()),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(rect.left(), rect.bottom()),
        ];
    }

    // (arc center, start angle); y-down so -PI/2 is the top of a corner
    let corners = [
        (Vec2::new(rect.right() - r, rect.top() + r), -FRAC_PI_2),
        (Vec2::new(rect.right() - r, rect.bottom() - r), 0.0),
        (Vec2::new(rect.left() + r, rect.bottom() - r), FRAC_PI_2),
        (Vec2::new(rect.left() + r, rect.top() + r), PI),
    ];

    let mut points = Vec::with_capacity(corners.len() * (segments as usize + 1));
    for (center, start) in corners {
        for i in 0..=segments {
            let theta = start + FRAC_PI_2 * (i as f32 / segments as f32);
            points.push(center + Vec2::new(theta.cos(), theta.sin()) * r);
        }
    }
    points
}
