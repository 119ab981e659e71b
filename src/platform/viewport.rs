//! Canvas sizing
//!
//! The simulation works in logical (CSS) pixels; the GPU surface is that size
//! times the device pixel ratio.

use crate::settings::Settings;

/// Logical canvas size plus the pixel ratio used for the backing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Fit the canvas to the window, capped by the settings
    pub fn fit(inner_width: f32, inner_height: f32, device_pixel_ratio: f32, settings: &Settings) -> Self {
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(settings.max_pixel_ratio)
        } else {
            1.0
        };
        Self {
            width: inner_width.min(settings.max_canvas_width),
            height: inner_height.min(settings.max_canvas_height),
            pixel_ratio: ratio,
        }
    }

    /// Backing surface size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(1.0) as u32,
            (self.height * self.pixel_ratio).round().max(1.0) as u32,
        )
    }
}
