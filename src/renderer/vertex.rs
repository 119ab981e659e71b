//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements (display-encoded, not linear)
pub mod colors {
    /// `0xRRGGBB` to RGBA floats
    pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            alpha,
        ]
    }

    pub const BACKGROUND: [f32; 4] = hex(0x0f172a, 1.0);
    pub const ROAD: [f32; 4] = hex(0x1f2937, 1.0);
    pub const LANE_MARKING: [f32; 4] = hex(0xe5e7eb, 1.0);
    pub const VEHICLE_BODY: [f32; 4] = hex(0x38bdf8, 1.0);
    pub const WINDSHIELD: [f32; 4] = hex(0xffffff, 0.25);
    pub const TAIL_LIGHT: [f32; 4] = hex(0xef4444, 1.0);
    pub const PICKUP_FUEL: [f32; 4] = hex(0x22c55e, 1.0);
    pub const PICKUP_COIN: [f32; 4] = hex(0xf59e0b, 1.0);

    /// Traffic colors, indexed by `Obstacle::color`
    pub const TRAFFIC: [[f32; 4]; crate::sim::state::OBSTACLE_PALETTE_LEN] = [
        hex(0xef4444, 1.0),
        hex(0xf59e0b, 1.0),
        hex(0x22c55e, 1.0),
        hex(0x3b82f6, 1.0),
        hex(0x06b6d4, 1.0),
        hex(0x8b5cf6, 1.0),
    ];

    /// Traffic color for a palette index (wraps)
    pub fn traffic(index: u8) -> [f32; 4] {
        TRAFFIC[index as usize % TRAFFIC.len()]
    }
}
