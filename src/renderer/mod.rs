//! Rendering module
//!
//! `scene` builds a triangle list from a borrowed game state; `pipeline`
//! uploads it and draws it with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_frame;
pub use vertex::Vertex;
