//! WebGPU rendering module
//!
//! Rasterizes the simulation's dot primitives: clear to black, then one
//! alpha-blended disc per primitive.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{DotRenderer, fit_surface_size};
pub use shapes::{dot, frame_vertices, surface_to_ndc};
pub use vertex::Vertex;
