//! Dot tessellation
//!
//! Primitives arrive in surface coordinates (origin top-left, y down) and are
//! converted straight to NDC so the shader stays a pass-through.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::DrawPrimitive;

/// Triangle fan segments per dot; dots are at most 8px so this is plenty
pub const DOT_SEGMENTS: u32 = 16;

/// Map a surface point to normalized device coordinates
#[inline]
pub fn surface_to_ndc(p: Vec2, size: (u32, u32)) -> Vec2 {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    Vec2::new(p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0)
}

/// Generate vertices for a filled circle (surface coordinates)
pub fn dot(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Tessellate a whole frame into NDC vertices
pub fn frame_vertices(primitives: &[DrawPrimitive], size: (u32, u32)) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(primitives.len() * (DOT_SEGMENTS * 3) as usize);
    for p in primitives {
        let center = p.center.as_vec2();
        for v in dot(center, p.radius as f32, p.color.to_array(), DOT_SEGMENTS) {
            let ndc = surface_to_ndc(Vec2::from(v.position), size);
            vertices.push(Vertex::new(ndc.x, ndc.y, v.color));
        }
    }
    vertices
}
