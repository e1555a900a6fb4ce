//! Deterministic simulation module
//!
//! The wave engine lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of impulses, row-major cells)
//! - No rendering or platform dependencies

pub mod color;
pub mod field;
pub mod impulse;
pub mod pool;
pub mod state;
pub mod tick;

pub use color::{Hsl, Rgba};
pub use field::{CombinePolicy, DrawPrimitive, RingSample, evaluate_cell, score};
pub use impulse::{ColorMode, Impulse, Palette};
pub use pool::ImpulsePool;
pub use state::WaveState;
pub use tick::{BACKGROUND, grid_dims, render_field, tick};
