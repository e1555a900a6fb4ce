//! Frame driver
//!
//! One tick renders the field for the impulses as they stand, then moves the
//! pool forward. Rendering never sees a half-advanced pool: frame N shows
//! the state left by frame N-1's advance/prune.

use glam::DVec2;

use super::color::Rgba;
use super::field::{DrawPrimitive, evaluate_cell};
use super::state::WaveState;

/// The surface is filled with this before any dots are drawn (no trails)
pub const BACKGROUND: Rgba = Rgba::BLACK;

/// Grid size `(cols, rows)` covering a surface; empty for degenerate sizes
pub fn grid_dims(width: f64, height: f64, cell_size: f64) -> (usize, usize) {
    let cells = |extent: f64| {
        if extent > 0.0 && cell_size > 0.0 {
            (extent / cell_size).ceil() as usize
        } else {
            0
        }
    };
    (cells(width), cells(height))
}

/// Evaluate every grid cell, row-major, without touching the pool
pub fn render_field(state: &WaveState) -> Vec<DrawPrimitive> {
    let tuning = &state.tuning;
    let (cols, rows) = grid_dims(state.width as f64, state.height as f64, tuning.cell_size);

    if state.pool.is_empty() {
        return Vec::new();
    }

    let mut primitives = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let cell = DVec2::new(col as f64 * tuning.cell_size, row as f64 * tuning.cell_size);
            if let Some(p) = evaluate_cell(cell, &state.pool, tuning, state.combine) {
                primitives.push(p);
            }
        }
    }
    primitives
}

/// Advance the simulation by one fixed step and return this frame's dots
pub fn tick(state: &mut WaveState) -> Vec<DrawPrimitive> {
    let primitives = render_field(state);

    let (width, height) = (state.width as f64, state.height as f64);
    let dt = state.tuning.dt;
    state.pool.advance(width, height, dt);
    let expired = state.pool.prune();
    state.time_ticks += 1;

    log::trace!(
        "Tick {}: {} dots, {} impulses live, {} expired",
        state.time_ticks,
        primitives.len(),
        state.pool.len(),
        expired
    );

    primitives
}
