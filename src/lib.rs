//! Halftone Waves - click-driven wave rings over a grid of dots
//!
//! Core modules:
//! - `sim`: Deterministic simulation (impulse pool, field evaluation, frame driver)
//! - `renderer`: WebGPU rasterizer for the per-frame dot primitives
//! - `tuning`: Data-driven wave constants
//! - `settings`: Persisted viewer preferences

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use settings::Settings;
pub use sim::{ColorMode, CombinePolicy, DrawPrimitive, WaveState};
pub use tuning::WaveTuning;

/// Simulation configuration constants (defaults for [`WaveTuning`])
pub mod consts {
    /// Fixed simulated tick duration (60 Hz), independent of wall-clock frame time
    pub const SIM_DT: f64 = 0.016;

    /// Grid spacing in surface units
    pub const CELL_SIZE: f64 = 20.0;

    /// Impulse lifetime in seconds
    pub const IMPULSE_LIFETIME: f64 = 2.0;
    /// Impulse drift in surface units per tick
    pub const IMPULSE_VELOCITY: (f64, f64) = (3.0, 2.0);

    /// Wave progress per second of impulse age
    pub const WAVE_PROGRESS_RATE: f64 = 2.0;
    /// Ring radius per unit of wave progress
    pub const RING_SPEED: f64 = 500.0;
    /// Half-width of the triangular ring falloff
    pub const RING_WIDTH: f64 = 200.0;

    /// Fraction of the cell a full-strength dot covers
    pub const DOT_FILL: f64 = 0.8;
    /// Alpha at full strength
    pub const MAX_ALPHA: f64 = 0.5;

    /// Rainbow palettes use fully saturated, mid-lightness colors
    pub const RAINBOW_SATURATION: f64 = 100.0;
    pub const RAINBOW_LIGHTNESS: f64 = 50.0;
}

/// Wrap a hue in degrees into [0, 360)
#[inline]
pub fn wrap_degrees(hue: f64) -> f64 {
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}
