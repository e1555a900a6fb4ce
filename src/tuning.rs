//! Data-driven wave tuning
//!
//! Every constant the simulation uses, gathered in one serializable struct so
//! it can be overridden from settings. `Default` matches [`crate::consts`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Smallest accepted grid spacing; finer grids cost one cell per surface unit
pub const MIN_CELL_SIZE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Simulated seconds added to every impulse's age per tick
    pub dt: f64,
    /// Grid spacing in surface units
    pub cell_size: f64,
    /// Impulse lifetime in seconds
    pub lifetime: f64,
    /// Initial drift per tick
    pub velocity: DVec2,
    pub wave_progress_rate: f64,
    pub ring_speed: f64,
    pub ring_width: f64,
    pub dot_fill: f64,
    pub max_alpha: f64,
    pub rainbow_saturation: f64,
    pub rainbow_lightness: f64,
    /// Optional pool cap; oldest impulses are evicted first when full
    pub max_impulses: Option<usize>,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            cell_size: CELL_SIZE,
            lifetime: IMPULSE_LIFETIME,
            velocity: DVec2::new(IMPULSE_VELOCITY.0, IMPULSE_VELOCITY.1),
            wave_progress_rate: WAVE_PROGRESS_RATE,
            ring_speed: RING_SPEED,
            ring_width: RING_WIDTH,
            dot_fill: DOT_FILL,
            max_alpha: MAX_ALPHA,
            rainbow_saturation: RAINBOW_SATURATION,
            rainbow_lightness: RAINBOW_LIGHTNESS,
            max_impulses: None,
        }
    }
}

impl WaveTuning {
    /// Parse tuning from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: WaveTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would divide by zero, produce NaN fields or emit
    /// dots with negative radius or alpha.
    pub fn validate(&self) -> Result<(), TuningError> {
        let finite = [
            ("dt", self.dt),
            ("cell_size", self.cell_size),
            ("lifetime", self.lifetime),
            ("velocity.x", self.velocity.x),
            ("velocity.y", self.velocity.y),
            ("wave_progress_rate", self.wave_progress_rate),
            ("ring_speed", self.ring_speed),
            ("ring_width", self.ring_width),
            ("dot_fill", self.dot_fill),
            ("max_alpha", self.max_alpha),
            ("rainbow_saturation", self.rainbow_saturation),
            ("rainbow_lightness", self.rainbow_lightness),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field });
            }
        }

        let positive = [
            ("dt", self.dt),
            ("cell_size", self.cell_size),
            ("lifetime", self.lifetime),
            ("ring_width", self.ring_width),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if self.cell_size < MIN_CELL_SIZE {
            return Err(TuningError::BelowMinimum {
                field: "cell_size",
                value: self.cell_size,
                min: MIN_CELL_SIZE,
            });
        }

        let non_negative = [
            ("wave_progress_rate", self.wave_progress_rate),
            ("ring_speed", self.ring_speed),
            ("dot_fill", self.dot_fill),
            ("max_alpha", self.max_alpha),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.max_impulses == Some(0) {
            return Err(TuningError::ZeroCapacity);
        }

        Ok(())
    }
}
