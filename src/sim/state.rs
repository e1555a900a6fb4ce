//! Simulation state
//!
//! One `WaveState` per surface. Everything the frame driver needs lives here:
//! the impulse pool, the current surface size, the color mode new impulses
//! are born with, and the seeded RNG for rainbow palettes. Host callbacks are
//! plain `&mut self` methods, so an impulse or resize can never land halfway
//! through a tick.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::field::{CombinePolicy, DrawPrimitive};
use super::impulse::ColorMode;
use super::pool::ImpulsePool;
use crate::error::TuningError;
use crate::tuning::WaveTuning;

#[derive(Debug, Clone)]
pub struct WaveState {
    /// Seed the palette RNG was created from
    pub seed: u64,
    pub(super) tuning: WaveTuning,
    pub(super) pool: ImpulsePool,
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) mode: ColorMode,
    pub(super) combine: CombinePolicy,
    pub(super) rng: Pcg32,
    /// Ticks run so far
    pub(super) time_ticks: u64,
}

impl WaveState {
    /// Create a state with the default tuning
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self::build(WaveTuning::default(), width, height, seed)
    }

    /// Create a state with custom tuning, rejecting values that break the math
    pub fn with_tuning(
        tuning: WaveTuning,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, width, height, seed))
    }

    fn build(tuning: WaveTuning, width: u32, height: u32, seed: u64) -> Self {
        Self {
            seed,
            tuning,
            pool: ImpulsePool::new(),
            width,
            height,
            mode: ColorMode::Default,
            combine: CombinePolicy::default(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }

    /// Start a wave at surface coordinates `(x, y)`.
    ///
    /// Any finite point is accepted; it is pulled inside the surface on the
    /// next advance. Non-finite points are dropped.
    pub fn on_impulse(&mut self, x: f64, y: f64) -> Option<u32> {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Ignoring impulse at non-finite point ({}, {})", x, y);
            return None;
        }
        let id = self
            .pool
            .insert(DVec2::new(x, y), self.mode, &self.tuning, &mut self.rng);
        Some(id)
    }

    /// Surface size changed; the next tick lays out its grid from this size
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            log::info!("Surface resized: {}x{} -> {}x{}", self.width, self.height, width, height);
        }
        self.width = width;
        self.height = height;
    }

    /// Change the mode for impulses created from now on. Existing impulses keep
    /// the palette they were born with.
    pub fn set_mode(&mut self, mode: ColorMode) {
        if mode != self.mode {
            log::info!("Color mode: {}", mode.as_str());
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn set_combine_policy(&mut self, combine: CombinePolicy) {
        if combine != self.combine {
            log::info!("Combine policy: {}", combine.as_str());
        }
        self.combine = combine;
    }

    pub fn combine_policy(&self) -> CombinePolicy {
        self.combine
    }

    /// Run one frame: evaluate the field, then advance and prune the pool
    pub fn tick(&mut self) -> Vec<DrawPrimitive> {
        super::tick::tick(self)
    }

    /// Drop every impulse (surface teardown)
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn pool(&self) -> &ImpulsePool {
        &self.pool
    }

    pub fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
