//! Impulse pool
//!
//! Owns the live impulses in insertion order. Field evaluation only reads the
//! pool; the frame driver mutates it once per tick via `advance` then `prune`.

use std::collections::VecDeque;

use glam::DVec2;
use rand::Rng;

use super::impulse::{ColorMode, Impulse, Palette};
use crate::tuning::WaveTuning;

#[derive(Debug, Clone, Default)]
pub struct ImpulsePool {
    impulses: VecDeque<Impulse>,
    next_id: u32,
}

impl ImpulsePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fresh impulse at `origin`. Rainbow mode rolls a palette from `rng`.
    ///
    /// Returns the new impulse's id.
    pub fn insert<R: Rng>(
        &mut self,
        origin: DVec2,
        mode: ColorMode,
        tuning: &WaveTuning,
        rng: &mut R,
    ) -> u32 {
        if let Some(cap) = tuning.max_impulses {
            while self.impulses.len() >= cap {
                if let Some(evicted) = self.impulses.pop_front() {
                    log::debug!("Pool full ({}), evicted impulse {}", cap, evicted.id);
                }
            }
        }

        let palette = match mode {
            ColorMode::Rainbow => Some(Palette::random(
                rng,
                tuning.rainbow_saturation,
                tuning.rainbow_lightness,
            )),
            ColorMode::Default => None,
        };

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.impulses.push_back(Impulse::new(id, origin, tuning, palette));
        log::debug!("Impulse {} at ({:.1}, {:.1}) [{}]", id, origin.x, origin.y, mode.as_str());
        id
    }

    /// Move and age every impulse by one tick
    pub fn advance(&mut self, width: f64, height: f64, dt: f64) {
        let bounds = DVec2::new(width, height);
        for impulse in self.impulses.iter_mut() {
            impulse.advance(bounds, dt);
        }
    }

    /// Drop every impulse whose age has reached its lifetime.
    ///
    /// Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.impulses.len();
        self.impulses.retain(|imp| !imp.is_expired());
        before - self.impulses.len()
    }

    /// Remove everything (surface teardown)
    pub fn clear(&mut self) {
        self.impulses.clear();
    }

    /// Impulses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Impulse> {
        self.impulses.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Impulse> {
        self.impulses.iter().find(|imp| imp.id == id)
    }

    pub fn len(&self) -> usize {
        self.impulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impulses.is_empty()
    }
}
