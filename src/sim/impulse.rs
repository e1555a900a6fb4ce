//! Wave impulses and the color mode they are born under

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::Hsl;
use crate::tuning::WaveTuning;

/// Color mode applied to newly created impulses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// White dots
    #[default]
    Default,
    /// Each impulse carries a random two-color palette
    Rainbow,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Default => "Default",
            ColorMode::Rainbow => "Rainbow",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Default => ColorMode::Rainbow,
            ColorMode::Rainbow => ColorMode::Default,
        }
    }
}

/// Start/end colors a rainbow impulse blends between, from center to ring edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub start: Hsl,
    pub end: Hsl,
}

impl Palette {
    /// Two independent random hues at fixed saturation and lightness
    pub fn random<R: Rng>(rng: &mut R, saturation: f64, lightness: f64) -> Self {
        Self {
            start: Hsl::new(rng.random_range(0.0..360.0), saturation, lightness),
            end: Hsl::new(rng.random_range(0.0..360.0), saturation, lightness),
        }
    }
}

/// One expanding wave source
#[derive(Debug, Clone, PartialEq)]
pub struct Impulse {
    pub id: u32,
    /// Current center, kept inside the surface
    pub origin: DVec2,
    /// Seconds since creation
    pub age: f64,
    /// Age at which the impulse is removed
    pub lifetime: f64,
    /// Drift per tick; components flip sign on wall hits
    pub velocity: DVec2,
    /// Snapshot of the color mode at creation; `None` renders white
    pub palette: Option<Palette>,
}

impl Impulse {
    pub fn new(id: u32, origin: DVec2, tuning: &WaveTuning, palette: Option<Palette>) -> Self {
        Self {
            id,
            origin,
            age: 0.0,
            lifetime: tuning.lifetime,
            velocity: tuning.velocity,
            palette,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Linear decay from 1 at birth to 0 at expiry
    #[inline]
    pub fn fade_out(&self) -> f64 {
        1.0 - self.age / self.lifetime
    }

    /// Move one tick inside `[0, bounds.x] x [0, bounds.y]` and age by `dt`.
    ///
    /// Each axis is checked on its own: if the unclamped step would leave the
    /// surface, the position is clamped and that velocity component flips.
    pub fn advance(&mut self, bounds: DVec2, dt: f64) {
        let next = self.origin + self.velocity;

        if next.x < 0.0 || next.x > bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if next.y < 0.0 || next.y > bounds.y {
            self.velocity.y = -self.velocity.y;
        }

        self.origin = next.clamp(DVec2::ZERO, bounds.max(DVec2::ZERO));
        self.age += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn impulse_at(x: f64, y: f64) -> Impulse {
        Impulse::new(1, DVec2::new(x, y), &WaveTuning::default(), None)
    }

    #[test]
    fn test_new_impulse_defaults() {
        let imp = impulse_at(10.0, 20.0);
        assert_eq!(imp.age, 0.0);
        assert_eq!(imp.lifetime, 2.0);
        assert_eq!(imp.velocity, DVec2::new(3.0, 2.0));
        assert!(imp.palette.is_none());
        assert_eq!(imp.fade_out(), 1.0);
    }

    #[test]
    fn test_advance_moves_and_ages() {
        let mut imp = impulse_at(10.0, 10.0);
        imp.advance(DVec2::new(100.0, 100.0), 0.016);
        assert_eq!(imp.origin, DVec2::new(13.0, 12.0));
        assert_eq!(imp.age, 0.016);
        assert_eq!(imp.velocity, DVec2::new(3.0, 2.0));
    }

    #[test]
    fn test_advance_reflects_x_only() {
        let mut imp = impulse_at(99.0, 50.0);
        imp.advance(DVec2::new(100.0, 100.0), 0.016);
        assert_eq!(imp.origin, DVec2::new(100.0, 52.0));
        assert_eq!(imp.velocity, DVec2::new(-3.0, 2.0));

        imp.advance(DVec2::new(100.0, 100.0), 0.016);
        assert_eq!(imp.origin, DVec2::new(97.0, 54.0));
        assert_eq!(imp.velocity, DVec2::new(-3.0, 2.0));
    }

    #[test]
    fn test_advance_reflects_both_axes_in_corner() {
        let mut imp = impulse_at(39.0, 39.0);
        imp.advance(DVec2::new(40.0, 40.0), 0.016);
        assert_eq!(imp.origin, DVec2::new(40.0, 40.0));
        assert_eq!(imp.velocity, DVec2::new(-3.0, -2.0));
    }

    #[test]
    fn test_advance_landing_on_edge_does_not_reflect() {
        let mut imp = impulse_at(97.0, 0.0);
        imp.advance(DVec2::new(100.0, 100.0), 0.016);
        assert_eq!(imp.origin.x, 100.0);
        assert_eq!(imp.velocity.x, 3.0);
    }

    #[test]
    fn test_out_of_bounds_origin_is_pulled_in() {
        let mut imp = impulse_at(-50.0, 500.0);
        imp.advance(DVec2::new(100.0, 100.0), 0.016);
        assert_eq!(imp.origin, DVec2::new(0.0, 100.0));
        assert_eq!(imp.velocity, DVec2::new(-3.0, -2.0));
    }

    #[test]
    fn test_expiry() {
        let mut imp = impulse_at(0.0, 0.0);
        imp.age = 1.99;
        assert!(!imp.is_expired());
        imp.age = 2.0;
        assert!(imp.is_expired());
    }

    #[test]
    fn test_random_palette_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let p = Palette::random(&mut rng, 100.0, 50.0);
            for c in [p.start, p.end] {
                assert!((0.0..360.0).contains(&c.h));
                assert_eq!(c.s, 100.0);
                assert_eq!(c.l, 50.0);
            }
        }
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(ColorMode::Default.toggled(), ColorMode::Rainbow);
        assert_eq!(ColorMode::Rainbow.toggled(), ColorMode::Default);
    }
}
