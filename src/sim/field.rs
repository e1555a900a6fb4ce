//! Field evaluation
//!
//! Scores one grid cell against every impulse and turns the winning
//! contribution into a draw primitive. Each impulse is a ring expanding at
//! `ring_speed * wave_progress_rate` units per second, with a triangular
//! falloff `ring_width` units either side of its edge, fading linearly to zero
//! over the impulse's lifetime.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::impulse::Impulse;
use super::pool::ImpulsePool;
use crate::tuning::WaveTuning;

/// How contributions from overlapping impulses are combined at one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombinePolicy {
    /// The last impulse (in pool order) with positive strength wins outright
    #[default]
    LastWins,
    /// The strongest contribution wins; ties go to the later impulse
    Strongest,
}

impl CombinePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombinePolicy::LastWins => "LastWins",
            CombinePolicy::Strongest => "Strongest",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CombinePolicy::LastWins => CombinePolicy::Strongest,
            CombinePolicy::Strongest => CombinePolicy::LastWins,
        }
    }
}

/// One filled circle for the rasterizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawPrimitive {
    pub center: DVec2,
    pub radius: f64,
    pub color: Rgba,
}

/// Intermediate values of one cell/impulse score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSample {
    pub distance: f64,
    pub ring_radius: f64,
    /// Triangular falloff around the ring edge, 0-1
    pub proximity: f64,
    /// `proximity * fade_out`, 0-1
    pub strength: f64,
}

/// Score `cell` against a single impulse
pub fn score(cell: DVec2, impulse: &Impulse, tuning: &WaveTuning) -> RingSample {
    let distance = cell.distance(impulse.origin);
    let wave_progress = impulse.age * tuning.wave_progress_rate;
    let ring_radius = wave_progress * tuning.ring_speed;
    let proximity = (1.0 - (distance - ring_radius).abs() / tuning.ring_width).max(0.0);
    let strength = proximity * impulse.fade_out();

    RingSample {
        distance,
        ring_radius,
        proximity,
        strength,
    }
}

/// Evaluate one cell against the whole pool.
///
/// Returns `None` when no impulse reaches the cell with positive strength.
pub fn evaluate_cell(
    cell: DVec2,
    pool: &ImpulsePool,
    tuning: &WaveTuning,
    policy: CombinePolicy,
) -> Option<DrawPrimitive> {
    let mut winner: Option<(&Impulse, RingSample)> = None;

    for impulse in pool.iter() {
        let sample = score(cell, impulse, tuning);
        if sample.strength <= 0.0 {
            continue;
        }
        let replace = match (policy, &winner) {
            (CombinePolicy::LastWins, _) | (_, None) => true,
            (CombinePolicy::Strongest, Some((_, best))) => sample.strength >= best.strength,
        };
        if replace {
            winner = Some((impulse, sample));
        }
    }

    winner.map(|(impulse, sample)| primitive(cell, impulse, &sample, tuning))
}

/// Size and color a cell's dot from its winning contribution
pub fn primitive(
    cell: DVec2,
    impulse: &Impulse,
    sample: &RingSample,
    tuning: &WaveTuning,
) -> DrawPrimitive {
    let radius = tuning.cell_size * sample.strength.min(1.0) * tuning.dot_fill / 2.0;
    let alpha = sample.strength * tuning.max_alpha;

    let color = match &impulse.palette {
        Some(palette) => {
            // Not clamped: cells beyond the ring extrapolate past the end hue
            let t = sample.distance / (sample.ring_radius + tuning.ring_width);
            palette.start.lerp(palette.end, t).to_rgba(alpha)
        }
        None => Rgba::white(alpha),
    };

    DrawPrimitive {
        center: cell,
        radius,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::Hsl;
    use crate::sim::impulse::{ColorMode, Palette};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const EPS: f64 = 1e-9;

    fn impulse(origin: DVec2, age: f64) -> Impulse {
        let mut imp = Impulse::new(0, origin, &WaveTuning::default(), None);
        imp.age = age;
        imp
    }

    #[test]
    fn test_score_at_birth() {
        let tuning = WaveTuning::default();
        let s = score(DVec2::ZERO, &impulse(DVec2::ZERO, 0.0), &tuning);
        assert_eq!(s.distance, 0.0);
        assert_eq!(s.ring_radius, 0.0);
        assert_eq!(s.proximity, 1.0);
        assert_eq!(s.strength, 1.0);
    }

    #[test]
    fn test_score_peaks_on_ring_edge() {
        let tuning = WaveTuning::default();
        // age 0.5 -> progress 1.0 -> ring radius 500
        let imp = impulse(DVec2::ZERO, 0.5);
        let on_ring = score(DVec2::new(500.0, 0.0), &imp, &tuning);
        assert!((on_ring.ring_radius - 500.0).abs() < EPS);
        assert!((on_ring.proximity - 1.0).abs() < EPS);
        assert!((on_ring.strength - 0.75).abs() < EPS);

        let halfway = score(DVec2::new(400.0, 0.0), &imp, &tuning);
        assert!((halfway.proximity - 0.5).abs() < EPS);

        let outside = score(DVec2::new(800.0, 0.0), &imp, &tuning);
        assert_eq!(outside.proximity, 0.0);
        assert_eq!(outside.strength, 0.0);
    }

    #[test]
    fn test_no_primitive_beyond_ring_width() {
        let tuning = WaveTuning::default();
        let mut pool = ImpulsePool::new();
        pool.insert(DVec2::ZERO, ColorMode::Default, &tuning, &mut Pcg32::seed_from_u64(1));
        assert!(evaluate_cell(DVec2::new(200.0, 0.0), &pool, &tuning, CombinePolicy::LastWins).is_none());
        assert!(evaluate_cell(DVec2::new(300.0, 300.0), &pool, &tuning, CombinePolicy::LastWins).is_none());
        assert!(evaluate_cell(DVec2::new(100.0, 0.0), &pool, &tuning, CombinePolicy::LastWins).is_some());
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let pool = ImpulsePool::new();
        let tuning = WaveTuning::default();
        assert!(evaluate_cell(DVec2::ZERO, &pool, &tuning, CombinePolicy::LastWins).is_none());
    }

    #[test]
    fn test_default_primitive_is_white() {
        let tuning = WaveTuning::default();
        let mut pool = ImpulsePool::new();
        pool.insert(DVec2::ZERO, ColorMode::Default, &tuning, &mut Pcg32::seed_from_u64(1));
        let p = evaluate_cell(DVec2::ZERO, &pool, &tuning, CombinePolicy::LastWins).unwrap();
        assert_eq!(p.center, DVec2::ZERO);
        assert!((p.radius - 8.0).abs() < EPS);
        assert_eq!(p.color, Rgba::white(0.5));
    }

    #[test]
    fn test_rainbow_color_at_center_is_start() {
        let tuning = WaveTuning::default();
        let mut imp = impulse(DVec2::ZERO, 0.0);
        imp.palette = Some(Palette {
            start: Hsl::new(240.0, 100.0, 50.0),
            end: Hsl::new(0.0, 100.0, 50.0),
        });
        let sample = score(DVec2::ZERO, &imp, &tuning);
        let p = primitive(DVec2::ZERO, &imp, &sample, &tuning);
        // t = 0 -> pure blue
        assert!(p.color.r.abs() < EPS && p.color.g.abs() < EPS && (p.color.b - 1.0).abs() < EPS);
        assert!((p.color.a - 0.5).abs() < EPS);
    }

    #[test]
    fn test_rainbow_color_uses_distance_ratio() {
        let tuning = WaveTuning::default();
        let mut imp = impulse(DVec2::ZERO, 0.0);
        imp.palette = Some(Palette {
            start: Hsl::new(0.0, 100.0, 50.0),
            end: Hsl::new(120.0, 100.0, 50.0),
        });
        // ring radius 0, ring width 200 -> t = 100 / 200 = 0.5 -> hue 60 (yellow)
        let cell = DVec2::new(100.0, 0.0);
        let sample = score(cell, &imp, &tuning);
        let p = primitive(cell, &imp, &sample, &tuning);
        assert!((p.color.r - 1.0).abs() < EPS);
        assert!((p.color.g - 1.0).abs() < EPS);
        assert!(p.color.b.abs() < EPS);
        assert!((p.color.a - 0.25).abs() < EPS);
        assert!((p.radius - 4.0).abs() < EPS);
    }

    fn two_overlapping() -> (ImpulsePool, WaveTuning) {
        let tuning = WaveTuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ImpulsePool::new();
        // Strong white impulse right on the cell, then a weak rainbow one further off
        pool.insert(DVec2::ZERO, ColorMode::Default, &tuning, &mut rng);
        pool.insert(DVec2::new(150.0, 0.0), ColorMode::Rainbow, &tuning, &mut rng);
        (pool, tuning)
    }

    #[test]
    fn test_last_wins_overwrites_stronger_earlier_impulse() {
        let (pool, tuning) = two_overlapping();
        let p = evaluate_cell(DVec2::ZERO, &pool, &tuning, CombinePolicy::LastWins).unwrap();
        // Second impulse: distance 150 -> strength 0.25, rainbow colored
        assert!((p.radius - 2.0).abs() < EPS);
        assert!((p.color.a - 0.125).abs() < EPS);
    }

    #[test]
    fn test_strongest_keeps_stronger_impulse() {
        let (pool, tuning) = two_overlapping();
        let p = evaluate_cell(DVec2::ZERO, &pool, &tuning, CombinePolicy::Strongest).unwrap();
        assert!((p.radius - 8.0).abs() < EPS);
        assert_eq!(p.color, Rgba::white(0.5));
    }

    #[test]
    fn test_zero_strength_impulse_does_not_overwrite() {
        let tuning = WaveTuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ImpulsePool::new();
        pool.insert(DVec2::ZERO, ColorMode::Default, &tuning, &mut rng);
        pool.insert(DVec2::new(1000.0, 1000.0), ColorMode::Rainbow, &tuning, &mut rng);
        let p = evaluate_cell(DVec2::ZERO, &pool, &tuning, CombinePolicy::LastWins).unwrap();
        assert_eq!(p.color, Rgba::white(0.5));
    }

    proptest! {
        #[test]
        fn prop_strength_in_unit_range(
            cx in -1000.0f64..1000.0,
            cy in -1000.0f64..1000.0,
            ox in 0.0f64..800.0,
            oy in 0.0f64..600.0,
            age in 0.0f64..2.0,
        ) {
            let tuning = WaveTuning::default();
            let s = score(DVec2::new(cx, cy), &impulse(DVec2::new(ox, oy), age), &tuning);
            prop_assert!(s.strength >= 0.0);
            prop_assert!(s.strength <= 1.0);
            prop_assert!(s.proximity >= 0.0 && s.proximity <= 1.0);
        }

        #[test]
        fn prop_emitted_primitives_have_positive_alpha(
            cx in 0.0f64..400.0,
            cy in 0.0f64..400.0,
            age in 0.0f64..1.9,
        ) {
            let tuning = WaveTuning::default();
            let mut pool = ImpulsePool::new();
            pool.insert(DVec2::new(200.0, 200.0), ColorMode::Rainbow, &tuning, &mut Pcg32::seed_from_u64(9));
            for _ in 0..((age / tuning.dt) as usize) {
                pool.advance(400.0, 400.0, tuning.dt);
            }
            if let Some(p) = evaluate_cell(DVec2::new(cx, cy), &pool, &tuning, CombinePolicy::LastWins) {
                prop_assert!(p.color.a > 0.0);
                prop_assert!(p.radius > 0.0);
                prop_assert!(p.radius <= tuning.cell_size * tuning.dot_fill / 2.0);
            }
        }
    }
}
