//! Color types and HSL math
//!
//! Rainbow waves blend between two HSL endpoints along the ring; the result is
//! converted to RGB only when a draw primitive is emitted.

use serde::{Deserialize, Serialize};

use crate::wrap_degrees;

/// Hue in degrees (any value, wraps mod 360), saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Interpolate toward `end` taking the short way around the hue wheel.
    ///
    /// `t` is not clamped: values past 1 extrapolate, which is how dots far
    /// outside a rainbow ring pick up hues beyond the end color.
    pub fn lerp(self, end: Hsl, t: f64) -> Hsl {
        let dh = (end.h - self.h + 540.0).rem_euclid(360.0) - 180.0;
        Hsl {
            h: self.h + dh * t,
            s: self.s + (end.s - self.s) * t,
            l: self.l + (end.l - self.l) * t,
        }
    }

    /// Convert to RGB with the given alpha (CSS `hsla()` semantics)
    pub fn to_rgba(self, alpha: f64) -> Rgba {
        let h = wrap_degrees(self.h) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgba::new(l, l, l, alpha);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgba::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            alpha,
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Straight (non-premultiplied) color, all channels 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white(alpha: f64) -> Self {
        Self::new(1.0, 1.0, 1.0, alpha)
    }

    /// Single-precision channels for GPU upload
    pub fn to_array(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }
}
