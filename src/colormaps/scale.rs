//! Color scales and the value-to-color mapping.
//!
//! A value is clamped into the scale's domain, normalized, clipped so the
//! outer 2% at each end saturates, gamma-corrected, and finally either snapped
//! to the nearest band (quantized scales) or blended between the two
//! bracketing colors.

use serde::Serialize;

use super::colormap::{lerp_color, Rgb};

/// Fraction of the normalized range given up at each end before gamma.
pub const CLIP_LOW: f64 = 0.02;
pub const CLIP_HIGH: f64 = 0.98;

/// Exponent applied after clipping; below 1 it stretches the low end.
pub const GAMMA: f64 = 0.85;

/// How a scale's colors are meant to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Sequential,
    Diverging,
    Categorical,
}

/// The `[min, max]` value range a scale is calibrated to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// `min < max`, both finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// An immutable, calibrated color scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    pub name: String,
    pub description: String,
    pub colors: Vec<Rgb>,
    pub domain: Domain,
    #[serde(rename = "type")]
    pub scale_type: ScaleType,
    pub quantized: bool,
}

impl ColorScale {
    /// Map a value to a color.
    ///
    /// Infinite values clamp to the ends of the domain like any other
    /// out-of-range value. `NaN` maps to the first color; use
    /// [`ColorScale::try_map`] to tell it apart.
    pub fn map(&self, value: f64) -> Rgb {
        let Some(&first) = self.colors.first() else {
            return Rgb::default();
        };
        if value.is_nan() {
            return first;
        }

        let t = self.normalize(value);
        let last = self.colors.len() - 1;

        if self.quantized {
            let index = ((t * last as f64).round() as usize).min(last);
            return self.colors[index];
        }

        let position = t * last as f64;
        let lo = (position.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        lerp_color(self.colors[lo], self.colors[hi], position - lo as f64)
    }

    /// Like [`ColorScale::map`], but `None` for `NaN`.
    pub fn try_map(&self, value: f64) -> Option<Rgb> {
        if value.is_nan() {
            None
        } else {
            Some(self.map(value))
        }
    }

    /// Clamp, normalize, clip and gamma-correct a value into `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let clamped = self.domain.clamp(value);
        let t_raw = (clamped - self.domain.min) / self.domain.span();
        let t_clip = ((t_raw - CLIP_LOW) / (CLIP_HIGH - CLIP_LOW)).clamp(0.0, 1.0);
        t_clip.powf(GAMMA)
    }
}

/// Free-function form of [`ColorScale::map`].
pub fn map_value(value: f64, scale: &ColorScale) -> Rgb {
    scale.map(value)
}
