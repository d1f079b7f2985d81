//! Color primitives shared by the catalog, the scales and the geometry buffers.
//!
//! Colors are 8-bit sRGB triplets. They travel over the wire as `#rrggbb`
//! strings, which is also how the bundled catalog stores them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{ChromaError, Result};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 6-digit hex color. Accepts `#rrggbb`, `rrggbb` and `0xrrggbb`,
    /// in either case. Anything else yields `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `[0, 1]`, as renderers expect for vertex colors.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ChromaError;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::from_hex(s).ok_or_else(|| ChromaError::InvalidParameter {
            param: "color".to_string(),
            message: format!("Not a 6-digit hex color: {}", s),
        })
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {}", s)))
    }
}

/// Convert a built-in ramp table into colors.
pub fn ramp(table: &[[u8; 3]]) -> Vec<Rgb> {
    table.iter().copied().map(Rgb::from).collect()
}

/// Linear interpolation between two colors, rounded to the nearest channel value.
pub fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| {
        let v = a as f64 + (b as f64 - a as f64) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(mix(c1.r, c2.r), mix(c1.g, c2.g), mix(c1.b, c2.b))
}

/// Resample an ordered palette to exactly `m` evenly spaced stops.
///
/// Stop `i` sits at position `i / (m - 1) * (n - 1)` along the source and is
/// blended from the two bracketing source colors. The first and last source
/// colors are reproduced exactly.
pub fn resample(colors: &[Rgb], m: usize) -> Vec<Rgb> {
    let n = colors.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![colors[0]; m];
    }
    if m == 1 {
        return vec![colors[0]];
    }

    let last = (n - 1) as f64;
    (0..m)
        .map(|i| {
            let position = i as f64 / (m - 1) as f64 * last;
            let lo = (position.floor() as usize).min(n - 1);
            let hi = (lo + 1).min(n - 1);
            lerp_color(colors[lo], colors[hi], position - lo as f64)
        })
        .collect()
}
