//! Legend generation: labelled ticks plus a gradient matching the mapping.

use image::{ImageBuffer, RgbImage};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

use super::colormap::Rgb;
use super::registry::{ColorScaleRegistry, VariableCategory};
use super::scale::ColorScale;

/// Tick count used when the caller does not ask for one.
pub const DEFAULT_TICKS: usize = 7;

/// A labelled point on the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
    pub color: Rgb,
}

/// One stop of the legend gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub offset_percent: f64,
    pub color: Rgb,
}

/// The legend gradient, both as stops and as a CSS `linear-gradient`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
    pub css: String,
}

/// Everything a legend widget needs.
#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub category: VariableCategory,
    pub scale: Arc<ColorScale>,
    pub ticks: Vec<Tick>,
    pub gradient: Gradient,
}

impl ColorBar {
    /// Rasterize the bar left to right. Each column takes the color of the
    /// value it represents, so the image shows the clipping and gamma too.
    pub fn render_png(&self, width: u32, height: u32) -> RgbImage {
        let domain = self.scale.domain;
        let mut img: RgbImage = ImageBuffer::new(width, height);
        for x in 0..width {
            let t = if width > 1 {
                x as f64 / (width - 1) as f64
            } else {
                0.0
            };
            let color = self.scale.map(domain.min + t * domain.span());
            for y in 0..height {
                img.put_pixel(x, y, image::Rgb([color.r, color.g, color.b]));
            }
        }
        img
    }
}

/// Builds legends from the registry's scales.
#[derive(Clone)]
pub struct ColorBarGenerator {
    registry: Arc<ColorScaleRegistry>,
}

impl ColorBarGenerator {
    pub fn new(registry: Arc<ColorScaleRegistry>) -> Self {
        Self { registry }
    }

    pub fn generate(&self, category: VariableCategory, num_ticks: usize) -> ColorBar {
        let scale = self.registry.get_scale(category);
        let ticks = ticks_for(&scale, num_ticks);
        let gradient = gradient_for(&scale);
        ColorBar {
            category,
            scale,
            ticks,
            gradient,
        }
    }
}

/// Evenly spaced ticks across the domain. The last tick is pinned to the
/// domain maximum so float error cannot leave it short.
pub fn ticks_for(scale: &ColorScale, num_ticks: usize) -> Vec<Tick> {
    let domain = scale.domain;
    (0..num_ticks)
        .map(|i| {
            let value = if num_ticks == 1 {
                domain.min
            } else if i == num_ticks - 1 {
                domain.max
            } else {
                domain.min + (i as f64 / (num_ticks - 1) as f64) * domain.span()
            };
            Tick {
                value,
                label: format_tick_label(value),
                color: scale.map(value),
            }
        })
        .collect()
}

/// Format a tick value with precision chosen by magnitude.
pub fn format_tick_label(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        format!("{}k", fixed(value / 1000.0, 1))
    } else if magnitude >= 100.0 {
        fixed(value, 0)
    } else if magnitude >= 10.0 {
        fixed(value, 1)
    } else {
        fixed(value, 2)
    }
}

/// Fixed-decimal formatting with ties rounded away from zero
/// (`{:.N}` alone rounds exact ties to even).
fn fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    format!("{:.*}", decimals, rounded)
}

/// Quantized scales get two stops per band so the legend shows hard edges;
/// continuous scales get one stop per color and blend.
pub fn gradient_for(scale: &ColorScale) -> Gradient {
    let n = scale.colors.len();
    let mut stops = Vec::with_capacity(if scale.quantized { 2 * n } else { n });

    if scale.quantized {
        for (i, &color) in scale.colors.iter().enumerate() {
            stops.push(GradientStop {
                offset_percent: i as f64 / n as f64 * 100.0,
                color,
            });
            stops.push(GradientStop {
                offset_percent: (i + 1) as f64 / n as f64 * 100.0,
                color,
            });
        }
    } else {
        let denominator = n.saturating_sub(1).max(1) as f64;
        for (i, &color) in scale.colors.iter().enumerate() {
            stops.push(GradientStop {
                offset_percent: i as f64 / denominator * 100.0,
                color,
            });
        }
    }

    let mut css = String::from("linear-gradient(to right");
    for stop in &stops {
        let _ = write!(css, ", {} {:.2}%", stop.color, stop.offset_percent);
    }
    css.push(')');

    Gradient { stops, css }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::catalog::ColorMapCatalog;
    use crate::colormaps::scale::{Domain, ScaleType};

    fn generator() -> ColorBarGenerator {
        let catalog = Arc::new(ColorMapCatalog::bundled());
        ColorBarGenerator::new(Arc::new(ColorScaleRegistry::new(catalog)))
    }

    fn small_scale(quantized: bool) -> ColorScale {
        ColorScale {
            name: "three".to_string(),
            description: String::new(),
            colors: vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0), Rgb::new(0, 0, 255)],
            domain: Domain::new(0.0, 1.0),
            scale_type: ScaleType::Sequential,
            quantized,
        }
    }

    #[test]
    fn test_temperature_ticks() {
        let bar = generator().generate(VariableCategory::Temperature, DEFAULT_TICKS);
        assert_eq!(bar.ticks.len(), 7);
        assert_eq!(bar.ticks[0].value, bar.scale.domain.min);
        assert_eq!(bar.ticks[6].value, bar.scale.domain.max);

        for tick in &bar.ticks {
            assert_eq!(tick.color, bar.scale.map(tick.value));
        }
        let labels: Vec<&str> = bar.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["-40.0", "-26.7", "-13.3", "0.00", "13.3", "26.7", "40.0"]
        );
    }

    #[test]
    fn test_pinned_last_tick() {
        let mut scale = small_scale(false);
        scale.domain = Domain::new(0.1, 0.3);
        let ticks = ticks_for(&scale, 3);
        assert_eq!(ticks[2].value, 0.3);
        assert!(ticks_for(&scale, 0).is_empty());
        let single = ticks_for(&scale, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].value, 0.1);
    }

    #[test]
    fn test_label_formatting() {
        assert_eq!(format_tick_label(1013.0), "1.0k");
        assert_eq!(format_tick_label(-2500.0), "-2.5k");
        assert_eq!(format_tick_label(950.0), "950");
        assert_eq!(format_tick_label(100.0), "100");
        assert_eq!(format_tick_label(12.34), "12.3");
        assert_eq!(format_tick_label(-10.0), "-10.0");
        assert_eq!(format_tick_label(3.14159), "3.14");
        assert_eq!(format_tick_label(0.0), "0.00");
    }

    #[test]
    fn test_label_ties_round_away_from_zero() {
        assert_eq!(format_tick_label(962.5), "963");
        assert_eq!(format_tick_label(987.5), "988");
        assert_eq!(format_tick_label(31.25), "31.3");
        assert_eq!(format_tick_label(18.75), "18.8");
        assert_eq!(format_tick_label(0.125), "0.13");
        assert_eq!(format_tick_label(-0.125), "-0.13");
        assert_eq!(format_tick_label(1012.5), "1.0k");
        assert_eq!(format_tick_label(1050.0), "1.1k");
    }

    #[test]
    fn test_quantized_gradient_has_hard_bands() {
        let gradient = gradient_for(&small_scale(true));
        assert_eq!(gradient.stops.len(), 6);
        assert_eq!(gradient.stops[0].offset_percent, 0.0);
        assert_eq!(gradient.stops[5].offset_percent, 100.0);
        // Adjacent stops of one band share a color; band edges coincide
        assert_eq!(gradient.stops[0].color, gradient.stops[1].color);
        assert_eq!(gradient.stops[1].offset_percent, gradient.stops[2].offset_percent);
        assert_eq!(
            gradient.css,
            "linear-gradient(to right, #ff0000 0.00%, #ff0000 33.33%, #00ff00 33.33%, \
             #00ff00 66.67%, #0000ff 66.67%, #0000ff 100.00%)"
        );
    }

    #[test]
    fn test_continuous_gradient_blends() {
        let gradient = gradient_for(&small_scale(false));
        let offsets: Vec<f64> = gradient.stops.iter().map(|s| s.offset_percent).collect();
        assert_eq!(offsets, vec![0.0, 50.0, 100.0]);
        assert_eq!(
            gradient.css,
            "linear-gradient(to right, #ff0000 0.00%, #00ff00 50.00%, #0000ff 100.00%)"
        );
    }

    #[test]
    fn test_render_png_edges() {
        let bar = generator().generate(VariableCategory::Wind, 5);
        let img = bar.render_png(64, 4);
        assert_eq!(img.dimensions(), (64, 4));
        let first = bar.scale.colors[0];
        let last = bar.scale.colors[bar.scale.colors.len() - 1];
        assert_eq!(img.get_pixel(0, 0).0, [first.r, first.g, first.b]);
        assert_eq!(img.get_pixel(63, 3).0, [last.r, last.g, last.b]);
    }
}
