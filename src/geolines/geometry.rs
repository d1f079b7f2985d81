//! Renderer-ready line buffers.
//!
//! Every consecutive point pair of every segment becomes its own two-vertex
//! edge (line-pieces topology), so the whole layer is one flat position
//! buffer and one draw call, with no strip restarts between polylines.

use serde::Serialize;

use super::processor::LineSegment;
use crate::colormaps::Rgb;

pub const DEFAULT_DASH_SIZE: f32 = 2.0;
pub const DEFAULT_GAP_SIZE: f32 = 1.0;

/// How to package the segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryOptions {
    /// Dashed lines use `color` for every edge and ignore segment colors.
    pub dashed: bool,
    pub color: Rgb,
    pub dash_size: f32,
    pub gap_size: f32,
    pub opacity: f32,
    pub depth_test: bool,
    pub depth_write: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            dashed: false,
            color: Rgb::new(255, 255, 255),
            dash_size: DEFAULT_DASH_SIZE,
            gap_size: DEFAULT_GAP_SIZE,
            opacity: 1.0,
            // Thin lines hugging a curved surface occlude each other if they
            // write depth; test against the globe but leave depth untouched.
            depth_test: true,
            depth_write: false,
        }
    }
}

/// Material parameters for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineMaterial {
    Solid {
        vertex_colors: bool,
        line_width: f32,
        opacity: f32,
        transparent: bool,
        depth_test: bool,
        depth_write: bool,
    },
    Dashed {
        color: Rgb,
        line_width: f32,
        dash_size: f32,
        gap_size: f32,
        opacity: f32,
        transparent: bool,
        depth_test: bool,
        depth_write: bool,
    },
}

/// Flat buffers plus material, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    /// `x, y, z` per vertex, two vertices per edge.
    pub positions: Vec<f32>,
    /// `r, g, b` in `[0, 1]` per vertex; solid lines only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<f32>>,
    /// Distance along the polyline per vertex; dashed lines only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_distances: Option<Vec<f32>>,
    pub edge_count: usize,
    pub material: LineMaterial,
}

impl LineGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Flatten segments into independent edges and attach a material.
pub fn build_geometry(
    segments: &[LineSegment],
    line_width: f32,
    options: &GeometryOptions,
) -> LineGeometry {
    let edge_count: usize = segments
        .iter()
        .map(|s| s.positions.len().saturating_sub(1))
        .sum();

    let mut positions = Vec::with_capacity(edge_count * 6);
    let mut colors = (!options.dashed).then(|| Vec::with_capacity(edge_count * 6));
    let mut distances = options.dashed.then(|| Vec::with_capacity(edge_count * 2));

    for segment in segments {
        let rgb = segment.color.to_unit();
        let mut travelled = 0.0f64;

        for pair in segment.positions.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            positions.extend_from_slice(&a.as_f32_array());
            positions.extend_from_slice(&b.as_f32_array());

            if let Some(colors) = colors.as_mut() {
                colors.extend_from_slice(&rgb);
                colors.extend_from_slice(&rgb);
            }

            if let Some(distances) = distances.as_mut() {
                let length = a.distance(&b);
                distances.push(travelled as f32);
                distances.push((travelled + length) as f32);
                travelled += length;
            }
        }
    }

    let transparent = options.opacity < 1.0;
    let material = if options.dashed {
        LineMaterial::Dashed {
            color: options.color,
            line_width,
            dash_size: options.dash_size,
            gap_size: options.gap_size,
            opacity: options.opacity,
            transparent,
            depth_test: options.depth_test,
            depth_write: options.depth_write,
        }
    } else {
        LineMaterial::Solid {
            vertex_colors: true,
            line_width,
            opacity: options.opacity,
            transparent,
            depth_test: options.depth_test,
            depth_write: options.depth_write,
        }
    };

    LineGeometry {
        positions,
        colors,
        line_distances: distances,
        edge_count,
        material,
    }
}
