//! Turning line data into projected, colored segments.
//!
//! Both input shapes (null-delimited parallel arrays and GeoJSON) are
//! normalized here into one list of [`LineSegment`]s, which is all that
//! [`build_geometry`](super::geometry::build_geometry) consumes.

use serde::Serialize;
use serde_json::Value;
use std::mem;

use super::geojson::extract_lines;
use super::projection::{project_point, Point3};
use super::source::{FeatureType, GeoLineData};
use crate::colormaps::Rgb;

/// Color given to GeoJSON lines when the caller does not pick one.
pub const GEOJSON_DEFAULT_COLOR: Rgb = Rgb::new(255, 255, 255);

/// One connected polyline on the globe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub positions: Vec<Point3>,
    pub color: Rgb,
}

/// Default color for each line layer.
pub fn default_color(feature: FeatureType) -> Rgb {
    match feature {
        FeatureType::Coastlines => Rgb::new(0xff, 0xff, 0xff),
        FeatureType::Rivers => Rgb::new(0x4f, 0xa3, 0xff),
        FeatureType::Lakes => Rgb::new(0x6f, 0xb7, 0xff),
        FeatureType::Geographic => Rgb::new(0x8a, 0x8a, 0x8a),
    }
}

/// The input shapes the processor understands.
#[derive(Debug, Clone, Copy)]
pub enum LineInput<'a> {
    ParallelArrays {
        data: &'a GeoLineData,
        feature: FeatureType,
    },
    GeoJson(&'a Value),
}

/// Normalize any supported input into segments.
pub fn segments_from(
    input: LineInput<'_>,
    radius: f64,
    color_override: Option<Rgb>,
) -> Vec<LineSegment> {
    match input {
        LineInput::ParallelArrays { data, feature } => {
            process_parallel_arrays(data, feature, radius, color_override)
        }
        LineInput::GeoJson(value) => process_geojson(value, radius, color_override),
    }
}

/// Walk the parallel arrays, splitting at every `null`. Polylines shorter
/// than two points are dropped. Arrays of unequal length are walked only as
/// far as the shorter one.
pub fn process_parallel_arrays(
    data: &GeoLineData,
    feature: FeatureType,
    radius: f64,
    color_override: Option<Rgb>,
) -> Vec<LineSegment> {
    let color = color_override.unwrap_or_else(|| default_color(feature));
    let mut segments = Vec::new();
    let mut current: Vec<Point3> = Vec::new();

    let mut flush = |current: &mut Vec<Point3>| {
        if current.len() >= 2 {
            segments.push(LineSegment {
                positions: mem::take(current),
                color,
            });
        } else {
            current.clear();
        }
    };

    for (lon, lat) in data.longitudes.iter().zip(&data.latitudes) {
        match (lon, lat) {
            (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => {
                current.push(project_point(*lat, *lon, radius));
            }
            _ => flush(&mut current),
        }
    }
    flush(&mut current);

    segments
}

/// One segment per `LineString`, per line of a `MultiLineString`, and per
/// ring of a `Polygon`/`MultiPolygon`.
pub fn process_geojson(
    feature_collection: &Value,
    radius: f64,
    color_override: Option<Rgb>,
) -> Vec<LineSegment> {
    let color = color_override.unwrap_or(GEOJSON_DEFAULT_COLOR);
    extract_lines(feature_collection)
        .into_iter()
        .map(|line| LineSegment {
            positions: line
                .into_iter()
                .map(|(lon, lat)| project_point(lat, lon, radius))
                .collect(),
            color,
        })
        .collect()
}
