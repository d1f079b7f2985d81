//! Line extraction from GeoJSON.
//!
//! Only the parts needed to draw outlines are read: every `LineString`,
//! each line of a `MultiLineString`, and each ring of a `Polygon` or
//! `MultiPolygon`. Points and anything malformed are skipped.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// A line as `(lon, lat)` pairs in degrees.
pub type LonLatLine = Vec<(f64, f64)>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// Collect every drawable line in a GeoJSON value. Accepts a
/// `FeatureCollection`, a single `Feature`, a `GeometryCollection` or a bare
/// geometry. Lines with fewer than two usable positions are dropped.
pub fn extract_lines(value: &Value) -> Vec<LonLatLine> {
    let mut lines = Vec::new();
    collect(value, &mut lines);
    lines.retain(|line| line.len() >= 2);
    lines
}

fn collect(value: &Value, out: &mut Vec<LonLatLine>) {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            for feature in value
                .get("features")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect(feature, out);
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry") {
                collect(geometry, out);
            }
        }
        Some("GeometryCollection") => {
            for geometry in value
                .get("geometries")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect(geometry, out);
            }
        }
        Some(kind) => match Geometry::deserialize(value) {
            Ok(geometry) => push_geometry(geometry, out),
            Err(e) => debug!(kind = kind, error = %e, "Skipping malformed geometry"),
        },
        None => {
            if !value.is_null() {
                debug!("Skipping GeoJSON value without a type");
            }
        }
    }
}

fn push_geometry(geometry: Geometry, out: &mut Vec<LonLatLine>) {
    match geometry {
        Geometry::LineString { coordinates } => out.push(to_line(coordinates)),
        Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
            out.extend(coordinates.into_iter().map(to_line));
        }
        Geometry::MultiPolygon { coordinates } => {
            out.extend(coordinates.into_iter().flatten().map(to_line));
        }
        Geometry::Unsupported => {}
    }
}

/// Keep positions that carry at least a longitude and a latitude.
fn to_line(positions: Vec<Vec<f64>>) -> LonLatLine {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2 && p[0].is_finite() && p[1].is_finite())
        .map(|p| (p[0], p[1]))
        .collect()
}
