//! Test data generation utilities.
//!
//! Builds a throwaway web root laid out like the served Natural Earth
//! assets, with small line layers whose shapes are known in advance.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use chromaglobe::Config;

/// A temporary asset root. Dropping it deletes the files.
pub struct AssetRoot {
    pub dir: tempfile::TempDir,
}

impl AssetRoot {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write raw bytes at an asset path such as
    /// `/assets/naturalearth/lakes/ne_110m_lakes.json`.
    pub fn write(&self, asset_path: &str, contents: &[u8]) -> PathBuf {
        let full = self.path().join(asset_path.trim_start_matches('/'));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, contents).unwrap();
        full
    }

    /// Write a layer from parallel arrays; `None` becomes `null`.
    pub fn write_layer(&self, asset_path: &str, lon: &[Option<f64>], lat: &[Option<f64>]) {
        let doc = json!({ "Lon": lon, "Lat": lat });
        self.write(asset_path, doc.to_string().as_bytes());
    }

    /// Config pointing at this root.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.assets.root = self.path().to_path_buf();
        config
    }
}

/// Two coastline polylines of 2 and 3 points.
pub fn write_coastlines_110m(root: &AssetRoot) {
    let lon = [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(5.0)];
    root.write_layer(
        "/assets/naturalearth/coastlines/ne_110m_coastline.json",
        &lon,
        &lon,
    );
}

/// The equator as one closed-ish polyline of 5 points.
pub fn write_geographic_lines(root: &AssetRoot) {
    let lon = [
        Some(-180.0),
        Some(-90.0),
        Some(0.0),
        Some(90.0),
        Some(180.0),
    ];
    let lat = [Some(0.0); 5];
    root.write_layer(
        "/assets/naturalearth/geographic/ne_110m_geographic_lines.json",
        &lon,
        &lat,
    );
}

/// A lake layer whose arrays disagree in length.
pub fn write_mismatched_lakes_50m(root: &AssetRoot) {
    root.write_layer(
        "/assets/naturalearth/lakes/ne_50m_lakes.json",
        &[Some(0.0), Some(1.0), Some(2.0)],
        &[Some(0.0), Some(1.0)],
    );
}
