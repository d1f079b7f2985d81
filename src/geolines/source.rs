//! Raw line data for globe overlays.
//!
//! Coastlines, rivers, lake shores and the geographic reference lines are
//! shipped as static Natural Earth derived JSON assets. Each holds two
//! parallel arrays; a `null` in either marks a break between polylines.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{ChromaError, Result};

/// Kinds of line overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Coastlines,
    Rivers,
    Lakes,
    /// Equator, tropics and polar circles.
    Geographic,
}

impl FeatureType {
    pub const ALL: [FeatureType; 4] = [
        FeatureType::Coastlines,
        FeatureType::Rivers,
        FeatureType::Lakes,
        FeatureType::Geographic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Coastlines => "coastlines",
            FeatureType::Rivers => "rivers",
            FeatureType::Lakes => "lakes",
            FeatureType::Geographic => "geographic",
        }
    }

    /// Natural Earth file-name suffix for the feature.
    fn asset_suffix(&self) -> &'static str {
        match self {
            FeatureType::Coastlines => "coastline",
            FeatureType::Rivers => "rivers_lake_centerlines",
            FeatureType::Lakes => "lakes",
            FeatureType::Geographic => "geographic_lines",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = ChromaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "coastlines" | "coastline" => Ok(FeatureType::Coastlines),
            "rivers" => Ok(FeatureType::Rivers),
            "lakes" => Ok(FeatureType::Lakes),
            "geographic" | "graticule" => Ok(FeatureType::Geographic),
            _ => Err(ChromaError::InvalidParameter {
                param: "feature".to_string(),
                message: format!(
                    "Unknown feature type: {}. Must be one of: coastlines, rivers, lakes, geographic",
                    s
                ),
            }),
        }
    }
}

/// Simplification tier of a line asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    Medium,
    High,
    /// Layer switched off; never fetched.
    None,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
            Resolution::None => "none",
        }
    }

    /// Natural Earth scale code, if the tier has data.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Resolution::Low => Some("110m"),
            Resolution::Medium => Some("50m"),
            Resolution::High => Some("10m"),
            Resolution::None => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ChromaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "110m" => Ok(Resolution::Low),
            "medium" | "50m" => Ok(Resolution::Medium),
            "high" | "10m" => Ok(Resolution::High),
            "none" | "off" => Ok(Resolution::None),
            _ => Err(ChromaError::InvalidParameter {
                param: "resolution".to_string(),
                message: format!(
                    "Unknown resolution: {}. Must be one of: low, medium, high, none",
                    s
                ),
            }),
        }
    }
}

/// Asset path for a layer, or `None` when the resolution is switched off.
///
/// The geographic lines come in a single tier and ignore the resolution.
pub fn asset_path(feature: FeatureType, resolution: Resolution) -> Option<String> {
    let code = resolution.code()?;
    let code = match feature {
        FeatureType::Geographic => "110m",
        _ => code,
    };
    Some(format!(
        "/assets/naturalearth/{}/ne_{}_{}.json",
        feature.as_str(),
        code,
        feature.asset_suffix()
    ))
}

/// Parallel longitude/latitude arrays. `None` entries break the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLineData {
    #[serde(rename = "Lon")]
    pub longitudes: Vec<Option<f64>>,
    #[serde(rename = "Lat")]
    pub latitudes: Vec<Option<f64>>,
}

impl GeoLineData {
    pub fn len(&self) -> usize {
        self.longitudes.len().min(self.latitudes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `null` break markers.
    pub fn break_count(&self) -> usize {
        self.longitudes
            .iter()
            .zip(&self.latitudes)
            .filter(|(lon, lat)| lon.is_none() || lat.is_none())
            .count()
    }
}

/// Where asset bytes come from.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the asset at an absolute asset path such as
    /// `/assets/naturalearth/lakes/ne_50m_lakes.json`.
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// Reads assets from a directory standing in for the web root.
#[derive(Debug, Clone)]
pub struct FsAssetFetcher {
    root: PathBuf,
}

impl FsAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetFetcher for FsAssetFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let full_path = self.root.join(path.trim_start_matches('/'));
            Ok(tokio::fs::read(&full_path).await?)
        })
    }
}

/// Loads line layers through an [`AssetFetcher`].
#[derive(Clone)]
pub struct GeoLineSource {
    fetcher: Arc<dyn AssetFetcher>,
}

impl GeoLineSource {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self { fetcher }
    }

    /// Load a layer. Returns `None` when the resolution is `none` (no I/O
    /// happens) or when the asset cannot be fetched or parsed; failures are
    /// logged, never returned.
    pub async fn load(
        &self,
        feature: FeatureType,
        resolution: Resolution,
    ) -> Option<GeoLineData> {
        let path = asset_path(feature, resolution)?;
        let start = Instant::now();

        match self.fetch_and_parse(&path).await {
            Ok(data) => {
                debug!(
                    operation = "geoline_load",
                    feature = %feature,
                    resolution = %resolution,
                    path = %path,
                    points = data.len(),
                    breaks = data.break_count(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Line layer loaded"
                );
                Some(data)
            }
            Err(error) => {
                warn!(
                    operation = "geoline_load",
                    feature = %feature,
                    resolution = %resolution,
                    error = %error,
                    "Line layer unavailable"
                );
                None
            }
        }
    }

    async fn fetch_and_parse(&self, path: &str) -> Result<GeoLineData> {
        let load_failure = |message: String| ChromaError::LoadFailure {
            path: path.to_string(),
            message,
        };

        let bytes = self
            .fetcher
            .fetch(path)
            .await
            .map_err(|e| load_failure(e.to_string()))?;

        let data: GeoLineData =
            serde_json::from_slice(&bytes).map_err(|e| load_failure(e.to_string()))?;

        if data.longitudes.len() != data.latitudes.len() {
            return Err(load_failure(format!(
                "Lon has {} entries but Lat has {}",
                data.longitudes.len(),
                data.latitudes.len()
            )));
        }

        Ok(data)
    }
}
