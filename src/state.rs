//! Application state management for chromaglobe.
//!
//! This module defines the shared state that is passed to all handlers: the
//! colormap catalog, the per-category scale registry, the legend generator
//! and the line layer cache, all built once from the [`Config`].

use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

use crate::colormaps::registry::DEFAULT_CATEGORY;
use crate::colormaps::{
    classify, ColorBarGenerator, ColorMapCatalog, ColorScaleRegistry, VariableCategory,
};
use crate::config::Config;
use crate::error::{ChromaError, Result};
use crate::geolines::{
    AssetFetcher, FeatureType, FsAssetFetcher, GeoLineCache, GeoLineSource, GeometryOptions,
    Resolution,
};
use crate::logging::OperationTimer;

/// The main application state shared across all handlers
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Named palettes
    pub catalog: Arc<ColorMapCatalog>,
    /// One calibrated scale per variable category
    pub registry: Arc<ColorScaleRegistry>,
    /// Legend builder over the registry
    pub colorbars: ColorBarGenerator,
    /// Memoized line layers
    pub geolines: GeoLineCache,
}

impl AppState {
    /// Build the state, reading line assets from `config.assets.root`.
    pub fn new(config: Config) -> Self {
        let fetcher = Arc::new(FsAssetFetcher::new(config.assets.root.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Build the state around a custom asset fetcher.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn AssetFetcher>) -> Self {
        let catalog = Arc::new(ColorMapCatalog::from_optional_file(
            config.assets.catalog_file.as_deref(),
        ));
        let registry = Arc::new(ColorScaleRegistry::new(catalog.clone()));
        let colorbars = ColorBarGenerator::new(registry.clone());
        let geolines = GeoLineCache::new(GeoLineSource::new(fetcher))
            .with_failure_retry(config.failure_retry());

        Self {
            config,
            catalog,
            registry,
            colorbars,
            geolines,
        }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Pick the category for a request. An explicit category wins, then a
    /// dataset identifier is classified, then the default applies.
    pub fn category_for(
        &self,
        category: Option<&str>,
        dataset: Option<&str>,
    ) -> Result<VariableCategory> {
        match (category, dataset) {
            (Some(category), _) => category.parse(),
            (None, Some(dataset)) => Ok(classify(dataset)),
            (None, None) => Ok(DEFAULT_CATEGORY),
        }
    }

    /// Geometry options with the configured dash pattern.
    pub fn geometry_options(&self) -> GeometryOptions {
        GeometryOptions {
            dash_size: self.config.geometry.dash_size,
            gap_size: self.config.geometry.gap_size,
            ..GeometryOptions::default()
        }
    }

    /// Load the configured `feature:resolution` layers concurrently.
    /// Returns how many ended up available.
    pub async fn preload(&self) -> usize {
        let keys = &self.config.assets.preload;
        if keys.is_empty() {
            return 0;
        }

        let timer = OperationTimer::start("geoline_preload", keys);

        let mut layers = Vec::with_capacity(keys.len());
        for key in keys {
            match parse_layer_key(key) {
                Ok(layer) => layers.push(layer),
                Err(e) => warn!(key = %key, error = %e, "Skipping preload entry"),
            }
        }

        let results = join_all(
            layers
                .iter()
                .map(|&(feature, resolution)| self.geolines.get_cached(feature, resolution)),
        )
        .await;
        let available = results.iter().filter(|data| data.is_some()).count();

        timer.finish(available, keys.len());
        available
    }
}

/// Parse a `feature:resolution` layer key such as `rivers:medium`.
pub fn parse_layer_key(key: &str) -> Result<(FeatureType, Resolution)> {
    let (feature, resolution) = key.split_once(':').ok_or_else(|| ChromaError::InvalidParameter {
        param: "preload".to_string(),
        message: format!("Expected feature:resolution, got {}", key),
    })?;
    Ok((feature.parse()?, resolution.parse()?))
}
