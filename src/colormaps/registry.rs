//! Variable categories and their color scales.
//!
//! Free-text dataset identifiers ("NOAA SST Monthly", "Air Temperature 2m")
//! are classified into a small set of categories by an ordered keyword table.
//! Each category owns one scale whose bands are computed on first request and
//! kept for the life of the registry.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use super::catalog::ColorMapCatalog;
use super::colormap::{ramp, resample};
use super::scale::{ColorScale, Domain, ScaleType};
use super::{diverging, sequential};
use crate::error::{ChromaError, Result};

/// Band count for quantized scales.
pub const QUANTIZED_BANDS: usize = 101;

/// Stop count for continuous scales.
pub const CONTINUOUS_STOPS: usize = 64;

/// Kinds of geophysical variable the viewer knows how to color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableCategory {
    SeaSurfaceTemp,
    Temperature,
    Precipitation,
    Wind,
    Humidity,
    Pressure,
}

impl VariableCategory {
    pub const ALL: [VariableCategory; 6] = [
        VariableCategory::SeaSurfaceTemp,
        VariableCategory::Temperature,
        VariableCategory::Precipitation,
        VariableCategory::Wind,
        VariableCategory::Humidity,
        VariableCategory::Pressure,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            VariableCategory::SeaSurfaceTemp => "sst",
            VariableCategory::Temperature => "temperature",
            VariableCategory::Precipitation => "precipitation",
            VariableCategory::Wind => "wind",
            VariableCategory::Humidity => "humidity",
            VariableCategory::Pressure => "pressure",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for VariableCategory {
    type Err = ChromaError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let lowered = match lowered.as_str() {
            "sea_surface_temp" | "seasurfacetemp" => "sst",
            other => other,
        };
        VariableCategory::ALL
            .into_iter()
            .find(|c| c.id() == lowered)
            .ok_or_else(|| ChromaError::InvalidParameter {
                param: "category".to_string(),
                message: format!("Unknown category: {}", s),
            })
    }
}

/// One row of the classification table: any keyword found in the lowercased
/// identifier selects the category.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: VariableCategory,
    pub keywords: &'static [&'static str],
}

impl ClassificationRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Evaluated top to bottom; the first match wins. Sea surface temperature
/// must precede generic temperature so "sea surface temperature" is not
/// swallowed by "temperature".
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: VariableCategory::SeaSurfaceTemp,
        keywords: &["sst", "sea", "ocean"],
    },
    ClassificationRule {
        category: VariableCategory::Temperature,
        keywords: &["temperature", "temp", "airtemp", "air"],
    },
    ClassificationRule {
        category: VariableCategory::Precipitation,
        keywords: &["precip", "rain", "prate", "snow"],
    },
    ClassificationRule {
        category: VariableCategory::Wind,
        keywords: &["wind", "uwnd", "vwnd", "gust"],
    },
    ClassificationRule {
        category: VariableCategory::Humidity,
        keywords: &["humid", "moisture", "rhum", "shum"],
    },
    ClassificationRule {
        category: VariableCategory::Pressure,
        keywords: &["pressure", "slp", "pres"],
    },
];

/// Category used when no rule matches.
pub const DEFAULT_CATEGORY: VariableCategory = VariableCategory::Temperature;

/// Classify a dataset identifier.
pub fn classify(dataset_identifier: &str) -> VariableCategory {
    let lowered = dataset_identifier.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Static description of a category's scale.
struct ScaleRecipe {
    name: &'static str,
    description: &'static str,
    palette: &'static str,
    fallback: &'static [[u8; 3]],
    domain: Domain,
    scale_type: ScaleType,
    quantized: bool,
}

impl ScaleRecipe {
    fn bands(&self) -> usize {
        if self.quantized {
            QUANTIZED_BANDS
        } else {
            CONTINUOUS_STOPS
        }
    }
}

fn recipe_for(category: VariableCategory) -> ScaleRecipe {
    match category {
        VariableCategory::SeaSurfaceTemp => ScaleRecipe {
            name: "Sea Surface Temperature",
            description: "Ocean surface temperature (°C)",
            palette: "cmocean|thermal",
            fallback: sequential::THERMAL,
            domain: Domain::new(-2.0, 35.0),
            scale_type: ScaleType::Sequential,
            quantized: true,
        },
        VariableCategory::Temperature => ScaleRecipe {
            name: "Temperature",
            description: "Near-surface air temperature (°C)",
            palette: "NCL|BlueWhiteOrangeRed",
            fallback: diverging::COOLWARM,
            domain: Domain::new(-40.0, 40.0),
            scale_type: ScaleType::Diverging,
            quantized: true,
        },
        VariableCategory::Precipitation => ScaleRecipe {
            name: "Precipitation",
            description: "Precipitation rate (mm/day)",
            palette: "cmocean|rain",
            fallback: sequential::RAIN,
            domain: Domain::new(0.0, 20.0),
            scale_type: ScaleType::Sequential,
            quantized: true,
        },
        VariableCategory::Wind => ScaleRecipe {
            name: "Wind Speed",
            description: "Wind speed (m/s)",
            palette: "cmocean|speed",
            fallback: sequential::SPEED,
            domain: Domain::new(0.0, 30.0),
            scale_type: ScaleType::Sequential,
            quantized: false,
        },
        VariableCategory::Humidity => ScaleRecipe {
            name: "Humidity",
            description: "Relative humidity (%)",
            palette: "cmocean|haline",
            fallback: sequential::HALINE,
            domain: Domain::new(0.0, 100.0),
            scale_type: ScaleType::Sequential,
            quantized: false,
        },
        VariableCategory::Pressure => ScaleRecipe {
            name: "Pressure",
            description: "Sea level pressure (hPa)",
            palette: "ColorBrewer|RdBu",
            fallback: diverging::RDBU,
            domain: Domain::new(950.0, 1050.0),
            scale_type: ScaleType::Diverging,
            quantized: false,
        },
    }
}

/// Owns one lazily built scale per category.
pub struct ColorScaleRegistry {
    catalog: Arc<ColorMapCatalog>,
    scales: [OnceCell<Arc<ColorScale>>; 6],
}

impl ColorScaleRegistry {
    pub fn new(catalog: Arc<ColorMapCatalog>) -> Self {
        Self {
            catalog,
            scales: Default::default(),
        }
    }

    pub fn catalog(&self) -> &ColorMapCatalog {
        &self.catalog
    }

    /// The scale for a category, built on first request.
    pub fn get_scale(&self, category: VariableCategory) -> Arc<ColorScale> {
        self.scales[category.index()]
            .get_or_init(|| Arc::new(self.build_scale(category)))
            .clone()
    }

    /// How many category scales have been built so far.
    pub fn built_count(&self) -> usize {
        self.scales.iter().filter(|cell| cell.get().is_some()).count()
    }

    /// Classify the identifier, then return that category's scale.
    pub fn scale_for_dataset(&self, dataset_identifier: &str) -> Arc<ColorScale> {
        self.get_scale(classify(dataset_identifier))
    }

    fn build_scale(&self, category: VariableCategory) -> ColorScale {
        let recipe = recipe_for(category);
        let base = self.catalog.resolve_or(recipe.palette, &ramp(recipe.fallback));
        let colors = resample(&base, recipe.bands());

        debug!(
            category = %category,
            palette = recipe.palette,
            bands = colors.len(),
            "Color scale built"
        );

        ColorScale {
            name: recipe.name.to_string(),
            description: recipe.description.to_string(),
            colors,
            domain: recipe.domain,
            scale_type: recipe.scale_type,
            quantized: recipe.quantized,
        }
    }
}
