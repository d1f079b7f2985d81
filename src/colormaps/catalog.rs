//! Named colormap resolution.
//!
//! The catalog is a static JSON array of `{FullName, Values}` records. Names
//! are hierarchical (`"cmocean|thermal"`), and callers may ask for a map by
//! its full name, its space-joined form, or just its last segment. Entries are
//! parsed, resampled and indexed once, on first use, and never rebuilt.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::colormap::{ramp, resample, Rgb};
use super::{diverging, sequential};
use crate::error::Result;

/// Name that always resolves to the dataset default ramp.
pub const DATASET_DEFAULT_NAME: &str = "dataset-default";

/// Stop count every catalog palette is resampled to when indexed.
pub const CATALOG_STOPS: usize = 64;

const BUNDLED_CATALOG: &str = include_str!("../../assets/colormaps.json");

/// Hand-tuned replacements for catalog maps whose published colors read badly
/// on a lit globe. Checked before the catalog and returned as-is.
const CURATED_OVERRIDES: &[(&str, &[[u8; 3]])] = &[
    (
        "NCL|BlueWhiteOrangeRed",
        &[
            [8, 48, 107],
            [33, 113, 181],
            [107, 174, 214],
            [198, 219, 239],
            [247, 247, 247],
            [253, 208, 162],
            [253, 141, 60],
            [217, 72, 1],
            [127, 39, 4],
        ],
    ),
    (
        "Matplotlib|jet",
        &[
            [48, 18, 59],
            [70, 98, 215],
            [54, 170, 249],
            [26, 228, 182],
            [114, 254, 94],
            [200, 239, 52],
            [250, 186, 57],
            [246, 107, 25],
            [202, 42, 4],
            [122, 4, 3],
        ],
    ),
];

/// Ramps compiled into the crate, resolvable by these names after the catalog.
const BUILTIN_RAMPS: &[(&str, &[[u8; 3]])] = &[
    ("viridis", sequential::VIRIDIS),
    ("thermal", sequential::THERMAL),
    ("rain", sequential::RAIN),
    ("speed", sequential::SPEED),
    ("haline", sequential::HALINE),
    ("coolwarm", diverging::COOLWARM),
    ("rdbu", diverging::RDBU),
    ("seismic", diverging::SEISMIC),
];

/// A named palette as held by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    pub aliases: BTreeSet<String>,
    pub colors: Vec<Rgb>,
}

impl PaletteEntry {
    fn new(name: &str, colors: Vec<Rgb>) -> Self {
        let mut aliases = BTreeSet::new();
        let spaced = name.replace('|', " ");
        if spaced != name {
            aliases.insert(spaced);
        }
        if let Some(last) = name.rsplit('|').next() {
            if last != name && !last.is_empty() {
                aliases.insert(last.to_string());
            }
        }
        Self {
            name: name.to_string(),
            aliases,
            colors,
        }
    }
}

/// A catalog record as it appears in the JSON file.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "FullName")]
    full_name: String,
    #[serde(rename = "Values", default)]
    values: Vec<Value>,
}

/// A color value is either a bare hex string or an object carrying one.
fn parse_color_value(value: &Value) -> Option<Rgb> {
    match value {
        Value::String(s) => Rgb::from_hex(s),
        Value::Object(map) => ["Hex", "hex", "Color"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_str)
            .and_then(Rgb::from_hex),
        _ => None,
    }
}

struct CatalogIndex {
    entries: Vec<PaletteEntry>,
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl CatalogIndex {
    fn build(source: &str, stops: usize) -> Self {
        let raw: Vec<Value> = match serde_json::from_str(source) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "Colormap catalog is not a JSON array; using built-in ramps only");
                Vec::new()
            }
        };

        let mut entries = Vec::with_capacity(raw.len() + BUILTIN_RAMPS.len());
        let mut skipped = 0usize;
        for value in raw {
            let Ok(record) = serde_json::from_value::<RawEntry>(value) else {
                skipped += 1;
                continue;
            };
            let colors: Vec<Rgb> = record.values.iter().filter_map(parse_color_value).collect();
            if colors.is_empty() || record.full_name.is_empty() {
                skipped += 1;
                continue;
            }
            entries.push(PaletteEntry::new(
                &record.full_name,
                resample(&colors, stops),
            ));
        }
        let catalog_len = entries.len();

        for (name, table) in BUILTIN_RAMPS {
            entries.push(PaletteEntry::new(name, resample(&ramp(table), stops)));
        }

        // Full names win over aliases, and catalog entries win over built-ins.
        let mut exact = HashMap::new();
        let mut folded = HashMap::new();
        let mut insert = |key: &str, i: usize| {
            exact.entry(key.to_string()).or_insert(i);
            folded.entry(key.to_lowercase()).or_insert(i);
        };
        for (i, entry) in entries[..catalog_len].iter().enumerate() {
            insert(&entry.name, i);
        }
        for (i, entry) in entries[..catalog_len].iter().enumerate() {
            for alias in &entry.aliases {
                insert(alias, i);
            }
        }
        for (i, entry) in entries.iter().enumerate().skip(catalog_len) {
            insert(&entry.name, i);
        }

        info!(
            operation = "catalog_index",
            entries = catalog_len,
            builtins = BUILTIN_RAMPS.len(),
            skipped = skipped,
            "Colormap catalog indexed"
        );

        Self {
            entries,
            exact,
            folded,
        }
    }
}

/// Resolves colormap names to palettes.
pub struct ColorMapCatalog {
    source: Cow<'static, str>,
    stops: usize,
    index: OnceCell<CatalogIndex>,
}

impl ColorMapCatalog {
    /// The catalog shipped with the crate.
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// A catalog over any JSON document in the catalog format. Nothing is
    /// parsed until the first lookup.
    pub fn from_json(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
            stops: CATALOG_STOPS,
            index: OnceCell::new(),
        }
    }

    /// Read a catalog file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(content))
    }

    /// Use the catalog file if one is configured and readable, otherwise the bundled one.
    pub fn from_optional_file(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::from_file(path).unwrap_or_else(|e| {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read colormap catalog; using the bundled catalog"
                );
                Self::bundled()
            }),
            None => Self::bundled(),
        }
    }

    /// Override the resample stop count. Only meaningful before first use.
    pub fn with_stops(mut self, stops: usize) -> Self {
        self.stops = stops.max(2);
        self
    }

    fn index(&self) -> &CatalogIndex {
        self.index.get_or_init(|| {
            let start = Instant::now();
            let index = CatalogIndex::build(&self.source, self.stops);
            debug!(
                operation = "catalog_index",
                duration_us = start.elapsed().as_micros() as u64,
                "Catalog lookup maps built"
            );
            index
        })
    }

    /// Full names of every catalog entry, built-ins included, in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.index()
            .entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Find a catalog entry without falling back.
    ///
    /// Tries the name as given, then with `|` replaced by spaces, then the
    /// last `|` segment; each candidate case-sensitively before
    /// case-insensitively.
    pub fn palette(&self, name: &str) -> Option<&PaletteEntry> {
        let index = self.index();
        let spaced = name.replace('|', " ");
        let last = name.rsplit('|').next().unwrap_or(name);

        for candidate in [name, spaced.as_str(), last] {
            if candidate.is_empty() {
                continue;
            }
            if let Some(&i) = index.exact.get(candidate) {
                return Some(&index.entries[i]);
            }
            if let Some(&i) = index.folded.get(&candidate.to_lowercase()) {
                return Some(&index.entries[i]);
            }
        }
        None
    }

    /// Resolve a colormap name, falling back to the viridis-like default ramp.
    pub fn resolve(&self, name: &str) -> Vec<Rgb> {
        self.resolve_or(name, &ramp(sequential::VIRIDIS))
    }

    /// Resolve a colormap name, returning `fallback` when nothing matches.
    pub fn resolve_or(&self, name: &str, fallback: &[Rgb]) -> Vec<Rgb> {
        if name == DATASET_DEFAULT_NAME {
            return ramp(sequential::DATASET_DEFAULT);
        }

        if let Some(colors) = curated_override(name) {
            return colors;
        }

        match self.palette(name) {
            Some(entry) => entry.colors.clone(),
            None => {
                debug!(colormap = name, "Unknown colormap; using fallback");
                fallback.to_vec()
            }
        }
    }
}

impl Default for ColorMapCatalog {
    fn default() -> Self {
        Self::bundled()
    }
}

fn curated_override(name: &str) -> Option<Vec<Rgb>> {
    CURATED_OVERRIDES
        .iter()
        .find(|(key, _)| *key == name)
        .or_else(|| {
            CURATED_OVERRIDES
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
        })
        .map(|(_, table)| ramp(table))
}
