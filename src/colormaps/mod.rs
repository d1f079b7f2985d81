//! Scientific color mapping.
//!
//! Named palettes come from the [`catalog`]; the [`registry`] turns them into
//! one calibrated [`ColorScale`] per variable category; [`ColorScale::map`]
//! colors individual values; [`colorbar`] builds the matching legend.

pub mod catalog;
pub mod colorbar;
pub mod colormap;
pub mod diverging;
pub mod registry;
pub mod scale;
pub mod sequential;

pub use catalog::{ColorMapCatalog, PaletteEntry, DATASET_DEFAULT_NAME};
pub use colorbar::{ColorBar, ColorBarGenerator, Gradient, GradientStop, Tick, DEFAULT_TICKS};
pub use colormap::{lerp_color, resample, Rgb};
pub use registry::{classify, ColorScaleRegistry, VariableCategory};
pub use scale::{map_value, ColorScale, Domain, ScaleType};
