//! # chromaglobe
//!
//! Scientific color mapping and globe line geometry for climate data viewers.
//!
//! The crate has two halves that share nothing but the [`colormaps::Rgb`]
//! type:
//!
//! - **Color mapping**: a catalog of named palettes, one calibrated scale per
//!   variable category (sea surface temperature, temperature, precipitation,
//!   wind, humidity, pressure), value-to-color mapping with edge clipping and
//!   gamma, and legends with ticks and gradients.
//! - **Line geometry**: coastline, river, lake and reference-line layers
//!   fetched once and cached, projected onto a Y-up sphere and packed into
//!   line-piece buffers with solid or dashed materials.
//!
//! The [`handlers`] module exposes both over HTTP.

pub mod colormaps;
pub mod config;
pub mod error;
pub mod geolines;
pub mod handlers;
pub mod logging;
pub mod state;

pub use config::Config;
pub use error::{ChromaError, Result};
pub use logging::{
    create_http_trace_layer, generate_request_id, init_tracing, log_error, log_request_error,
    OperationTimer,
};
pub use state::AppState;
