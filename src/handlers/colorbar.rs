//! Legend endpoints.
//!
//! `GET /colorbar` returns ticks plus gradient as JSON; `GET /colorbar.png`
//! rasterizes the same bar.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use image::ImageFormat;
use serde::Deserialize;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::{error_response, rejected};
use crate::colormaps::{ColorBar, DEFAULT_TICKS};
use crate::error::{ChromaError, Result};
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Upper bound on requested ticks
const MAX_TICKS: usize = 101;

/// Default image dimensions
const DEFAULT_WIDTH: u32 = 256;
const DEFAULT_HEIGHT: u32 = 24;
const MAX_DIMENSION: u32 = 4096;

/// Query parameters for the legend endpoints
#[derive(Debug, Deserialize)]
pub struct ColorBarQuery {
    /// Free-text dataset identifier to classify
    pub dataset: Option<String>,
    /// Explicit category id (sst, temperature, ...); wins over `dataset`
    pub category: Option<String>,
    /// Number of ticks
    pub ticks: Option<usize>,
    /// Image width in pixels (PNG only)
    pub width: Option<u32>,
    /// Image height in pixels (PNG only)
    pub height: Option<u32>,
}

impl ColorBarQuery {
    fn describe(&self) -> String {
        format!(
            "dataset={:?}, category={:?}, ticks={:?}",
            self.dataset, self.category, self.ticks
        )
    }
}

fn build_colorbar(state: &AppState, params: &ColorBarQuery) -> Result<ColorBar> {
    let category = state.category_for(params.category.as_deref(), params.dataset.as_deref())?;

    let ticks = params.ticks.unwrap_or(DEFAULT_TICKS);
    if ticks > MAX_TICKS {
        return Err(ChromaError::InvalidParameter {
            param: "ticks".to_string(),
            message: format!("At most {} ticks can be requested, got {}", MAX_TICKS, ticks),
        });
    }

    Ok(state.colorbars.generate(category, ticks))
}

/// Handle GET /colorbar requests
pub async fn colorbar_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ColorBarQuery>, QueryRejection>,
) -> Response {
    let request_id = generate_request_id();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return rejected("query", rejection.body_text(), "/colorbar", &request_id)
        }
    };

    match build_colorbar(&state, &params) {
        Ok(bar) => {
            debug!(
                endpoint = "/colorbar",
                request_id = %request_id,
                category = %bar.category,
                ticks = bar.ticks.len(),
                "Color bar generated"
            );
            Json(bar).into_response()
        }
        Err(error) => error_response(error, "/colorbar", &request_id, Some(&params.describe())),
    }
}

/// Handle GET /colorbar.png requests
pub async fn colorbar_png_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ColorBarQuery>, QueryRejection>,
) -> Response {
    let request_id = generate_request_id();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return rejected("query", rejection.body_text(), "/colorbar.png", &request_id)
        }
    };
    let start_time = Instant::now();

    match render_colorbar_png(&state, &params) {
        Ok(bytes) => {
            info!(
                endpoint = "/colorbar.png",
                request_id = %request_id,
                bytes = bytes.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Color bar image generated"
            );
            (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], bytes).into_response()
        }
        Err(error) => error_response(
            error,
            "/colorbar.png",
            &request_id,
            Some(&params.describe()),
        ),
    }
}

fn render_colorbar_png(state: &AppState, params: &ColorBarQuery) -> Result<Vec<u8>> {
    let width = params.width.unwrap_or(DEFAULT_WIDTH);
    let height = params.height.unwrap_or(DEFAULT_HEIGHT);
    for (param, value) in [("width", width), ("height", height)] {
        if value == 0 || value > MAX_DIMENSION {
            return Err(ChromaError::InvalidParameter {
                param: param.to_string(),
                message: format!("Must be between 1 and {}, got {}", MAX_DIMENSION, value),
            });
        }
    }

    let bar = build_colorbar(state, params)?;
    let img = bar.render_png(width, height);

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ChromaError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;

    Ok(buffer.into_inner())
}
