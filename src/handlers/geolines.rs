//! Line overlay endpoints.
//!
//! `GET /geolines` turns a cached Natural Earth layer into renderer-ready
//! buffers; `POST /geojson` does the same for a posted GeoJSON document.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::{error_response, rejected};
use crate::colormaps::Rgb;
use crate::error::{ChromaError, Result};
use crate::geolines::processor::GEOJSON_DEFAULT_COLOR;
use crate::geolines::{
    build_geometry, cache_key, default_color, segments_from, FeatureType, LineGeometry,
    LineInput, Resolution,
};
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Drawing parameters shared by both endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrawQuery {
    /// Globe radius; defaults to the configured radius
    pub radius: Option<f64>,
    /// Hex color overriding the layer default
    pub color: Option<String>,
    /// Draw dashed instead of solid
    pub dashed: Option<bool>,
    /// Line width; defaults to the configured width
    pub line_width: Option<f32>,
}

/// Query parameters for GET /geolines
#[derive(Debug, Deserialize)]
pub struct GeoLinesQuery {
    pub feature: Option<String>,
    /// low, medium, high or none (default low)
    pub resolution: Option<String>,
    pub radius: Option<f64>,
    pub color: Option<String>,
    pub dashed: Option<bool>,
    pub line_width: Option<f32>,
}

impl GeoLinesQuery {
    fn draw(&self) -> DrawQuery {
        DrawQuery {
            radius: self.radius,
            color: self.color.clone(),
            dashed: self.dashed,
            line_width: self.line_width,
        }
    }
}

/// Validated drawing parameters
struct Draw {
    radius: f64,
    color: Option<Rgb>,
    dashed: bool,
    line_width: f32,
}

fn validate_draw(state: &AppState, draw: &DrawQuery) -> Result<Draw> {
    let radius = draw.radius.unwrap_or(state.config.geometry.radius);
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ChromaError::InvalidParameter {
            param: "radius".to_string(),
            message: format!("Must be a positive number, got {}", radius),
        });
    }

    let line_width = draw.line_width.unwrap_or(state.config.geometry.line_width);
    if !(line_width.is_finite() && line_width > 0.0) {
        return Err(ChromaError::InvalidParameter {
            param: "line_width".to_string(),
            message: format!("Must be a positive number, got {}", line_width),
        });
    }

    let color = draw
        .color
        .as_deref()
        .map(|hex| {
            Rgb::from_hex(hex).ok_or_else(|| ChromaError::InvalidParameter {
                param: "color".to_string(),
                message: format!("Not a hex color: {}", hex),
            })
        })
        .transpose()?;

    Ok(Draw {
        radius,
        color,
        dashed: draw.dashed.unwrap_or(false),
        line_width,
    })
}

fn render(state: &AppState, input: LineInput<'_>, draw: &Draw, fallback: Rgb) -> LineGeometry {
    let segments = segments_from(input, draw.radius, draw.color);
    let mut options = state.geometry_options();
    options.dashed = draw.dashed;
    options.color = draw.color.unwrap_or(fallback);
    build_geometry(&segments, draw.line_width, &options)
}

async fn layer_geometry(state: &AppState, params: &GeoLinesQuery) -> Result<LineGeometry> {
    let feature: FeatureType = params
        .feature
        .as_deref()
        .ok_or_else(|| ChromaError::InvalidParameter {
            param: "feature".to_string(),
            message: "A feature type is required".to_string(),
        })?
        .parse()?;
    let resolution: Resolution = match params.resolution.as_deref() {
        Some(resolution) => resolution.parse()?,
        None => Resolution::Low,
    };
    let draw = validate_draw(state, &params.draw())?;

    let data = state
        .geolines
        .get_cached(feature, resolution)
        .await
        .ok_or_else(|| ChromaError::LayerUnavailable {
            layer: cache_key(feature, resolution),
        })?;

    Ok(render(
        state,
        LineInput::ParallelArrays {
            data: &data,
            feature,
        },
        &draw,
        default_color(feature),
    ))
}

/// Handle GET /geolines requests
pub async fn geolines_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<GeoLinesQuery>, QueryRejection>,
) -> Response {
    let request_id = generate_request_id();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return rejected("query", rejection.body_text(), "/geolines", &request_id)
        }
    };
    let start_time = Instant::now();

    match layer_geometry(&state, &params).await {
        Ok(geometry) => {
            info!(
                endpoint = "/geolines",
                request_id = %request_id,
                feature = ?params.feature,
                resolution = ?params.resolution,
                edges = geometry.edge_count,
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Line geometry generated"
            );
            Json(geometry).into_response()
        }
        Err(error) => error_response(
            error,
            "/geolines",
            &request_id,
            Some(&format!(
                "feature={:?}, resolution={:?}",
                params.feature, params.resolution
            )),
        ),
    }
}

/// Handle POST /geojson requests
pub async fn geojson_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<DrawQuery>, QueryRejection>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = generate_request_id();
    let (params, document) = match (query, body) {
        (Ok(Query(params)), Ok(Json(document))) => (params, document),
        (Err(rejection), _) => {
            return rejected("query", rejection.body_text(), "/geojson", &request_id)
        }
        (_, Err(rejection)) => {
            return rejected("body", rejection.body_text(), "/geojson", &request_id)
        }
    };

    let result = validate_draw(&state, &params).map(|draw| {
        render(
            &state,
            LineInput::GeoJson(&document),
            &draw,
            GEOJSON_DEFAULT_COLOR,
        )
    });

    match result {
        Ok(geometry) => {
            info!(
                endpoint = "/geojson",
                request_id = %request_id,
                edges = geometry.edge_count,
                "GeoJSON geometry generated"
            );
            Json(geometry).into_response()
        }
        Err(error) => error_response(error, "/geojson", &request_id, Some(&format!("{:?}", params))),
    }
}
