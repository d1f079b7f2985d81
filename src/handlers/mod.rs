//! HTTP request handlers for the chromaglobe API.
//!
//! This module contains all the endpoint handlers for the web server.

pub mod colorbar;
pub mod colormap;
pub mod geolines;
pub mod heartbeat;

pub use colorbar::{colorbar_handler, colorbar_png_handler};
pub use colormap::{color_handler, colormap_handler};
pub use geolines::{geojson_handler, geolines_handler};
pub use heartbeat::heartbeat_handler;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::ChromaError;
use crate::logging::log_request_error;
use crate::state::AppState;

/// All routes, without middleware layers.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/heartbeat", get(heartbeat_handler))
        .route("/colorbar", get(colorbar_handler))
        .route("/colorbar.png", get(colorbar_png_handler))
        .route("/colormap", get(colormap_handler))
        .route("/color", get(color_handler))
        .route("/geolines", get(geolines_handler))
        .route("/geojson", post(geojson_handler))
        .with_state(state)
}

/// HTTP status for an error surfaced by a handler.
pub fn status_for(error: &ChromaError) -> StatusCode {
    match error {
        ChromaError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        ChromaError::LayerUnavailable { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log the failure and turn it into a JSON error body.
pub fn error_response(
    error: ChromaError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) -> Response {
    log_request_error(&error, endpoint, request_id, params);

    (
        status_for(&error),
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}

/// A query string or body that failed to deserialize, answered like any
/// other parameter error.
pub fn rejected(param: &str, message: String, endpoint: &str, request_id: &str) -> Response {
    error_response(
        ChromaError::InvalidParameter {
            param: param.to_string(),
            message,
        },
        endpoint,
        request_id,
        None,
    )
}
