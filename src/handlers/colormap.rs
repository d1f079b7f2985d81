//! Palette and value-mapping endpoints.
//!
//! `GET /colormap?name=` resolves a palette name through the catalog;
//! `GET /color?values=` maps numbers through a category's scale.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{error_response, rejected};
use crate::colormaps::{resample, Rgb, VariableCategory};
use crate::error::{ChromaError, Result};
use crate::logging::generate_request_id;
use crate::state::AppState;

/// Upper bound on resampled stops and mapped values per request
const MAX_ITEMS: usize = 4096;

/// Query parameters for GET /colormap
#[derive(Debug, Deserialize)]
pub struct ColormapQuery {
    /// Palette name, e.g. `cmocean|thermal`, `thermal` or `dataset-default`
    pub name: Option<String>,
    /// Resample the resolved colors to this many stops
    pub stops: Option<usize>,
}

/// Response body for GET /colormap
#[derive(Debug, Serialize)]
pub struct ColormapResponse {
    pub name: String,
    /// Full catalog name the request matched, if any
    pub matched: Option<String>,
    pub colors: Vec<Rgb>,
}

/// Query parameters for GET /color
#[derive(Debug, Deserialize)]
pub struct ColorQuery {
    pub category: Option<String>,
    pub dataset: Option<String>,
    /// Comma separated values; `nan` and `inf` are accepted
    pub values: Option<String>,
}

/// Response body for GET /color
#[derive(Debug, Serialize)]
pub struct ColorResponse {
    pub category: VariableCategory,
    pub scale: String,
    /// Echo of the parsed inputs; non-finite values serialize as `null`
    pub values: Vec<Option<f64>>,
    pub colors: Vec<Rgb>,
}

fn resolve_colormap(state: &AppState, params: &ColormapQuery) -> Result<ColormapResponse> {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ChromaError::InvalidParameter {
            param: "name".to_string(),
            message: "A colormap name is required".to_string(),
        })?;

    let matched = state.catalog.palette(name).map(|entry| entry.name.clone());
    let mut colors = state.catalog.resolve(name);

    if let Some(stops) = params.stops {
        if stops == 0 || stops > MAX_ITEMS {
            return Err(ChromaError::InvalidParameter {
                param: "stops".to_string(),
                message: format!("Must be between 1 and {}, got {}", MAX_ITEMS, stops),
            });
        }
        colors = resample(&colors, stops);
    }

    Ok(ColormapResponse {
        name: name.to_string(),
        matched,
        colors,
    })
}

/// Handle GET /colormap requests
pub async fn colormap_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ColormapQuery>, QueryRejection>,
) -> Response {
    let request_id = generate_request_id();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return rejected("query", rejection.body_text(), "/colormap", &request_id)
        }
    };

    match resolve_colormap(&state, &params) {
        Ok(response) => {
            debug!(
                endpoint = "/colormap",
                request_id = %request_id,
                name = %response.name,
                matched = ?response.matched,
                colors = response.colors.len(),
                "Colormap resolved"
            );
            Json(response).into_response()
        }
        Err(error) => error_response(
            error,
            "/colormap",
            &request_id,
            Some(&format!("name={:?}, stops={:?}", params.name, params.stops)),
        ),
    }
}

/// Parse `1.5, -3,nan` into numbers.
pub fn parse_values(raw: &str) -> Result<Vec<f64>> {
    let values = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| ChromaError::InvalidParameter {
                param: "values".to_string(),
                message: format!("Not a number: {}", s),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() > MAX_ITEMS {
        return Err(ChromaError::InvalidParameter {
            param: "values".to_string(),
            message: format!("At most {} values per request, got {}", MAX_ITEMS, values.len()),
        });
    }
    Ok(values)
}

fn map_colors(state: &AppState, params: &ColorQuery) -> Result<ColorResponse> {
    let category = state.category_for(params.category.as_deref(), params.dataset.as_deref())?;
    let values = parse_values(params.values.as_deref().unwrap_or(""))?;
    let scale = state.registry.get_scale(category);
    let colors = values.iter().map(|&value| scale.map(value)).collect();

    Ok(ColorResponse {
        category,
        scale: scale.name.clone(),
        values: values
            .into_iter()
            .map(|v| v.is_finite().then_some(v))
            .collect(),
        colors,
    })
}

/// Handle GET /color requests
pub async fn color_handler(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ColorQuery>, QueryRejection>,
) -> Response {
    let request_id = generate_request_id();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            return rejected("query", rejection.body_text(), "/color", &request_id)
        }
    };

    match map_colors(&state, &params) {
        Ok(response) => {
            debug!(
                endpoint = "/color",
                request_id = %request_id,
                category = %response.category,
                values = response.values.len(),
                "Values mapped"
            );
            Json(response).into_response()
        }
        Err(error) => error_response(
            error,
            "/color",
            &request_id,
            Some(&format!(
                "category={:?}, dataset={:?}, values={:?}",
                params.category, params.dataset, params.values
            )),
        ),
    }
}
