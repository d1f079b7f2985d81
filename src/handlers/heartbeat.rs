//! Heartbeat endpoint handler.
//!
//! Returns server status information, including uptime, memory usage and the
//! state of the palette catalog and line layer cache.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::state::AppState;

/// Server ID, fixed for the life of the process
static SERVER_ID: once_cell::sync::Lazy<String> =
    once_cell::sync::Lazy::new(|| Uuid::new_v4().to_string());

/// Server start time
static START_TIME: once_cell::sync::Lazy<SystemTime> = once_cell::sync::Lazy::new(SystemTime::now);

/// Heartbeat response structure
#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    /// Server ID (unique per instance)
    pub server_id: String,
    /// Current timestamp (RFC 3339)
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Process memory usage in bytes
    pub memory_usage_bytes: Option<u64>,
    /// Color engine information
    pub colormaps: ColormapInfo,
    /// Line layer cache information
    pub layers: LayerInfo,
    /// Server status
    pub status: String,
}

/// Color engine information
#[derive(Debug, Serialize)]
pub struct ColormapInfo {
    /// Number of named palettes in the catalog
    pub palette_count: usize,
    /// Category ids with a scale
    pub categories: Vec<&'static str>,
    /// Category scales built so far
    pub scales_built: usize,
}

/// Line layer cache information
#[derive(Debug, Serialize)]
pub struct LayerInfo {
    /// Layers requested so far
    pub cached: usize,
    /// Layers that loaded with data
    pub available: usize,
}

/// Force the start time so uptime counts from startup, not first heartbeat.
pub fn mark_start() {
    once_cell::sync::Lazy::force(&START_TIME);
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    Json(build_heartbeat(&state))
}

fn build_heartbeat(state: &AppState) -> HeartbeatResponse {
    let now = SystemTime::now();
    let timestamp = chrono::DateTime::<chrono::Utc>::from(now)
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let uptime = now
        .duration_since(*START_TIME)
        .unwrap_or(Duration::from_secs(0));

    HeartbeatResponse {
        server_id: SERVER_ID.clone(),
        timestamp,
        uptime_seconds: uptime.as_secs(),
        memory_usage_bytes: get_memory_usage(),
        colormaps: ColormapInfo {
            palette_count: state.catalog.names().len(),
            categories: crate::colormaps::VariableCategory::ALL
                .iter()
                .map(|category| category.id())
                .collect(),
            scales_built: state.registry.built_count(),
        },
        layers: LayerInfo {
            cached: state.geolines.len(),
            available: state.geolines.available_count(),
        },
        status: "healthy".to_string(),
    }
}

/// Get current process memory usage (Linux only)
fn get_memory_usage() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        // RSS is the second field of /proc/self/statm, in pages
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let pages = statm.split_whitespace().nth(1)?.parse::<u64>().ok()?;
        Some(pages * 4096)
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
