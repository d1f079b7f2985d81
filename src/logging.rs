//! Logging setup and structured log helpers.
//!
//! Every line written through these helpers carries either an `operation`
//! field (startup work such as layer preloading) or an `endpoint` plus
//! `request_id` pair (HTTP failures), so a single filter picks out one
//! request or one background step.

use std::time::Instant;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use uuid::Uuid;

use crate::error::ChromaError;

/// Request/response tracing for the router. Spans are opened at `info`,
/// per-request lines are `debug` so that `info` stays readable under load.
pub fn create_http_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    DefaultMakeSpan,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::DEBUG)
                .latency_unit(LatencyUnit::Millis),
        )
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `log_level`; calling this again keeps the first subscriber.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Times a multi-item startup step and reports how many items succeeded.
#[derive(Debug)]
pub struct OperationTimer {
    operation: &'static str,
    id: Uuid,
    started: Instant,
}

impl OperationTimer {
    pub fn start(operation: &'static str, items: &[String]) -> Self {
        let id = Uuid::new_v4();
        info!(
            operation = operation,
            operation_id = %id,
            items = %items.join(", "),
            "Operation started"
        );
        Self {
            operation,
            id,
            started: Instant::now(),
        }
    }

    /// Log the outcome; a partial result is a warning.
    pub fn finish(self, succeeded: usize, requested: usize) {
        let duration_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        if succeeded == requested {
            info!(
                operation = self.operation,
                operation_id = %self.id,
                succeeded = succeeded,
                duration_ms = duration_ms,
                "Operation finished"
            );
        } else {
            warn!(
                operation = self.operation,
                operation_id = %self.id,
                succeeded = succeeded,
                requested = requested,
                duration_ms = duration_ms,
                "Operation finished with failures"
            );
        }
    }
}

/// Log an error outside any request, e.g. a bad configuration at startup.
pub fn log_error(error: &ChromaError, context: &str) {
    error!(error = %error, kind = error.kind(), context = context, "Error occurred");
}

/// Log a failed request. Client mistakes and missing layers go to `warn`,
/// everything else to `error`.
pub fn log_request_error(
    error: &ChromaError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) {
    let params = params.unwrap_or("none");
    if error.is_client_error() {
        warn!(
            error = %error,
            kind = error.kind(),
            endpoint = endpoint,
            request_id = request_id,
            params = params,
            "Request rejected"
        );
    } else {
        error!(
            error = %error,
            kind = error.kind(),
            endpoint = endpoint,
            request_id = request_id,
            params = params,
            "Request failed"
        );
    }
}

/// Id echoed in error bodies and attached to the matching log line.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
