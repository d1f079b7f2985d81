//! Error types for chromaglobe.
//!
//! The color and geometry core recovers from almost everything locally (an
//! unknown colormap falls back, a broken asset becomes an unavailable layer).
//! These variants are what the outer layers still need to talk about:
//! configuration, HTTP parameters, and the load failures that get logged
//! before being swallowed.

use thiserror::Error;

/// The main error type for chromaglobe operations.
#[derive(Error, Debug)]
pub enum ChromaError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// An asset could not be fetched or its payload was malformed
    #[error("Failed to load {path}: {message}")]
    LoadFailure { path: String, message: String },

    /// A line layer has no data (resolution "none", or a cached load failure)
    #[error("Layer unavailable: {layer}")]
    LayerUnavailable { layer: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

impl ChromaError {
    /// Short variant name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Config { .. } => "config",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::LoadFailure { .. } => "load_failure",
            Self::LayerUnavailable { .. } => "layer_unavailable",
            Self::ImageGeneration { .. } => "image_generation",
            Self::Server { .. } => "server",
        }
    }

    /// Errors caused by what the client asked for rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::LayerUnavailable { .. }
        )
    }
}

/// Convenience type alias for Results with ChromaError
pub type Result<T> = std::result::Result<T, ChromaError>;
