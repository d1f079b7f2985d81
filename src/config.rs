//! Configuration management for chromaglobe.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ChromaError, Result};

/// Command-line arguments for chromaglobe
#[derive(Parser, Debug)]
#[command(name = "chromaglobe")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory acting as the web root for line assets
    /// (expects `assets/naturalearth/...` beneath it)
    #[arg(short, long, env = "CHROMAGLOBE_ASSET_ROOT")]
    pub assets: Option<PathBuf>,

    /// Colormap catalog JSON replacing the bundled one
    #[arg(long, env = "CHROMAGLOBE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "CHROMAGLOBE_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CHROMAGLOBE_PORT")]
    pub port: Option<u16>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "CHROMAGLOBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHROMAGLOBE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Web root for line assets
    #[serde(default = "default_asset_root")]
    pub root: PathBuf,

    /// Optional catalog file replacing the bundled colormaps
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    /// Seconds before a failed line layer may be fetched again
    /// (None = failures are permanent for the process lifetime)
    #[serde(default)]
    pub failure_retry_secs: Option<u64>,

    /// Layers to load at startup, as "feature:resolution"
    #[serde(default)]
    pub preload: Vec<String>,
}

/// Globe geometry defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Globe radius in scene units
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Line width handed to the material
    #[serde(default = "default_line_width")]
    pub line_width: f32,

    /// Dash length for dashed layers
    #[serde(default = "default_dash_size")]
    pub dash_size: f32,

    /// Gap length for dashed layers
    #[serde(default = "default_gap_size")]
    pub gap_size: f32,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Asset configuration
    #[serde(default)]
    pub assets: AssetConfig,

    /// Geometry configuration
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(host) = args.host {
            config.server.host = host;
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if let Some(root) = args.assets {
            config.assets.root = root;
        }
        if args.catalog.is_some() {
            config.assets.catalog_file = args.catalog;
        }
        if let Some(level) = args.log_level {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server = other.server;
        self.assets.root = other.assets.root;
        if other.assets.catalog_file.is_some() {
            self.assets.catalog_file = other.assets.catalog_file;
        }
        if other.assets.failure_retry_secs.is_some() {
            self.assets.failure_retry_secs = other.assets.failure_retry_secs;
        }
        if !other.assets.preload.is_empty() {
            self.assets.preload = other.assets.preload;
        }
        self.geometry = other.geometry;
        self.log_level = other.log_level;
    }

    /// Retry interval for failed line layers, if any
    pub fn failure_retry(&self) -> Option<Duration> {
        self.assets.failure_retry_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server host
        if self.server.host.is_empty() {
            return Err(ChromaError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(ChromaError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ChromaError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if self.assets.root.as_os_str().is_empty() {
            return Err(ChromaError::Config {
                message: "Asset root cannot be empty".to_string(),
            });
        }

        // Validate geometry defaults
        let geometry = &self.geometry;
        if !(geometry.radius.is_finite() && geometry.radius > 0.0) {
            return Err(ChromaError::Config {
                message: format!("Globe radius must be positive, got {}", geometry.radius),
            });
        }
        for (name, value) in [
            ("line_width", geometry.line_width),
            ("dash_size", geometry.dash_size),
            ("gap_size", geometry.gap_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ChromaError::Config {
                    message: format!("Geometry {} must be positive, got {}", name, value),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            assets: AssetConfig::default(),
            geometry: GeometryConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
            catalog_file: None,
            failure_retry_secs: None,
            preload: Vec::new(),
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            line_width: default_line_width(),
            dash_size: default_dash_size(),
            gap_size: default_gap_size(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_radius() -> f64 {
    100.0
}

fn default_line_width() -> f32 {
    1.0
}

fn default_dash_size() -> f32 {
    crate::geolines::geometry::DEFAULT_DASH_SIZE
}

fn default_gap_size() -> f32 {
    crate::geolines::geometry::DEFAULT_GAP_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}
