//! chromaglobe - color scales, legends and globe line geometry over HTTP
//!
//! This is the main entry point for the chromaglobe server.

use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use chromaglobe::handlers::{app_router, heartbeat};
use chromaglobe::{create_http_trace_layer, init_tracing, log_error};
use chromaglobe::{AppState, ChromaError, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    heartbeat::mark_start();

    // Load configuration before tracing so the configured level applies
    let config = match Config::load().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            log_error(&e, "configuration");
            return Err(e);
        }
    };
    init_tracing(&config.log_level);

    info!("Starting chromaglobe v{}", env!("CARGO_PKG_VERSION"));
    info!(
        asset_root = %config.assets.root.display(),
        catalog = ?config.assets.catalog_file,
        "Asset configuration"
    );

    let state = AppState::new_shared(config.clone());
    info!(
        palettes = state.catalog.names().len(),
        "Colormap catalog ready"
    );

    if !config.assets.preload.is_empty() {
        let available = state.preload().await;
        info!(
            available = available,
            requested = config.assets.preload.len(),
            "Line layer preload finished"
        );
    }

    // Build the router
    let app = app_router(state).layer(
        ServiceBuilder::new()
            .layer(create_http_trace_layer())
            .layer(CorsLayer::permissive()),
    );

    // Create the server address
    let host = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| ChromaError::Config {
            message: format!("Invalid host address: {}", e),
        })?;
    let addr = SocketAddr::from((host, config.server.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ChromaError::Server {
            message: format!("Failed to bind to address: {}", e),
        })?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ChromaError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Server has been gracefully shut down");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
