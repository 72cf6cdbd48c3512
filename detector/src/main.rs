use axum::{routing::get, Router};
use chrono::Duration;
use detector::liveness::DEFAULT_GHOST_TIMEOUT_SECS;
use detector::registry::Registry;
use detector::{metrics, rest};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let ghost_timeout_secs: i64 = env::var("GHOST_TIMEOUT_SECS")
        .unwrap_or_else(|_| DEFAULT_GHOST_TIMEOUT_SECS.to_string())
        .parse()
        .unwrap_or(DEFAULT_GHOST_TIMEOUT_SECS);

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting Ghostwatch detector");
    info!("HTTP server: {}", http_addr);
    info!("Ghost timeout: {}s", ghost_timeout_secs);

    // Initialize metrics
    metrics::init_metrics();

    let registry = Arc::new(Mutex::new(Registry::new(Duration::seconds(
        ghost_timeout_secs,
    ))));

    // Build HTTP app with REST API and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(registry));

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
