use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod views;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Parse config (missing bucket stops us here) ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting pet-listing with config: {:?}", cfg);

    // --- Storage client, shared by every handler ---
    let storage = services::s3_storage::S3Storage::connect(&cfg).await;
    let state = state::AppState::new(Arc::new(storage));

    // --- Build router ---
    let app: Router = routes::routes::routes(&cfg.public_dir)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        "Pet listing on http://{} (bucket `{}`, region {})",
        listener.local_addr()?,
        cfg.bucket,
        cfg.region
    );
    axum::serve(listener, app).await?;

    Ok(())
}
