//! Defines the HTTP surface of the pet listing.
//!
//! - `GET  /`         — listing page with upload form
//! - `POST /pets`     — multipart submission of a new pet (photo ≤ 5 MiB)
//! - `GET  /healthz`  — liveness
//! - `GET  /readyz`   — readiness (bucket reachable)
//!
//! Anything else falls through to the static files in the public directory.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        pet_handlers::{UPLOAD_BODY_LIMIT, create_pet, list_pets},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeDir;

/// Build the router for all pet routes.
///
/// The router carries shared state (`AppState`) to all handlers; the body
/// limit applies only to uploads.
pub fn routes(public_dir: &str) -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/", get(list_pets))
        .route(
            "/pets",
            post(create_pet).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .fallback_service(ServeDir::new(public_dir))
}
