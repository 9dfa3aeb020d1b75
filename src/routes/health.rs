// src/routes/health.rs
//! Liveness endpoint for the agriflow service.
//!
//! Used by container orchestrators and uptime probes to confirm the process
//! answers HTTP. It never touches the database, so a slow or unavailable
//! store does not cause restarts.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Debug, Serialize, PartialEq)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Handle `GET /health`.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Subrouter with the `/health` route, generic over the gateway's state.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
