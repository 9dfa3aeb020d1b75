//! Route gateway: merges every sibling subrouter and applies shared layers.

use axum::http::{header, HeaderName, Method};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::Config;

mod health;
mod sensor_data;

// ---

pub fn router(pool: PgPool, config: Config) -> Router {
    // ---
    // Dashboards are served from other origins; preflight is answered here
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-api-key")]);

    Router::new()
        .merge(sensor_data::router())
        .merge(health::router())
        .layer(cors)
        .with_state((pool, config))
}
