// src/routes/sensor_data.rs
//! Ingest and dashboard endpoints for field-node readings.
//!
//! - `POST /sensor-data` normalizes a node upload and appends it to the store.
//! - `GET /sensor-data` loads a newest-first window and returns the full
//!   dashboard report (live snapshot, history, analytics).
//!
//! Sibling module under the `routes` gateway (EMBP); only [`router`] is
//! exported.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::IngestPayload;
use crate::report::{build_dashboard, DashboardReport, TimeRange};
use crate::store::{self, WindowQuery};
use crate::Config;

// ---

/// Header carrying the node's shared ingest key.
const API_KEY_HEADER: &str = "x-api-key";

pub fn router() -> Router<(PgPool, Config)> {
    // ---
    Router::new().route("/sensor-data", get(dashboard).post(ingest))
}

async fn ingest(
    State((pool, config)): State<(PgPool, Config)>,
    headers: HeaderMap,
    payload: Result<Json<IngestPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // ---
    authorize(&headers, config.ingest_api_key.as_deref())?;

    let Json(payload) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid JSON data: {}", e.body_text())))?;
    if payload.is_empty() {
        return Err(ApiError::BadRequest("Expected JSON data".to_string()));
    }

    let reading = payload.into_reading(Utc::now());
    let id = store::insert_reading(&pool, &reading).await?;
    info!(%id, device_id = %reading.device_id, "POST /sensor-data - reading ingested");

    Ok(Json(json!({
        "status": "success",
        "message": "Data ingested successfully"
    })))
}

/// Query parameters for `GET /sensor-data`.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    device_id: Option<String>,
    limit: Option<u32>,
    /// Look-back in hours; anything that is not a whole number is ignored.
    hours: Option<String>,
}

async fn dashboard(
    query: Result<Query<DashboardQuery>, QueryRejection>,
    State((pool, config)): State<(PgPool, Config)>,
) -> Result<Json<DashboardReport>, ApiError> {
    // ---
    let params = dashboard_params(query)?;
    debug!("GET /sensor-data - {:?}", params);

    let now = Utc::now();
    let hours = params.hours.as_deref().and_then(|h| h.trim().parse::<u32>().ok());
    let time_range = TimeRange::new(hours, now);

    let query = WindowQuery {
        device_id: params.device_id,
        since: time_range.from,
        limit: resolve_limit(params.limit, config.default_window, config.max_window),
    };
    let window = store::fetch_window(&pool, &query).await?;

    let report = build_dashboard(&window, time_range, now, &config.thresholds);
    info!(
        readings = report.readings_count,
        anomalies = report.anomalies.len(),
        "GET /sensor-data - report built"
    );
    Ok(Json(report))
}

fn dashboard_params(
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<DashboardQuery, ApiError> {
    // ---
    let Query(params) = query
        .map_err(|e| ApiError::BadRequest(format!("Invalid query parameters: {}", e.body_text())))?;
    Ok(params)
}

/// Requested window size, defaulted and capped.
fn resolve_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max.max(1))
}

/// Check the shared ingest key when one is configured.
fn authorize(headers: &HeaderMap, expected: Option<&str>) -> Result<(), ApiError> {
    // ---
    let Some(expected) = expected else {
        return Ok(());
    };
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(key) if key == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
