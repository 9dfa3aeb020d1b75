//! Reading store backed by the `sensor_readings` table.
//!
//! Rows are only ever appended. Windows come back newest-first and already
//! truncated, which is the order the statistics and anomaly passes expect.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::Reading;

// ---

/// Filter for one analytics window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowQuery {
    // ---
    pub device_id: Option<String>,
    /// Inclusive lower bound on `recorded_at`.
    pub since: Option<DateTime<Utc>>,
    pub limit: u32,
}

/// Append a reading and return its row id.
pub async fn insert_reading(pool: &PgPool, reading: &Reading) -> Result<Uuid, sqlx::Error> {
    // ---
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO sensor_readings (
            id, device_id, recorded_at,
            soil_temp_c, soil_moisture_pct, ir_temp_c,
            rainfall_hourly_mm, rainfall_total_mm,
            soil_temp_1_c, soil_temp_2_c, soil_temp_3_c,
            soil_moisture_1_pct, soil_moisture_2_pct, soil_moisture_3_pct,
            ir_temp_1_c, ir_temp_2_c,
            software_date, version
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9,
            $10, $11, $12, $13, $14, $15, $16, $17, $18
        )
        "#,
    )
    .bind(id)
    .bind(&reading.device_id)
    .bind(reading.timestamp)
    .bind(reading.soil_temp_c)
    .bind(reading.soil_moisture_pct)
    .bind(reading.ir_temp_c)
    .bind(reading.rainfall_hourly_mm)
    .bind(reading.rainfall_total_mm)
    .bind(reading.soil_temp_1_c)
    .bind(reading.soil_temp_2_c)
    .bind(reading.soil_temp_3_c)
    .bind(reading.soil_moisture_1_pct)
    .bind(reading.soil_moisture_2_pct)
    .bind(reading.soil_moisture_3_pct)
    .bind(reading.ir_temp_1_c)
    .bind(reading.ir_temp_2_c)
    .bind(&reading.software_date)
    .bind(&reading.version)
    .execute(pool)
    .await?;

    debug!(%id, device_id = %reading.device_id, "stored reading");
    Ok(id)
}

/// Fetch a newest-first window. Undated rows sort last.
pub async fn fetch_window(pool: &PgPool, query: &WindowQuery) -> Result<Vec<Reading>, sqlx::Error> {
    // ---
    let readings = sqlx::query_as::<_, Reading>(
        r#"
        SELECT
            device_id, recorded_at,
            soil_temp_c, soil_moisture_pct, ir_temp_c,
            rainfall_hourly_mm, rainfall_total_mm,
            soil_temp_1_c, soil_temp_2_c, soil_temp_3_c,
            soil_moisture_1_pct, soil_moisture_2_pct, soil_moisture_3_pct,
            ir_temp_1_c, ir_temp_2_c,
            software_date, version
        FROM sensor_readings
        WHERE ($1::TEXT IS NULL OR device_id = $1)
          AND ($2::TIMESTAMPTZ IS NULL OR recorded_at >= $2)
        ORDER BY recorded_at DESC NULLS LAST
        LIMIT $3
        "#,
    )
    .bind(&query.device_id)
    .bind(query.since)
    .bind(i64::from(query.limit))
    .fetch_all(pool)
    .await?;

    debug!(
        rows = readings.len(),
        device_id = ?query.device_id,
        since = ?query.since,
        "fetched reading window"
    );
    Ok(readings)
}
