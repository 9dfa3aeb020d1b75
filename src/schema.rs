//! Database schema management for `agriflow`.
//!
//! Ensures the reading table and its indexes exist before serving requests.
//! Applied once on startup from `main.rs` (EMBP: single gateway call).

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates the append-only `sensor_readings` table. Every measurement column
/// is nullable: NULL records a probe that reported nothing, which is distinct
/// from a stored zero.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_readings (
            id                  UUID PRIMARY KEY,
            device_id           TEXT        NOT NULL,
            recorded_at         TIMESTAMPTZ,
            soil_temp_c         DOUBLE PRECISION,
            soil_moisture_pct   DOUBLE PRECISION,
            ir_temp_c           DOUBLE PRECISION,
            rainfall_hourly_mm  DOUBLE PRECISION,
            rainfall_total_mm   DOUBLE PRECISION,
            soil_temp_1_c       DOUBLE PRECISION,
            soil_temp_2_c       DOUBLE PRECISION,
            soil_temp_3_c       DOUBLE PRECISION,
            soil_moisture_1_pct DOUBLE PRECISION,
            soil_moisture_2_pct DOUBLE PRECISION,
            soil_moisture_3_pct DOUBLE PRECISION,
            ir_temp_1_c         DOUBLE PRECISION,
            ir_temp_2_c         DOUBLE PRECISION,
            software_date       TEXT,
            version             TEXT
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Window queries filter by device and walk newest-first
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_device_time
            ON sensor_readings (device_id, recorded_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_readings_recorded_at
            ON sensor_readings (recorded_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
