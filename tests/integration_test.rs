//! Live-service tests. Start the service against a scratch database, then:
//!
//! ```text
//! BASE_URL=http://localhost:8080 cargo test --test integration_test -- --ignored
//! ```
//!
//! When the service runs with `INGEST_API_KEY`, export the same value here.

use anyhow::Result;
use reqwest::Client;
use serde_json::{json, Value};

// ---

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into())
}

fn with_key(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match std::env::var("INGEST_API_KEY") {
        Ok(key) => request.header("x-api-key", key),
        Err(_) => request,
    }
}

#[tokio::test]
#[ignore = "requires a running agriflow service"]
async fn health_is_ok() -> Result<()> {
    // ---
    let body: Value = Client::new()
        .get(format!("{}/health", base_url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running agriflow service"]
async fn ingest_then_report() -> Result<()> {
    // ---
    let client = Client::new();
    let device = format!("itest-{}", uuid::Uuid::new_v4());

    for (i, moisture) in [52.0, 50.0, 48.0, 46.0, 44.0].iter().enumerate() {
        let response = with_key(client.post(format!("{}/sensor-data", base_url())))
            .json(&json!({
                "deviceId": device,
                "version": "3.1",
                "sensors": {
                    "soilTemperature1": 18.0 + i as f64,
                    "soilMoisture1": moisture,
                    "irTemperature1": 21.0,
                    "rainfallHourly": 0.0
                }
            }))
            .send()
            .await?;
        assert!(response.status().is_success(), "ingest failed: {}", response.status());
    }

    let report: Value = client
        .get(format!("{}/sensor-data?device_id={}&limit=10", base_url(), device))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(report["readings_count"], 5);
    assert_eq!(report["system"]["device_id"], device.as_str());
    assert_eq!(report["live"]["soil_moisture"], 44.0);
    assert_eq!(report["history"]["soil_moistures"][0], 52.0);
    assert_eq!(report["analytics"]["soil_temp"]["trend"], "rising");
    assert!(report["advanced_analytics"]["growing_degree_days"].is_object());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running agriflow service"]
async fn empty_upload_is_rejected() -> Result<()> {
    // ---
    let response = with_key(Client::new().post(format!("{}/sensor-data", base_url())))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await?;
    assert_eq!(body["status"], "error");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running agriflow service"]
async fn unknown_device_has_empty_report() -> Result<()> {
    // ---
    let report: Value = Client::new()
        .get(format!(
            "{}/sensor-data?device_id=never-seen&hours=24",
            base_url()
        ))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(report["readings_count"], 0);
    assert!(report["analytics"].is_null());
    assert!(report["advanced_analytics"].is_null());
    assert_eq!(report["time_range"]["label"], "Last 24 hours");
    Ok(())
}
