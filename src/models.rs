//! Data models for the agricultural sensor pipeline.
//!
//! [`IngestPayload`] is what a field node uploads; [`Reading`] is the stored,
//! normalized row that the analytics engine consumes. Every numeric field on
//! a [`Reading`] is an `Option<f64>`: `None` means the probe produced no
//! observation, while `Some(0.0)` is a genuine zero reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// One stored sensor snapshot for a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub device_id: String,
    #[sqlx(rename = "recorded_at")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Mean of the present soil temperature probes.
    pub soil_temp_c: Option<f64>,
    /// Mean of the present soil moisture probes, 0–100.
    pub soil_moisture_pct: Option<f64>,
    /// Mean of the present infrared (canopy) probes.
    pub ir_temp_c: Option<f64>,
    pub rainfall_hourly_mm: Option<f64>,
    pub rainfall_total_mm: Option<f64>,

    pub soil_temp_1_c: Option<f64>,
    pub soil_temp_2_c: Option<f64>,
    pub soil_temp_3_c: Option<f64>,
    pub soil_moisture_1_pct: Option<f64>,
    pub soil_moisture_2_pct: Option<f64>,
    pub soil_moisture_3_pct: Option<f64>,
    pub ir_temp_1_c: Option<f64>,
    pub ir_temp_2_c: Option<f64>,

    pub software_date: Option<String>,
    pub version: Option<String>,
}

/// Per-probe values nested under `sensors` in the upload body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSensors {
    // ---
    pub soil_temperature1: Option<f64>,
    pub soil_temperature2: Option<f64>,
    pub soil_temperature3: Option<f64>,
    pub soil_moisture1: Option<f64>,
    pub soil_moisture2: Option<f64>,
    pub soil_moisture3: Option<f64>,
    pub ir_temperature1: Option<f64>,
    pub ir_temperature2: Option<f64>,
    pub rainfall_total: Option<f64>,
    pub rainfall_hourly: Option<f64>,
}

/// Upload body posted by a field node.
///
/// Older firmware sends flat, human-labelled keys instead of the nested
/// `sensors` object; both shapes are accepted and the nested values win.
#[derive(Debug, Default, Deserialize)]
pub struct IngestPayload {
    // ---
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
    #[serde(rename = "ID")]
    pub legacy_id: Option<String>,
    #[serde(rename = "softwareDate", alias = "software_date")]
    pub software_date: Option<String>,
    pub version: Option<String>,
    pub sensors: Option<IngestSensors>,

    #[serde(rename = "Soil Temperature (C)")]
    pub legacy_soil_temp_c: Option<f64>,
    #[serde(rename = "Soil Moisture (%)")]
    pub legacy_soil_moisture_pct: Option<f64>,
    #[serde(rename = "IR Temperature (C)")]
    pub legacy_ir_temp_c: Option<f64>,
    #[serde(rename = "Rainfall Total (mm)")]
    pub legacy_rainfall_total_mm: Option<f64>,
    #[serde(rename = "Rainfall Hourly (mm)")]
    pub legacy_rainfall_hourly_mm: Option<f64>,
}

impl IngestPayload {
    // ---
    /// Device id used when the node does not identify itself.
    pub const UNKNOWN_DEVICE: &'static str = "unknown_device";

    /// True when the body carried no recognizable field at all.
    pub fn is_empty(&self) -> bool {
        // ---
        self.device_id.is_none()
            && self.legacy_id.is_none()
            && self.software_date.is_none()
            && self.version.is_none()
            && self.sensors.is_none()
            && self.legacy_soil_temp_c.is_none()
            && self.legacy_soil_moisture_pct.is_none()
            && self.legacy_ir_temp_c.is_none()
            && self.legacy_rainfall_total_mm.is_none()
            && self.legacy_rainfall_hourly_mm.is_none()
    }

    /// Normalize the upload into a storable [`Reading`] stamped with the
    /// server receive time.
    pub fn into_reading(self, received_at: DateTime<Utc>) -> Reading {
        // ---
        let sensors = self.sensors.unwrap_or_default();

        let soil_temp_1 = sensors.soil_temperature1.or(self.legacy_soil_temp_c);
        let soil_temps = [
            soil_temp_1,
            sensors.soil_temperature2,
            sensors.soil_temperature3,
        ];

        let soil_moisture_1 = sensors.soil_moisture1.or(self.legacy_soil_moisture_pct);
        let soil_moistures = [
            soil_moisture_1,
            sensors.soil_moisture2,
            sensors.soil_moisture3,
        ];

        let ir_temp_1 = sensors.ir_temperature1.or(self.legacy_ir_temp_c);
        let ir_temps = [ir_temp_1, sensors.ir_temperature2];

        let device_id = self
            .device_id
            .or(self.legacy_id)
            .unwrap_or_else(|| Self::UNKNOWN_DEVICE.to_string());

        Reading {
            device_id,
            timestamp: Some(received_at),
            soil_temp_c: probe_mean(&soil_temps).map(round1),
            soil_moisture_pct: probe_mean(&soil_moistures).map(round1),
            ir_temp_c: probe_mean(&ir_temps).map(round1),
            rainfall_hourly_mm: sensors.rainfall_hourly.or(self.legacy_rainfall_hourly_mm),
            rainfall_total_mm: sensors.rainfall_total.or(self.legacy_rainfall_total_mm),
            soil_temp_1_c: soil_temps[0].map(round1),
            soil_temp_2_c: soil_temps[1].map(round1),
            soil_temp_3_c: soil_temps[2].map(round1),
            soil_moisture_1_pct: soil_moistures[0].map(round1),
            soil_moisture_2_pct: soil_moistures[1].map(round1),
            soil_moisture_3_pct: soil_moistures[2].map(round1),
            ir_temp_1_c: ir_temps[0].map(round1),
            ir_temp_2_c: ir_temps[1].map(round1),
            software_date: self.software_date,
            version: self.version,
        }
    }
}

/// Mean of the probes that reported a value.
fn probe_mean(probes: &[Option<f64>]) -> Option<f64> {
    // ---
    let present: Vec<f64> = probes.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Celsius to Fahrenheit.
pub fn c_to_f(temp_c: f64) -> f64 {
    temp_c * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_nested_sensors_are_averaged() {
        // ---
        let payload: IngestPayload = serde_json::from_value(serde_json::json!({
            "deviceId": "pico-field-1",
            "version": "3.1",
            "sensors": {
                "soilTemperature1": 18.0,
                "soilTemperature2": 20.0,
                "soilTemperature3": 22.0,
                "soilMoisture1": 40.0,
                "soilMoisture2": 45.0,
                "irTemperature1": 25.0,
                "irTemperature2": 26.0,
                "rainfallHourly": 1.2,
                "rainfallTotal": 8.4
            }
        }))
        .unwrap();

        let reading = payload.into_reading(received_at());

        assert_eq!(reading.device_id, "pico-field-1");
        assert_eq!(reading.timestamp, Some(received_at()));
        assert_eq!(reading.soil_temp_c, Some(20.0));
        assert_eq!(reading.soil_moisture_pct, Some(42.5));
        assert_eq!(reading.ir_temp_c, Some(25.5));
        assert_eq!(reading.soil_moisture_3_pct, None);
        assert_eq!(reading.rainfall_hourly_mm, Some(1.2));
        assert_eq!(reading.rainfall_total_mm, Some(8.4));
        assert_eq!(reading.version.as_deref(), Some("3.1"));
    }

    #[test]
    fn test_absent_probes_do_not_drag_average() {
        // ---
        let payload: IngestPayload = serde_json::from_value(serde_json::json!({
            "deviceId": "pico-field-1",
            "sensors": { "soilTemperature1": 0.0, "soilTemperature3": 4.0 }
        }))
        .unwrap();

        let reading = payload.into_reading(received_at());

        // A genuine 0.0 probe counts, a missing one does not
        assert_eq!(reading.soil_temp_c, Some(2.0));
        assert_eq!(reading.soil_temp_2_c, None);
        assert_eq!(reading.soil_moisture_pct, None);
        assert_eq!(reading.ir_temp_c, None);
    }

    #[test]
    fn test_legacy_flat_keys() {
        // ---
        let payload: IngestPayload = serde_json::from_value(serde_json::json!({
            "ID": "legacy-node",
            "software_date": "2024-11-02",
            "Soil Temperature (C)": 14.26,
            "Soil Moisture (%)": 33.0,
            "IR Temperature (C)": 19.0,
            "Rainfall Hourly (mm)": 0.0
        }))
        .unwrap();

        let reading = payload.into_reading(received_at());

        assert_eq!(reading.device_id, "legacy-node");
        assert_eq!(reading.software_date.as_deref(), Some("2024-11-02"));
        assert_eq!(reading.soil_temp_c, Some(14.3));
        assert_eq!(reading.soil_temp_1_c, Some(14.3));
        assert_eq!(reading.soil_moisture_pct, Some(33.0));
        assert_eq!(reading.ir_temp_c, Some(19.0));
        assert_eq!(reading.rainfall_hourly_mm, Some(0.0));
    }

    #[test]
    fn test_unknown_device_and_empty_payload() {
        // ---
        let empty: IngestPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.is_empty());

        let reading = empty.into_reading(received_at());
        assert_eq!(reading.device_id, IngestPayload::UNKNOWN_DEVICE);
        assert_eq!(reading.soil_temp_c, None);
    }

    #[test]
    fn test_metadata_only_payload_is_stored() {
        // ---
        let payload: IngestPayload = serde_json::from_value(serde_json::json!({
            "version": "3.1",
            "softwareDate": "2025-01-01"
        }))
        .unwrap();
        assert!(!payload.is_empty());

        let reading = payload.into_reading(received_at());
        assert_eq!(reading.device_id, IngestPayload::UNKNOWN_DEVICE);
        assert_eq!(reading.version.as_deref(), Some("3.1"));
        assert_eq!(reading.software_date.as_deref(), Some("2025-01-01"));
        assert_eq!(reading.soil_moisture_pct, None);
    }

    #[test]
    fn test_fahrenheit_conversion() {
        // ---
        assert_eq!(c_to_f(0.0), 32.0);
        assert_eq!(c_to_f(100.0), 212.0);
        assert!((c_to_f(22.4) - 72.32).abs() < 1e-9);
    }
}
