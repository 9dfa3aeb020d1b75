//! Dashboard report assembly.
//!
//! Combines the latest reading, the chronological history, and every
//! analytics pass into the single JSON document served by
//! `GET /sensor-data`. The dashboard front-end renders this shape directly.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::analytics::{
    compute_advanced_analytics, compute_analytics, compute_insights, detect_anomalies,
    AdvancedReport, AnalyticsSummary, Anomaly, Insight, Thresholds,
};
use crate::models::{c_to_f, Reading};

// ---

/// Requested look-back, echoed in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    // ---
    pub hours: Option<u32>,
    pub from: Option<DateTime<Utc>>,
    pub label: String,
}

/// Longest look-back honoured; anything beyond it already covers every row.
pub const MAX_LOOKBACK_HOURS: u32 = 24 * 366 * 100;

impl TimeRange {
    /// Window ending at `now`, or the whole history when `hours` is `None`
    /// or exceeds [`MAX_LOOKBACK_HOURS`].
    pub fn new(hours: Option<u32>, now: DateTime<Utc>) -> Self {
        // ---
        let start = hours
            .filter(|h| *h <= MAX_LOOKBACK_HOURS)
            .and_then(|h| Duration::try_hours(i64::from(h)).map(|d| (h, d)))
            .and_then(|(h, d)| now.checked_sub_signed(d).map(|from| (h, from)));

        match start {
            Some((h, from)) => Self {
                hours: Some(h),
                from: Some(from),
                label: format!("Last {h} hours"),
            },
            None => Self {
                hours: None,
                from: None,
                label: "All data".to_string(),
            },
        }
    }
}

/// Most recent reading with Fahrenheit conversions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveSnapshot {
    // ---
    pub soil_temp_c: Option<f64>,
    pub soil_temp_f: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub ir_object_temp_c: Option<f64>,
    pub ir_object_temp_f: Option<f64>,
    pub rainfall_hourly: Option<f64>,
    pub rainfall_total: Option<f64>,
    pub soil_temp_1_c: Option<f64>,
    pub soil_temp_2_c: Option<f64>,
    pub soil_temp_3_c: Option<f64>,
    pub soil_moisture_1: Option<f64>,
    pub soil_moisture_2: Option<f64>,
    pub soil_moisture_3: Option<f64>,
    pub ir_temp_1_c: Option<f64>,
    pub ir_temp_2_c: Option<f64>,
}

impl From<&Reading> for LiveSnapshot {
    fn from(r: &Reading) -> Self {
        Self {
            soil_temp_c: r.soil_temp_c,
            soil_temp_f: r.soil_temp_c.map(c_to_f),
            soil_moisture: r.soil_moisture_pct,
            ir_object_temp_c: r.ir_temp_c,
            ir_object_temp_f: r.ir_temp_c.map(c_to_f),
            rainfall_hourly: r.rainfall_hourly_mm,
            rainfall_total: r.rainfall_total_mm,
            soil_temp_1_c: r.soil_temp_1_c,
            soil_temp_2_c: r.soil_temp_2_c,
            soil_temp_3_c: r.soil_temp_3_c,
            soil_moisture_1: r.soil_moisture_1_pct,
            soil_moisture_2: r.soil_moisture_2_pct,
            soil_moisture_3: r.soil_moisture_3_pct,
            ir_temp_1_c: r.ir_temp_1_c,
            ir_temp_2_c: r.ir_temp_2_c,
        }
    }
}

/// Which probes reported in the latest reading, keyed by hardware part.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorStatus {
    // ---
    pub rainfall_available: bool,
    pub mlx90614_available: bool,
    pub mlx90614_2_available: bool,
    pub ds18b20_available: bool,
    pub ds18b20_2_available: bool,
    pub ds18b20_3_available: bool,
    pub soil_moisture_available: bool,
    pub soil_moisture_2_available: bool,
    pub soil_moisture_3_available: bool,
}

impl From<&Reading> for SensorStatus {
    fn from(r: &Reading) -> Self {
        Self {
            rainfall_available: r.rainfall_hourly_mm.is_some(),
            mlx90614_available: r.ir_temp_1_c.is_some(),
            mlx90614_2_available: r.ir_temp_2_c.is_some(),
            ds18b20_available: r.soil_temp_1_c.is_some(),
            ds18b20_2_available: r.soil_temp_2_c.is_some(),
            ds18b20_3_available: r.soil_temp_3_c.is_some(),
            soil_moisture_available: r.soil_moisture_1_pct.is_some(),
            soil_moisture_2_available: r.soil_moisture_2_pct.is_some(),
            soil_moisture_3_available: r.soil_moisture_3_pct.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    // ---
    pub device_model: &'static str,
    pub device_id: String,
    pub version: Option<String>,
}

/// Oldest-first series for the dashboard charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    // ---
    /// `HH:MM`, empty when the reading has no timestamp.
    pub timestamps: Vec<String>,
    pub datetimes: Vec<Option<DateTime<Utc>>>,
    pub soil_temps: Vec<Option<f64>>,
    pub soil_temp_1: Vec<Option<f64>>,
    pub soil_temp_2: Vec<Option<f64>>,
    pub soil_temp_3: Vec<Option<f64>>,
    pub soil_moistures: Vec<Option<f64>>,
    pub soil_moisture_1: Vec<Option<f64>>,
    pub soil_moisture_2: Vec<Option<f64>>,
    pub soil_moisture_3: Vec<Option<f64>>,
    pub ir_temps: Vec<Option<f64>>,
    pub ir_temp_1: Vec<Option<f64>>,
    pub ir_temp_2: Vec<Option<f64>>,
    pub rainfall: Vec<Option<f64>>,
}

impl History {
    fn from_newest_first(window: &[Reading]) -> Self {
        // ---
        let mut history = Self::default();
        for r in window.iter().rev() {
            history.timestamps.push(
                r.timestamp
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_default(),
            );
            history.datetimes.push(r.timestamp);
            history.soil_temps.push(r.soil_temp_c);
            history.soil_temp_1.push(r.soil_temp_1_c);
            history.soil_temp_2.push(r.soil_temp_2_c);
            history.soil_temp_3.push(r.soil_temp_3_c);
            history.soil_moistures.push(r.soil_moisture_pct);
            history.soil_moisture_1.push(r.soil_moisture_1_pct);
            history.soil_moisture_2.push(r.soil_moisture_2_pct);
            history.soil_moisture_3.push(r.soil_moisture_3_pct);
            history.ir_temps.push(r.ir_temp_c);
            history.ir_temp_1.push(r.ir_temp_1_c);
            history.ir_temp_2.push(r.ir_temp_2_c);
            history.rainfall.push(r.rainfall_hourly_mm);
        }
        history
    }
}

/// Full response body of `GET /sensor-data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    // ---
    pub live: LiveSnapshot,
    pub status: SensorStatus,
    pub system: SystemInfo,
    pub history: History,
    pub analytics: Option<AnalyticsSummary>,
    pub anomalies: Vec<Anomaly>,
    pub insights: Vec<Insight>,
    pub advanced_analytics: Option<AdvancedReport>,
    pub readings_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub time_range: TimeRange,
}

/// Assemble the report for a newest-first window.
pub fn build_dashboard(
    window: &[Reading],
    time_range: TimeRange,
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> DashboardReport {
    // ---
    let latest = window.first();

    let analytics = compute_analytics(window, thresholds);
    let anomalies = detect_anomalies(window, thresholds);
    let insights = analytics
        .as_ref()
        .map(|summary| compute_insights(summary, thresholds))
        .unwrap_or_default();
    let advanced_analytics = compute_advanced_analytics(window, now, thresholds);

    DashboardReport {
        live: latest.map(LiveSnapshot::from).unwrap_or_default(),
        status: latest.map(SensorStatus::from).unwrap_or_default(),
        system: SystemInfo {
            device_model: "Cloud Service",
            device_id: latest
                .map(|r| r.device_id.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            version: latest.and_then(|r| r.version.clone()),
        },
        history: History::from_newest_first(window),
        analytics,
        anomalies,
        insights,
        advanced_analytics,
        readings_count: window.len(),
        last_updated: latest.and_then(|r| r.timestamp),
        time_range,
    }
}
