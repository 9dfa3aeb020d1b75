//! Time-aware analytics: hourly trends, watering forecast, heat stress and
//! growing degree days.
//!
//! Unlike the summary passes these need real chronology, so the window is
//! copied into [`Point`]s and sorted ascending before anything is computed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::Thresholds;
use crate::models::Reading;

mod gdd;
mod heat_stress;
mod trend;
mod watering;

pub use gdd::{estimate_growth_stage, DailyGdd, GrowingDegreeDays, GrowthStage};
pub use heat_stress::{CanopyStatus, HeatStress, HeatStressEvent, StressLevel};
pub use trend::{HourlyBucket, TrendAnalysis};
pub use watering::{watering_recommendation, PredictiveWatering, Urgency};

// ---

/// One reading reduced to what the time-aware passes need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point {
    pub at: DateTime<Utc>,
    pub soil_temp: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub ir_temp: Option<f64>,
}

impl Point {
    fn from_reading(reading: &Reading, now: DateTime<Utc>) -> Self {
        Self {
            at: reading.timestamp.unwrap_or(now),
            soil_temp: reading.soil_temp_c,
            soil_moisture: reading.soil_moisture_pct,
            ir_temp: reading.ir_temp_c,
        }
    }
}

/// The `advanced_analytics` block of a dashboard report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedReport {
    // ---
    pub trend_analysis: TrendAnalysis,
    /// Absent when no reading in the window observed soil moisture.
    pub predictive_watering: Option<PredictiveWatering>,
    pub heat_stress: HeatStress,
    pub growing_degree_days: GrowingDegreeDays,
}

/// Build the advanced report for a window in any order.
///
/// Readings without a timestamp are placed at `now`. Returns `None` when the
/// window holds fewer than [`Thresholds::advanced_min_window`] readings.
pub fn compute_advanced_analytics(
    window: &[Reading],
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> Option<AdvancedReport> {
    // ---
    if window.len() < thresholds.advanced_min_window {
        return None;
    }

    let undated = window.iter().filter(|r| r.timestamp.is_none()).count();
    if undated > 0 {
        debug!(undated, "placing undated readings at current time");
    }

    let mut points: Vec<Point> = window.iter().map(|r| Point::from_reading(r, now)).collect();
    points.sort_by_key(|p| p.at);

    Some(AdvancedReport {
        trend_analysis: trend::analyze(&points, thresholds),
        predictive_watering: watering::predict(&points, thresholds),
        heat_stress: heat_stress::analyze(&points, thresholds),
        growing_degree_days: gdd::accumulate(&points, thresholds),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    // ---
    use super::*;
    use chrono::{Duration, TimeZone};

    pub(crate) fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 6, 0, 0).unwrap()
    }

    pub(crate) fn point(hours: i64, soil: f64, moisture: f64, ir: f64) -> Point {
        Point {
            at: base_time() + Duration::hours(hours),
            soil_temp: Some(soil),
            soil_moisture: Some(moisture),
            ir_temp: Some(ir),
        }
    }

    fn reading(at: Option<DateTime<Utc>>, soil: f64, moisture: f64, ir: f64) -> Reading {
        Reading {
            device_id: "node-a".to_string(),
            timestamp: at,
            soil_temp_c: Some(soil),
            soil_moisture_pct: Some(moisture),
            ir_temp_c: Some(ir),
            ..Reading::default()
        }
    }

    #[test]
    fn test_short_window_has_no_report() {
        // ---
        let window = vec![
            reading(Some(base_time()), 15.0, 50.0, 18.0),
            reading(Some(base_time()), 15.0, 50.0, 18.0),
        ];
        assert!(compute_advanced_analytics(&window, base_time(), &Thresholds::default()).is_none());
    }

    #[test]
    fn test_window_is_sorted_without_touching_input() {
        // ---
        // newest-first, as the store returns it
        let window = vec![
            reading(Some(base_time() + Duration::hours(2)), 16.0, 40.0, 30.0),
            reading(Some(base_time() + Duration::hours(1)), 15.0, 45.0, 16.0),
            reading(Some(base_time()), 14.0, 50.0, 15.0),
        ];
        let snapshot = window.clone();

        let report =
            compute_advanced_analytics(&window, base_time(), &Thresholds::default()).unwrap();

        assert_eq!(window, snapshot);
        let watering = report.predictive_watering.unwrap();
        assert_eq!(watering.current_moisture, 40.0);
        assert_eq!(watering.depletion_rate, -5.0);
        assert_eq!(report.heat_stress.current_status, CanopyStatus::Severe);
    }

    #[test]
    fn test_undated_readings_are_placed_at_now() {
        // ---
        let now = base_time() + Duration::hours(10);
        let window = vec![
            reading(None, 20.0, 35.0, 20.0),
            reading(Some(base_time() + Duration::hours(5)), 20.0, 60.0, 20.0),
            reading(Some(base_time()), 20.0, 70.0, 20.0),
        ];

        let report = compute_advanced_analytics(&window, now, &Thresholds::default()).unwrap();
        let watering = report.predictive_watering.unwrap();

        // the undated reading is treated as the latest one
        assert_eq!(watering.current_moisture, 35.0);
        assert_eq!(watering.depletion_rate, -3.5);
    }

    #[test]
    fn test_report_is_idempotent() {
        // ---
        let window = vec![
            reading(Some(base_time() + Duration::hours(30)), 22.0, 41.0, 29.0),
            reading(Some(base_time() + Duration::hours(3)), 18.0, 48.0, 21.0),
            reading(Some(base_time()), 12.0, 55.0, 14.0),
        ];
        let t = Thresholds::default();

        let first = compute_advanced_analytics(&window, base_time(), &t);
        let second = compute_advanced_analytics(&window, base_time(), &t);
        assert_eq!(first, second);
    }
}
