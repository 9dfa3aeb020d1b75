//! Analytics engine for agricultural sensor windows.
//!
//! Every function in this module tree is pure: it borrows a window of
//! [`Reading`]s, never mutates it, and derives a fresh report. Data-quality
//! problems (too few samples, zero spread, missing timestamps or values) are
//! absorbed here and surface as neutral or absent results, never as errors.
//!
//! Windows handed to [`compute_analytics`] and [`detect_anomalies`] are
//! newest-first, as returned by the reading store.
//! [`compute_advanced_analytics`] accepts any order and sorts its own copy.
//!
//! Follows the Explicit Module Boundary Pattern (EMBP): siblings are private
//! and this gateway re-exports what callers need.

use crate::models::Reading;

mod advanced;
mod anomaly;
mod insights;
mod stats;

pub use advanced::{
    compute_advanced_analytics, estimate_growth_stage, watering_recommendation, AdvancedReport,
    CanopyStatus, DailyGdd, GrowingDegreeDays, GrowthStage, HeatStress, HeatStressEvent,
    HourlyBucket, PredictiveWatering, StressLevel, TrendAnalysis, Urgency,
};
pub use anomaly::{detect_anomalies, Anomaly, AnomalyKind, Direction, Severity};
pub use insights::{compute_insights, Insight, InsightKind};
pub use stats::{
    compute_analytics, summarize_field, summarize_rainfall, AnalyticsSummary, FieldStats,
    RainfallStats, Trend,
};

// ---

/// Tunable cutoffs used across the engine.
///
/// `Default` carries the agronomic profile the field nodes were calibrated
/// against; tests and alternate crops can inject their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    // ---
    /// Minimum observations for a field summary.
    pub stats_min_samples: usize,
    /// Half-window mean shift, in standard deviations, that counts as a trend.
    pub trend_std_factor: f64,

    /// Minimum window length before anomaly detection runs.
    pub anomaly_min_window: usize,
    /// |z| above which the latest reading is flagged.
    pub z_score_warning: f64,
    /// |z| at or above which a flag becomes critical.
    pub z_score_critical: f64,
    /// Percent change between the two latest readings that is reported.
    pub sudden_change_pct: f64,

    pub moisture_low_pct: f64,
    pub moisture_high_pct: f64,
    /// Canopy minus soil temperature above which plants are heat-stressed.
    pub heat_stress_diff_c: f64,
    pub moderate_stress_diff_c: f64,
    pub severe_stress_diff_c: f64,
    /// Canopy minus soil temperature below which the canopy is cooling.
    pub cool_canopy_diff_c: f64,
    pub significant_rainfall_mm: f64,

    /// Minimum window length for the advanced report.
    pub advanced_min_window: usize,
    pub hourly_bucket_limit: usize,
    pub recent_stress_events: usize,

    pub moisture_critical_pct: f64,
    pub moisture_dry_pct: f64,
    /// Depletion rate (%/h) considered fast.
    pub fast_depletion_rate: f64,
    /// Projections further out than this are not reported.
    pub prediction_horizon_hours: f64,

    pub gdd_base_temp_c: f64,
    pub gdd_report_days: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stats_min_samples: 2,
            trend_std_factor: 0.5,
            anomaly_min_window: 5,
            z_score_warning: 2.5,
            z_score_critical: 3.0,
            sudden_change_pct: 20.0,
            moisture_low_pct: 30.0,
            moisture_high_pct: 70.0,
            heat_stress_diff_c: 5.0,
            moderate_stress_diff_c: 7.0,
            severe_stress_diff_c: 10.0,
            cool_canopy_diff_c: -3.0,
            significant_rainfall_mm: 10.0,
            advanced_min_window: 3,
            hourly_bucket_limit: 12,
            recent_stress_events: 5,
            moisture_critical_pct: 30.0,
            moisture_dry_pct: 20.0,
            fast_depletion_rate: -0.5,
            prediction_horizon_hours: 168.0,
            gdd_base_temp_c: 10.0,
            gdd_report_days: 7,
        }
    }
}

/// Monitored numeric fields shared by the statistics and anomaly passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    SoilTemp,
    SoilMoisture,
    IrTemp,
}

impl Field {
    pub(crate) const MONITORED: [Field; 3] = [Field::SoilTemp, Field::SoilMoisture, Field::IrTemp];

    pub(crate) fn value(self, reading: &Reading) -> Option<f64> {
        match self {
            Field::SoilTemp => reading.soil_temp_c,
            Field::SoilMoisture => reading.soil_moisture_pct,
            Field::IrTemp => reading.ir_temp_c,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Field::SoilTemp => "Soil Temperature",
            Field::SoilMoisture => "Soil Moisture",
            Field::IrTemp => "IR Temperature",
        }
    }

    pub(crate) fn unit(self) -> &'static str {
        match self {
            Field::SoilTemp | Field::IrTemp => "°C",
            Field::SoilMoisture => "%",
        }
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 divisor); 0 for fewer than two values.
pub(crate) fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_mean_and_sample_std() {
        // ---
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));

        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let avg = mean(&values).unwrap();
        assert_eq!(avg, 5.0);
        assert!((sample_std(&values, avg) - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn test_std_of_single_value_is_zero() {
        // ---
        assert_eq!(sample_std(&[42.0], 42.0), 0.0);
        assert_eq!(sample_std(&[], 0.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        // ---
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.0349, 3), -0.035);
        assert_eq!(round_to(17.888, 1), 17.9);
    }

    #[test]
    fn test_field_accessors() {
        // ---
        let reading = Reading {
            soil_temp_c: Some(12.0),
            soil_moisture_pct: Some(0.0),
            ..Reading::default()
        };
        assert_eq!(Field::SoilTemp.value(&reading), Some(12.0));
        assert_eq!(Field::SoilMoisture.value(&reading), Some(0.0));
        assert_eq!(Field::IrTemp.value(&reading), None);
        assert_eq!(Field::SoilMoisture.unit(), "%");
    }
}
