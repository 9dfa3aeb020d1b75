//! Per-field aggregate statistics over a reading window.

use serde::Serialize;

use super::{mean, round_to, sample_std, Field, Thresholds};
use crate::models::Reading;

// ---

/// Direction of a field over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

/// Summary of one monitored field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    // ---
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    pub trend: Trend,
    /// Number of observations that contributed; gates insights, not serialized.
    #[serde(skip)]
    pub count: usize,
}

impl FieldStats {
    /// Zero-filled summary reported when a field has too few observations.
    pub fn neutral(count: usize) -> Self {
        Self {
            avg: 0.0,
            min: 0.0,
            max: 0.0,
            std: 0.0,
            trend: Trend::Stable,
            count,
        }
    }
}

/// Rainfall is accumulated rather than trended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallStats {
    // ---
    pub total: f64,
    pub avg: f64,
    pub max: f64,
    pub rainy_readings: usize,
}

/// The `analytics` block of a dashboard report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    // ---
    pub soil_temp: FieldStats,
    pub soil_moisture: FieldStats,
    pub ir_temp: FieldStats,
    pub rainfall: RainfallStats,
}

/// Summarize a newest-first window.
///
/// Returns `None` when the window holds fewer than
/// [`Thresholds::stats_min_samples`] readings. The window is walked oldest to
/// newest so that a positive trend always means the field is increasing over
/// time.
pub fn compute_analytics(window: &[Reading], thresholds: &Thresholds) -> Option<AnalyticsSummary> {
    // ---
    if window.len() < thresholds.stats_min_samples {
        return None;
    }

    let chronological = |field: Field| -> Vec<f64> {
        window.iter().rev().filter_map(|r| field.value(r)).collect()
    };

    let rainfall: Vec<f64> = window
        .iter()
        .rev()
        .filter_map(|r| r.rainfall_hourly_mm)
        .collect();

    Some(AnalyticsSummary {
        soil_temp: summarize_field(&chronological(Field::SoilTemp), thresholds),
        soil_moisture: summarize_field(&chronological(Field::SoilMoisture), thresholds),
        ir_temp: summarize_field(&chronological(Field::IrTemp), thresholds),
        rainfall: summarize_rainfall(&rainfall),
    })
}

/// Summarize chronologically ordered observations of one field.
///
/// The trend compares the mean of the earlier half against the later half
/// (split at `len / 2`) and only calls it a trend when the shift exceeds
/// `trend_std_factor` standard deviations.
pub fn summarize_field(values: &[f64], thresholds: &Thresholds) -> FieldStats {
    // ---
    let Some(avg) = mean(values) else {
        return FieldStats::neutral(0);
    };
    if values.len() < thresholds.stats_min_samples {
        return FieldStats::neutral(values.len());
    }

    let std = sample_std(values, avg);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mid = values.len() / 2;
    let trend = match (mean(&values[..mid]), mean(&values[mid..])) {
        (Some(first), Some(second)) => {
            let shift = second - first;
            let band = std * thresholds.trend_std_factor;
            if shift > band {
                Trend::Rising
            } else if shift < -band {
                Trend::Falling
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    };

    FieldStats {
        avg: round_to(avg, 2),
        min: round_to(min, 2),
        max: round_to(max, 2),
        std: round_to(std, 2),
        trend,
        count: values.len(),
    }
}

/// Total, mean and peak hourly rainfall plus the number of wet readings.
pub fn summarize_rainfall(values: &[f64]) -> RainfallStats {
    // ---
    let total: f64 = values.iter().sum();
    let avg = mean(values).unwrap_or(0.0);
    let max = if values.is_empty() {
        0.0
    } else {
        values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    };

    RainfallStats {
        total: round_to(total, 2),
        avg: round_to(avg, 2),
        max: round_to(max, 2),
        rainy_readings: values.iter().filter(|v| **v > 0.0).count(),
    }
}
