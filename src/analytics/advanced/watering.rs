//! Soil-moisture depletion forecast and watering advice.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Point;
use crate::analytics::{round_to, Thresholds};

// ---

/// Urgency bands, in hours until moisture reaches the critical level.
const CRITICAL_WITHIN_HOURS: f64 = 6.0;
const HIGH_WITHIN_HOURS: f64 = 24.0;
const MEDIUM_WITHIN_HOURS: f64 = 48.0;

/// Recommendation bands, in hours until critical.
const PLAN_WITHIN_HOURS: f64 = 12.0;
const WITHIN_A_DAY_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictiveWatering {
    // ---
    pub current_moisture: f64,
    /// Percent per hour; negative while the soil dries.
    pub depletion_rate: f64,
    pub hours_until_critical: Option<f64>,
    pub watering_urgency: Urgency,
    pub recommendation: String,
}

/// Forecast from the moisture observations of an ascending point series.
pub(super) fn predict(points: &[Point], thresholds: &Thresholds) -> Option<PredictiveWatering> {
    // ---
    let observations: Vec<(DateTime<Utc>, f64)> = points
        .iter()
        .filter_map(|p| p.soil_moisture.map(|m| (p.at, m)))
        .collect();
    let (_, current) = *observations.last()?;

    let rate = depletion_rate(&observations);
    let (urgency, hours) = classify_urgency(current, rate, thresholds);

    Some(PredictiveWatering {
        current_moisture: round_to(current, 1),
        depletion_rate: round_to(rate, 3),
        hours_until_critical: hours.map(|h| round_to(h, 1)),
        watering_urgency: urgency,
        recommendation: watering_recommendation(current, rate, hours, thresholds),
    })
}

/// Average change in moisture per hour between the first and last
/// observation. Zero when fewer than two observations or no time elapsed.
pub(super) fn depletion_rate(observations: &[(DateTime<Utc>, f64)]) -> f64 {
    // ---
    let (Some((t0, first)), Some((t1, last))) = (observations.first(), observations.last()) else {
        return 0.0;
    };
    if observations.len() < 2 {
        return 0.0;
    }

    let elapsed_hours = (*t1 - *t0).num_milliseconds() as f64 / 3_600_000.0;
    if elapsed_hours <= 0.0 {
        return 0.0;
    }
    (last - first) / elapsed_hours
}

/// Urgency and projected hours until moisture falls to the critical level.
pub(super) fn classify_urgency(
    current: f64,
    rate: f64,
    thresholds: &Thresholds,
) -> (Urgency, Option<f64>) {
    // ---
    let critical = thresholds.moisture_critical_pct;

    if current <= critical {
        return (Urgency::Critical, Some(0.0));
    }
    if rate >= 0.0 {
        return (Urgency::Low, None);
    }

    let hours = (current - critical) / rate.abs();
    if hours > thresholds.prediction_horizon_hours {
        return (Urgency::Low, None);
    }

    let urgency = if hours < CRITICAL_WITHIN_HOURS {
        Urgency::Critical
    } else if hours < HIGH_WITHIN_HOURS {
        Urgency::High
    } else if hours < MEDIUM_WITHIN_HOURS {
        Urgency::Medium
    } else {
        Urgency::Low
    };
    (urgency, Some(hours))
}

/// Canned advice, first matching rule wins.
pub fn watering_recommendation(
    moisture: f64,
    rate: f64,
    hours_until_critical: Option<f64>,
    thresholds: &Thresholds,
) -> String {
    // ---
    if moisture <= thresholds.moisture_dry_pct {
        return "Water immediately - soil is critically dry".to_string();
    }
    if moisture <= thresholds.moisture_critical_pct {
        return "Water soon - soil moisture is low".to_string();
    }
    match hours_until_critical {
        Some(h) if h < PLAN_WITHIN_HOURS => {
            return format!("Plan to water within {} hours", h.trunc() as i64);
        }
        Some(h) if h < WITHIN_A_DAY_HOURS => {
            return "Water within the next day".to_string();
        }
        _ => {}
    }
    if rate < thresholds.fast_depletion_rate {
        return "Monitor closely - moisture depleting quickly".to_string();
    }
    if moisture > thresholds.moisture_high_pct {
        return "No watering needed - soil is well saturated".to_string();
    }
    "Moisture levels adequate - continue monitoring".to_string()
}
