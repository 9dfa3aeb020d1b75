//! Growing degree day accumulation and growth-stage lookup.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::Point;
use crate::analytics::{mean, round_to, Thresholds};

// ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGdd {
    // ---
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub gdd: f64,
    pub cumulative_gdd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthStage {
    // ---
    pub stage: &'static str,
    pub description: &'static str,
    /// Position within the stage's GDD band, 0–100.
    pub progress: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowingDegreeDays {
    // ---
    pub base_temperature: f64,
    /// Accumulated over the whole window, not only `daily_gdd`.
    pub total_gdd: f64,
    pub daily_gdd: Vec<DailyGdd>,
    pub growth_stage_estimate: GrowthStage,
}

/// Stage bands as (upper bound exclusive, name, description).
const STAGES: [(f64, &str, &str); 4] = [
    (50.0, "Dormant/Early", "Seeds germinating or early growth"),
    (150.0, "Vegetative", "Active leaf and stem growth"),
    (300.0, "Development", "Plant establishing structure"),
    (500.0, "Mature", "Full growth achieved"),
];

/// Daily soil-temperature heat units above the base temperature.
pub(super) fn accumulate(points: &[Point], thresholds: &Thresholds) -> GrowingDegreeDays {
    // ---
    let base = thresholds.gdd_base_temp_c;

    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for point in points {
        if let Some(temp) = point.soil_temp {
            by_day.entry(point.at.date_naive()).or_default().push(temp);
        }
    }

    let mut total = 0.0;
    let mut days = Vec::with_capacity(by_day.len());
    for (date, temps) in by_day {
        let Some(avg) = mean(&temps) else { continue };
        let gdd = (avg - base).max(0.0);
        total += gdd;
        days.push(DailyGdd {
            date,
            avg_temp: round_to(avg, 1),
            gdd: round_to(gdd, 1),
            cumulative_gdd: round_to(total, 1),
        });
    }

    let skip = days.len().saturating_sub(thresholds.gdd_report_days);
    GrowingDegreeDays {
        base_temperature: base,
        total_gdd: round_to(total, 1),
        daily_gdd: days.into_iter().skip(skip).collect(),
        growth_stage_estimate: estimate_growth_stage(total),
    }
}

/// Map cumulative GDD onto a coarse development stage.
pub fn estimate_growth_stage(gdd: f64) -> GrowthStage {
    // ---
    let mut lower = 0.0;
    for (upper, stage, description) in STAGES {
        if gdd < upper {
            return GrowthStage {
                stage,
                description,
                progress: band_progress(gdd, lower, upper),
            };
        }
        lower = upper;
    }

    GrowthStage {
        stage: "Peak/Harvest",
        description: "Optimal maturity",
        progress: 100,
    }
}

fn band_progress(gdd: f64, lower: f64, upper: f64) -> u32 {
    // ---
    let pct = (gdd - lower) * 100.0 / (upper - lower);
    pct.floor().clamp(0.0, 100.0) as u32
}
