//! Canopy-versus-soil temperature stress events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Point;
use crate::analytics::{round_to, Thresholds};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Mild,
    Moderate,
    Severe,
}

/// State of the latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanopyStatus {
    Severe,
    Moderate,
    Mild,
    CoolCanopy,
    Normal,
    /// No reading carried both temperatures.
    Unknown,
}

impl From<StressLevel> for CanopyStatus {
    fn from(level: StressLevel) -> Self {
        match level {
            StressLevel::Mild => CanopyStatus::Mild,
            StressLevel::Moderate => CanopyStatus::Moderate,
            StressLevel::Severe => CanopyStatus::Severe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatStressEvent {
    // ---
    pub datetime: DateTime<Utc>,
    pub leaf_temp: f64,
    pub soil_temp: f64,
    pub difference: f64,
    pub severity: StressLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatStress {
    // ---
    pub current_status: CanopyStatus,
    pub current_leaf_temp: Option<f64>,
    pub current_soil_temp: Option<f64>,
    pub current_difference: Option<f64>,
    /// Every event in the window, not only the reported ones.
    pub stress_events_count: usize,
    pub recent_events: Vec<HeatStressEvent>,
}

/// Stress level for a canopy-minus-soil difference, `None` below the
/// heat-stress margin.
pub(super) fn classify(diff: f64, thresholds: &Thresholds) -> Option<StressLevel> {
    // ---
    if diff > thresholds.severe_stress_diff_c {
        Some(StressLevel::Severe)
    } else if diff > thresholds.moderate_stress_diff_c {
        Some(StressLevel::Moderate)
    } else if diff > thresholds.heat_stress_diff_c {
        Some(StressLevel::Mild)
    } else {
        None
    }
}

pub(super) fn current_status(diff: f64, thresholds: &Thresholds) -> CanopyStatus {
    // ---
    match classify(diff, thresholds) {
        Some(level) => level.into(),
        None if diff < thresholds.cool_canopy_diff_c => CanopyStatus::CoolCanopy,
        None => CanopyStatus::Normal,
    }
}

/// Scan an ascending point series for stress events.
pub(super) fn analyze(points: &[Point], thresholds: &Thresholds) -> HeatStress {
    // ---
    let paired: Vec<(DateTime<Utc>, f64, f64)> = points
        .iter()
        .filter_map(|p| Some((p.at, p.ir_temp?, p.soil_temp?)))
        .collect();

    let events: Vec<HeatStressEvent> = paired
        .iter()
        .filter_map(|&(at, leaf, soil)| {
            let diff = leaf - soil;
            classify(diff, thresholds).map(|severity| HeatStressEvent {
                datetime: at,
                leaf_temp: round_to(leaf, 1),
                soil_temp: round_to(soil, 1),
                difference: round_to(diff, 1),
                severity,
            })
        })
        .collect();

    let stress_events_count = events.len();
    let skip = stress_events_count.saturating_sub(thresholds.recent_stress_events);
    let recent_events = events.into_iter().skip(skip).collect();

    match paired.last() {
        Some(&(_, leaf, soil)) => {
            let diff = leaf - soil;
            HeatStress {
                current_status: current_status(diff, thresholds),
                current_leaf_temp: Some(round_to(leaf, 1)),
                current_soil_temp: Some(round_to(soil, 1)),
                current_difference: Some(round_to(diff, 1)),
                stress_events_count,
                recent_events,
            }
        }
        None => HeatStress {
            current_status: CanopyStatus::Unknown,
            current_leaf_temp: None,
            current_soil_temp: None,
            current_difference: None,
            stress_events_count,
            recent_events,
        },
    }
}
