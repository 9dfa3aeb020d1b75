//! Outlier and sudden-change detection on the latest reading.

use serde::Serialize;

use super::{mean, round_to, sample_std, Field, Thresholds};
use crate::models::Reading;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    High,
    Low,
}

/// What made a reading anomalous.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnomalyKind {
    /// Latest value sits far from the window mean.
    Deviation {
        avg: f64,
        z_score: f64,
        direction: Direction,
    },
    /// Latest value jumped relative to the previous reading.
    SuddenChange { prev_value: f64, pct_change: f64 },
}

/// One flagged observation, serialized flat for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    // ---
    pub sensor: &'static str,
    pub value: f64,
    pub unit: &'static str,
    #[serde(flatten)]
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub message: String,
}

/// Flag the most recent reading of a newest-first window.
///
/// Nothing is reported for windows shorter than
/// [`Thresholds::anomaly_min_window`]. The z-score pass and the sudden-change
/// pass run independently, so one field may be reported by both.
pub fn detect_anomalies(window: &[Reading], thresholds: &Thresholds) -> Vec<Anomaly> {
    // ---
    // The sudden-change pass always needs two readings
    if window.len() < thresholds.anomaly_min_window.max(2) {
        return Vec::new();
    }

    let mut anomalies: Vec<Anomaly> = Field::MONITORED
        .iter()
        .filter_map(|field| z_score_anomaly(*field, window, thresholds))
        .collect();

    anomalies.extend(
        Field::MONITORED
            .iter()
            .filter_map(|field| sudden_change(*field, &window[0], &window[1], thresholds)),
    );

    anomalies
}

fn z_score_anomaly(field: Field, window: &[Reading], thresholds: &Thresholds) -> Option<Anomaly> {
    // ---
    let values: Vec<f64> = window.iter().filter_map(|r| field.value(r)).collect();
    if values.len() < thresholds.anomaly_min_window {
        return None;
    }

    let latest = field.value(&window[0])?;
    let avg = mean(&values)?;
    let std = sample_std(&values, avg);
    if std == 0.0 {
        return None;
    }

    let z_score = (latest - avg).abs() / std;
    if z_score <= thresholds.z_score_warning {
        return None;
    }

    let direction = if latest > avg {
        Direction::High
    } else {
        Direction::Low
    };
    let severity = if z_score >= thresholds.z_score_critical {
        Severity::Critical
    } else {
        Severity::Warning
    };

    let name = field.label();
    let unit = field.unit();
    let word = match direction {
        Direction::High => "high",
        Direction::Low => "low",
    };

    Some(Anomaly {
        sensor: name,
        value: round_to(latest, 1),
        unit,
        kind: AnomalyKind::Deviation {
            avg: round_to(avg, 1),
            z_score: round_to(z_score, 2),
            direction,
        },
        severity,
        message: format!("{name} is unusually {word}: {latest:.1}{unit} (avg: {avg:.1}{unit})"),
    })
}

fn sudden_change(
    field: Field,
    current: &Reading,
    previous: &Reading,
    thresholds: &Thresholds,
) -> Option<Anomaly> {
    // ---
    let curr = field.value(current)?;
    let prev = field.value(previous)?;
    // A jump away from zero has no defined percentage
    if prev == 0.0 {
        return None;
    }

    let pct_change = (curr - prev).abs() / prev.abs() * 100.0;
    if pct_change <= thresholds.sudden_change_pct {
        return None;
    }

    let name = field.label();
    Some(Anomaly {
        sensor: name,
        value: round_to(curr, 1),
        unit: field.unit(),
        kind: AnomalyKind::SuddenChange {
            prev_value: round_to(prev, 1),
            pct_change: round_to(pct_change, 1),
        },
        severity: Severity::Info,
        message: format!("{name} changed {pct_change:.0}% since last reading"),
    })
}
