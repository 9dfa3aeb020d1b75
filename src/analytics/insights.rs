//! Human-readable advisories derived from a window summary.

use serde::Serialize;

use super::{AnalyticsSummary, FieldStats, Thresholds, Trend};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    // ---
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub icon: &'static str,
    pub title: &'static str,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, icon: &'static str, title: &'static str, message: String) -> Self {
        Self {
            kind,
            icon,
            title,
            message,
        }
    }
}

/// Map a summary onto advisory messages.
///
/// Thresholds are hard cutoffs. Fields summarized from fewer than
/// [`Thresholds::stats_min_samples`] observations carry a zero-filled
/// placeholder and are not interpreted.
pub fn compute_insights(summary: &AnalyticsSummary, thresholds: &Thresholds) -> Vec<Insight> {
    // ---
    let observed = |stats: &FieldStats| stats.count >= thresholds.stats_min_samples;
    let mut insights = Vec::new();

    let moisture = &summary.soil_moisture;
    if observed(moisture) {
        if moisture.avg < thresholds.moisture_low_pct {
            insights.push(Insight::new(
                InsightKind::Warning,
                "💧",
                "Low Soil Moisture",
                format!(
                    "Average moisture is {}%. Consider watering soon.",
                    moisture.avg
                ),
            ));
        } else if moisture.avg > thresholds.moisture_high_pct {
            insights.push(Insight::new(
                InsightKind::Info,
                "💦",
                "High Soil Moisture",
                format!("Soil is well saturated at {}% average.", moisture.avg),
            ));
        }
    }

    let soil_temp = &summary.soil_temp;
    let ir_temp = &summary.ir_temp;
    if observed(soil_temp) && observed(ir_temp) {
        let diff = ir_temp.avg - soil_temp.avg;
        if diff > thresholds.heat_stress_diff_c {
            insights.push(Insight::new(
                InsightKind::Warning,
                "🌡️",
                "Possible Heat Stress",
                format!(
                    "Leaf temperature ({:.1}°C) is {:.1}°C warmer than soil. Plants may be heat-stressed.",
                    ir_temp.avg, diff
                ),
            ));
        } else if diff < thresholds.cool_canopy_diff_c {
            insights.push(Insight::new(
                InsightKind::Info,
                "❄️",
                "Cool Canopy",
                format!(
                    "Leaf temperature ({:.1}°C) is cooler than soil. Good transpiration occurring.",
                    ir_temp.avg
                ),
            ));
        }
    }

    match soil_temp.trend {
        Trend::Rising => insights.push(Insight::new(
            InsightKind::Info,
            "📈",
            "Temperature Rising",
            "Soil temperature has been trending upward.".to_string(),
        )),
        Trend::Falling => insights.push(Insight::new(
            InsightKind::Info,
            "📉",
            "Temperature Falling",
            "Soil temperature has been trending downward.".to_string(),
        )),
        Trend::Stable => {}
    }

    if summary.rainfall.total > thresholds.significant_rainfall_mm {
        insights.push(Insight::new(
            InsightKind::Info,
            "🌧️",
            "Significant Rainfall",
            format!(
                "Total rainfall of {}mm recorded in this period.",
                summary.rainfall.total
            ),
        ));
    }

    insights
}
