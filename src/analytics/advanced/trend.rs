//! Calendar-hour buckets for the trend charts.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Point;
use crate::analytics::{mean, round_to, Thresholds};

// ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBucket {
    // ---
    /// `YYYY-MM-DD HH:00`, UTC.
    pub hour: String,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    // ---
    pub soil_temp_hourly: Vec<HourlyBucket>,
    pub moisture_hourly: Vec<HourlyBucket>,
    pub ir_temp_hourly: Vec<HourlyBucket>,
}

pub(super) fn analyze(points: &[Point], thresholds: &Thresholds) -> TrendAnalysis {
    // ---
    let limit = thresholds.hourly_bucket_limit;
    TrendAnalysis {
        soil_temp_hourly: hourly_buckets(points, |p| p.soil_temp, limit),
        moisture_hourly: hourly_buckets(points, |p| p.soil_moisture, limit),
        ir_temp_hourly: hourly_buckets(points, |p| p.ir_temp, limit),
    }
}

/// Group observations by calendar hour and keep the most recent `limit`
/// buckets. Hours with no observation of the field produce no bucket.
pub(super) fn hourly_buckets<F>(points: &[Point], value: F, limit: usize) -> Vec<HourlyBucket>
where
    F: Fn(&Point) -> Option<f64>,
{
    // ---
    // Fixed-width keys sort chronologically
    let mut by_hour: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for point in points {
        if let Some(v) = value(point) {
            let key = point.at.format("%Y-%m-%d %H:00").to_string();
            by_hour.entry(key).or_default().push(v);
        }
    }

    let skip = by_hour.len().saturating_sub(limit);
    by_hour
        .into_iter()
        .skip(skip)
        .filter_map(|(hour, values)| {
            let avg = mean(&values)?;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            Some(HourlyBucket {
                hour,
                avg: round_to(avg, 2),
                min: round_to(min, 2),
                max: round_to(max, 2),
                count: values.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::analytics::advanced::tests::{base_time, point};
    use chrono::Duration;

    #[test]
    fn test_points_in_same_hour_share_a_bucket() {
        // ---
        let mut points = vec![point(0, 10.0, 50.0, 12.0), point(0, 14.0, 48.0, 15.0)];
        points[1].at += Duration::minutes(45);
        points.push(point(1, 16.0, 47.0, 18.0));

        let buckets = hourly_buckets(&points, |p| p.soil_temp, 12);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].hour, "2025-06-01 06:00");
        assert_eq!(buckets[0].avg, 12.0);
        assert_eq!(buckets[0].min, 10.0);
        assert_eq!(buckets[0].max, 14.0);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].hour, "2025-06-01 07:00");
    }

    #[test]
    fn test_only_latest_buckets_are_kept() {
        // ---
        let points: Vec<Point> = (0..20).map(|h| point(h, h as f64, 50.0, 20.0)).collect();

        let buckets = hourly_buckets(&points, |p| p.soil_temp, 12);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].avg, 8.0);
        assert_eq!(buckets[11].avg, 19.0);
        // crosses midnight into the next day
        assert_eq!(buckets[11].hour, "2025-06-02 01:00");
    }

    #[test]
    fn test_missing_values_leave_no_bucket() {
        // ---
        let mut points = vec![point(0, 10.0, 50.0, 12.0), point(1, 11.0, 49.0, 13.0)];
        points[1].ir_temp = None;

        let analysis = analyze(&points, &Thresholds::default());
        assert_eq!(analysis.ir_temp_hourly.len(), 1);
        assert_eq!(analysis.soil_temp_hourly.len(), 2);
        assert_eq!(analysis.moisture_hourly[1].avg, 49.0);
        assert_eq!(points[0].at, base_time());
    }
}
