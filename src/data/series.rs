//! Per-metric time series for charting.

use chrono::{DateTime, Utc};
use serde::Serialize;

use envwatch_types::Metric;

use super::normalize::Measurement;

/// One sample of a series. `value` is `None` where the sensor reported nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub at: DateTime<Utc>,
    pub value: Option<f64>,
}

/// One metric's values over time, ascending by timestamp.
///
/// Gaps are kept as points with no value so that a renderer can break the
/// line there instead of interpolating across it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    /// Project `metric` out of the measurements, one point per measurement.
    ///
    /// Points are stably sorted ascending, so duplicate timestamps keep
    /// their input order.
    pub fn extract(metric: Metric, measurements: &[Measurement]) -> Self {
        let mut points: Vec<SeriesPoint> = measurements
            .iter()
            .map(|m| SeriesPoint {
                at: m.measured_at,
                value: m.get(metric),
            })
            .collect();

        points.sort_by_key(|p| p.at);

        Self { metric, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points without a value.
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_none()).count()
    }

    /// The most recent point that carries a value.
    pub fn latest(&self) -> Option<SeriesPoint> {
        self.points.iter().rev().find(|p| p.value.is_some()).copied()
    }

    /// Split the series into contiguous runs of present values.
    ///
    /// Each run is a list of `(x, y)` pairs with `x` in unix seconds, ready
    /// to be drawn as its own line.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for point in &self.points {
            match point.value {
                Some(v) => current.push((axis_seconds(point.at), v)),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }

        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }
}

/// Position of an instant on the chart's time axis (unix seconds).
pub fn axis_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / 1000.0
}
