//! Axis bounds shared by the three charts.
//!
//! The time axis depends only on the refresh instant, and the vertical ranges
//! are fixed per metric. Charts therefore line up with each other and do not
//! rescale when an outlier arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use envwatch_types::Metric;

use super::series::axis_seconds;
use super::window::TimeWindows;

/// A closed display range for one metric.
///
/// Serialized as a two-element array, `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Pin `value` to the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn bounds(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

impl From<[f64; 2]> for MetricRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<MetricRange> for [f64; 2] {
    fn from(range: MetricRange) -> Self {
        range.bounds()
    }
}

/// Vertical ranges for all metrics, configurable under `[ranges]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricRanges {
    pub temperature: MetricRange,
    pub humidity: MetricRange,
    pub lightness: MetricRange,
}

impl Default for MetricRanges {
    fn default() -> Self {
        Self {
            temperature: MetricRange::new(10.0, 30.0),
            humidity: MetricRange::new(5.0, 65.0),
            lightness: MetricRange::new(1.0, 500.0),
        }
    }
}

impl MetricRanges {
    pub fn get(&self, metric: Metric) -> MetricRange {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Lightness => self.lightness,
        }
    }
}

/// Axis bounds for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    /// `[retention_start, display_end]`.
    pub time_range: (DateTime<Utc>, DateTime<Utc>),
    pub metric_ranges: MetricRanges,
}

impl AxisDomain {
    pub fn at(windows: &TimeWindows, ranges: &MetricRanges) -> Self {
        Self {
            time_range: (windows.retention_start, windows.display_end),
            metric_ranges: *ranges,
        }
    }

    /// Time axis bounds in unix seconds.
    pub fn time_bounds(&self) -> [f64; 2] {
        [axis_seconds(self.time_range.0), axis_seconds(self.time_range.1)]
    }

    pub fn range(&self, metric: Metric) -> MetricRange {
        self.metric_ranges.get(metric)
    }
}
