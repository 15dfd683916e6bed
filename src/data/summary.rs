//! Last-day averages.
//!
//! Only records inside the summary window with all three metrics present
//! are averaged, so the three numbers always describe the same samples.
//! Means are rounded to one decimal, half away from zero.

use chrono::{DateTime, Utc};
use serde::Serialize;

use envwatch_types::Metric;

use super::error::SummaryError;
use super::normalize::Measurement;
use super::window::TimeWindows;

/// A rounded mean, or the explicit absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Average {
    Value(f64),
    InsufficientData,
}

impl Average {
    /// The mean, or an error naming the metric that had no data.
    pub fn value(&self, metric: Metric) -> Result<f64, SummaryError> {
        match self {
            Average::Value(v) => Ok(*v),
            Average::InsufficientData => Err(SummaryError::InsufficientData { metric }),
        }
    }

    pub fn as_option(&self) -> Option<f64> {
        match self {
            Average::Value(v) => Some(*v),
            Average::InsufficientData => None,
        }
    }

    /// Format for display, e.g. "22.4 °C" or "no data".
    pub fn display(&self, metric: Metric) -> String {
        match self {
            Average::Value(v) => format!("{:.1} {}", v, metric.unit()),
            Average::InsufficientData => "no data".to_string(),
        }
    }
}

impl From<Option<f64>> for Average {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Average::InsufficientData, Average::Value)
    }
}

/// Averages over the summary window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Exclusive lower bound of the window.
    pub since: DateTime<Utc>,
    /// Number of complete records that were averaged.
    pub samples: usize,
    pub temperature: Average,
    pub humidity: Average,
    pub lightness: Average,
}

impl DailySummary {
    /// Average each metric over complete records inside the summary window.
    pub fn compute(measurements: &[Measurement], windows: &TimeWindows) -> Self {
        let window: Vec<&Measurement> = measurements
            .iter()
            .filter(|m| windows.in_summary(m.measured_at))
            .filter(|m| m.is_complete())
            .collect();

        let average = |metric: Metric| -> Average {
            let values: Vec<f64> = window.iter().filter_map(|m| m.get(metric)).collect();
            rounded_mean(&values).into()
        };

        Self {
            since: windows.summary_start,
            samples: window.len(),
            temperature: average(Metric::Temperature),
            humidity: average(Metric::Humidity),
            lightness: average(Metric::Lightness),
        }
    }

    pub fn get(&self, metric: Metric) -> Average {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Lightness => self.lightness,
        }
    }

    /// True if at least one record was averaged.
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }
}

/// Arithmetic mean rounded to one decimal, or `None` for an empty sample.
pub fn rounded_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(round_tenth(mean))
}

/// Round to one decimal, half away from zero.
///
/// Adding `0.0` turns a negative zero into `0.0`, so it never prints as "-0.0".
fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0 + 0.0
}
