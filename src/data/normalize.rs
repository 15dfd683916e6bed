//! Validation of raw store rows.
//!
//! Rows arrive with text timestamps and nullable numbers. A null is a
//! legitimate "sensor unavailable" marker and passes through as `None`;
//! an unparseable timestamp or a non-finite number rejects the batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use envwatch_types::{Metric, RawMeasurement};

use super::error::PipelineError;
use super::window::TimeWindows;

/// Offset-carrying formats PostgreSQL emits besides RFC 3339 (e.g. "+00").
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Offset-less formats, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A validated measurement.
///
/// Present values are always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub measured_at: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub lightness: Option<f64>,
}

impl Measurement {
    /// Get the value of one metric, if it was reported.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Lightness => self.lightness,
        }
    }

    /// True when all three metrics are present.
    pub fn is_complete(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_some())
    }

    fn from_raw(index: usize, raw: &RawMeasurement) -> Result<Self, PipelineError> {
        let measured_at =
            parse_timestamp(&raw.measured_at).ok_or_else(|| PipelineError::InvalidTimestamp {
                index,
                value: raw.measured_at.clone(),
            })?;

        for metric in Metric::ALL {
            if raw.get(metric).is_some_and(|v| !v.is_finite()) {
                return Err(PipelineError::InvalidValue { index, metric });
            }
        }

        Ok(Self {
            measured_at,
            temperature: raw.temperature,
            humidity: raw.humidity,
            lightness: raw.lightness,
        })
    }
}

/// Parse a store timestamp into UTC.
///
/// Accepts RFC 3339, PostgreSQL's short offsets and space separator, and
/// offset-less timestamps (taken as UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Validate a batch of raw rows, preserving their order.
///
/// Fails on the first malformed row; no partial batch is returned.
pub fn normalize(raw: &[RawMeasurement]) -> Result<Vec<Measurement>, PipelineError> {
    raw.iter()
        .enumerate()
        .map(|(index, row)| Measurement::from_raw(index, row))
        .collect()
}

/// Drop measurements taken before the retention window opens.
pub fn retain_since(mut measurements: Vec<Measurement>, windows: &TimeWindows) -> Vec<Measurement> {
    measurements.retain(|m| windows.in_retention(m.measured_at));
    measurements
}
