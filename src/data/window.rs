//! Time windows relative to the instant a refresh was requested.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Window lengths, configurable under `[window]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    /// How far back data is fetched and plotted.
    pub retention_days: i64,
    /// How far back data feeds the averages.
    pub summary_hours: i64,
    /// Forward padding of the time axis past `now`.
    pub display_pad_hours: i64,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            retention_days: 7,
            summary_hours: 24,
            display_pad_hours: 6,
        }
    }
}

/// Bounds derived from a single `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindows {
    pub now: DateTime<Utc>,
    /// Oldest instant fetched and plotted (inclusive).
    pub retention_start: DateTime<Utc>,
    /// Averages only use records strictly after this instant.
    pub summary_start: DateTime<Utc>,
    /// Right edge of the time axis.
    pub display_end: DateTime<Utc>,
}

impl TimeWindows {
    /// Compute all bounds for `now`.
    pub fn at(now: DateTime<Utc>, spec: &WindowSpec) -> Self {
        Self {
            now,
            retention_start: now - Duration::days(spec.retention_days),
            summary_start: now - Duration::hours(spec.summary_hours),
            display_end: now + Duration::hours(spec.display_pad_hours),
        }
    }

    /// True if `t` is inside the retention window (inclusive lower bound).
    pub fn in_retention(&self, t: DateTime<Utc>) -> bool {
        t >= self.retention_start
    }

    /// True if `t` is inside the summary window (exclusive lower bound).
    pub fn in_summary(&self, t: DateTime<Utc>) -> bool {
        t > self.summary_start
    }
}
