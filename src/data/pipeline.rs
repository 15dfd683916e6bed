//! One refresh worth of dashboard data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use envwatch_types::{Metric, RawMeasurement};

use super::domain::AxisDomain;
use super::error::PipelineError;
use super::normalize::{normalize, retain_since, Measurement};
use super::series::MetricSeries;
use super::summary::DailySummary;
use super::window::TimeWindows;
use crate::config::Settings;
use crate::source::MeasurementStore;

/// Everything the dashboard renders, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    /// The `now` this data was computed for.
    pub generated_at: DateTime<Utc>,
    pub windows: TimeWindows,
    /// Measurements inside the retention window, in store order.
    pub measurements: Vec<Measurement>,
    /// One series per metric, indexed by [`Metric::index`].
    pub series: [MetricSeries; 3],
    pub summary: DailySummary,
    pub domain: AxisDomain,
}

impl DashboardData {
    /// Run the pipeline over a raw snapshot.
    ///
    /// The result depends only on `raw`, `now` and `settings`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use envwatch::config::Settings;
    /// use envwatch::data::{Average, DashboardData};
    /// use envwatch_types::{Metric, RawMeasurement};
    ///
    /// let now = Utc::now();
    /// let raw = vec![RawMeasurement::new((now - Duration::hours(2)).to_rfc3339())
    ///     .with(Metric::Temperature, 22.0)
    ///     .with(Metric::Humidity, 40.0)
    ///     .with(Metric::Lightness, 120.0)];
    ///
    /// let data = DashboardData::from_snapshot(&raw, now, &Settings::default()).unwrap();
    /// assert_eq!(data.summary.temperature, Average::Value(22.0));
    /// assert_eq!(data.series(Metric::Humidity).len(), 1);
    /// ```
    pub fn from_snapshot(
        raw: &[RawMeasurement],
        now: DateTime<Utc>,
        settings: &Settings,
    ) -> Result<Self, PipelineError> {
        let windows = TimeWindows::at(now, &settings.window);

        let fetched = raw.len();
        let measurements = retain_since(normalize(raw)?, &windows);
        if measurements.len() < fetched {
            debug!(
                dropped = fetched - measurements.len(),
                "dropped records older than the retention window"
            );
        }

        let series = Metric::ALL.map(|metric| MetricSeries::extract(metric, &measurements));
        let summary = DailySummary::compute(&measurements, &windows);
        let domain = AxisDomain::at(&windows, &settings.ranges);

        debug!(
            records = measurements.len(),
            summary_samples = summary.samples,
            "pipeline run complete"
        );

        Ok(Self {
            generated_at: now,
            windows,
            measurements,
            series,
            summary,
            domain,
        })
    }

    pub fn series(&self, metric: Metric) -> &MetricSeries {
        &self.series[metric.index()]
    }

    /// The most recent measurement, if any.
    pub fn latest(&self) -> Option<&Measurement> {
        self.measurements.iter().max_by_key(|m| m.measured_at)
    }
}

/// Fetch the retention window from `store` and run the pipeline.
///
/// `now` is read once by the caller and used for both the query bound and
/// every derived window.
pub async fn refresh(
    store: &dyn MeasurementStore,
    now: DateTime<Utc>,
    settings: &Settings,
) -> Result<DashboardData, PipelineError> {
    let since = TimeWindows::at(now, &settings.window).retention_start;
    let raw = store.fetch_measurements(since, settings.store.limit).await?;
    info!(rows = raw.len(), source = store.description(), "fetched snapshot");
    DashboardData::from_snapshot(&raw, now, settings)
}
