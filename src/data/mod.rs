//! Measurement processing: windowing, normalization, series and summaries.
//!
//! This module turns a raw snapshot fetched from a store into everything the
//! dashboard draws. Every step is a pure function of the snapshot and the
//! `now` captured when the refresh was requested.
//!
//! ## Submodules
//!
//! - [`window`]: Retention, summary and display bounds relative to `now`
//! - [`normalize`]: Timestamp parsing and validation of raw rows ([`Measurement`])
//! - [`series`]: Per-metric ordered series with explicit gaps ([`MetricSeries`])
//! - [`summary`]: Last-day averages ([`DailySummary`])
//! - [`domain`]: Shared time axis and fixed metric ranges ([`AxisDomain`])
//! - [`pipeline`]: Composition of the above ([`DashboardData`])
//!
//! ## Data Flow
//!
//! ```text
//! Vec<RawMeasurement> (store rows)
//!        │
//!        ▼
//! normalize() ──▶ retain_since(retention_start)
//!        │
//!        ├──▶ MetricSeries::extract() × 3
//!        ├──▶ DailySummary::compute(summary_start)
//!        └──▶ AxisDomain::at(windows)
//! ```

pub mod domain;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod series;
pub mod summary;
pub mod window;

pub use domain::{AxisDomain, MetricRange, MetricRanges};
pub use error::{PipelineError, SummaryError};
pub use normalize::{normalize, parse_timestamp, retain_since, Measurement};
pub use pipeline::{refresh, DashboardData};
pub use series::{MetricSeries, SeriesPoint};
pub use summary::{Average, DailySummary};
pub use window::{TimeWindows, WindowSpec};
