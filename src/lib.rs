//! # envwatch
//!
//! A terminal dashboard for office environment sensors.
//!
//! A sensor node writes temperature, humidity and light readings into a
//! hosted table. envwatch fetches the last week of rows, turns them into
//! one chart per metric on a shared time axis, and averages the last day.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │(pipeline)│    │(render) │    │          │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └──────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── SupabaseStore | FileStore | MemoryStore      │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`MeasurementStore`] trait, its implementations, and
//!   the [`Refresher`] that fetches in the background with last-request-wins
//!   semantics
//! - **[`data`]**: the pure pipeline from raw rows to [`DashboardData`]: time
//!   windows, normalization, series, the daily summary and axis domains
//! - **[`config`]**: layered settings (TOML file, environment, flags)
//! - **[`app`]**, **[`events`]**, **[`ui`]**: the terminal dashboard
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a Supabase table
//! envwatch --url https://project.supabase.co --api-key "$ANON_KEY"
//!
//! # Browse a JSON dump offline
//! envwatch --file measurements.json
//!
//! # Fetch once and write the dashboard data as JSON
//! envwatch --file measurements.json --export dashboard.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use chrono::{Duration, Utc};
//! use envwatch::{refresh, MemoryStore, Settings};
//! use envwatch_types::{Metric, RawMeasurement};
//!
//! # tokio_test::block_on(async {
//! let now = Utc::now();
//! let store = MemoryStore::new(vec![
//!     RawMeasurement::new((now - Duration::hours(3)).to_rfc3339())
//!         .with(Metric::Temperature, 21.5)
//!         .with(Metric::Humidity, 38.0)
//!         .with(Metric::Lightness, 240.0),
//! ]);
//!
//! let data = refresh(&store, now, &Settings::default()).await.unwrap();
//! println!("{}", data.summary.temperature.display(Metric::Temperature));
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    refresh, Average, AxisDomain, DailySummary, DashboardData, MetricRange, MetricRanges,
    MetricSeries, PipelineError, TimeWindows,
};
pub use source::{FileStore, MeasurementStore, MemoryStore, Refresher, SupabaseStore};
