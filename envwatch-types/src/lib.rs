//! # envwatch-types
//!
//! Core types for environmental sensor measurements. This crate defines the
//! row schema shared between measurement stores (hosted tables, JSON dumps,
//! in-memory fakes) and the envwatch processing pipeline.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to read store rows directly
//! - **Explicit gaps**: Every sensor field is an `Option`, never a magic sentinel
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization matching the store's column names
//!
//! ## Example
//!
//! ```rust
//! use envwatch_types::{Metric, RawMeasurement};
//!
//! let row = RawMeasurement::new("2024-03-01T12:00:00+00:00")
//!     .with(Metric::Temperature, 22.5)
//!     .with(Metric::Humidity, 41.0);
//!
//! assert_eq!(row.get(Metric::Temperature), Some(22.5));
//! assert_eq!(row.get(Metric::Lightness), None);
//! assert!(!row.is_complete());
//! ```

mod measurement;
mod metric;

pub use measurement::*;
pub use metric::*;
