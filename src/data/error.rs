//! Error types for the measurement pipeline.

use envwatch_adapters::AdapterError;
use envwatch_types::Metric;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Any of these leaves the previously rendered data untouched.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store could not be queried.
    #[error("fetch failed: {0}")]
    Fetch(#[from] AdapterError),

    /// A row carried a timestamp that could not be parsed.
    #[error("record {index}: invalid timestamp {value:?}")]
    InvalidTimestamp { index: usize, value: String },

    /// A row carried a non-finite sensor value.
    #[error("record {index}: {metric} is not a finite number")]
    InvalidValue { index: usize, metric: Metric },
}

/// Errors reported per summary metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// No complete record fell inside the summary window.
    #[error("insufficient data for {metric}")]
    InsufficientData { metric: Metric },
}
