//! File-backed measurement store.
//!
//! Reads a JSON array of rows shaped like the hosted table, e.g. a dump
//! taken with `curl .../rest/v1/measurements`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use envwatch_adapters::AdapterError;
use envwatch_types::RawMeasurement;

use super::{select_recent, MeasurementStore};

/// A store that reads measurements from a JSON file.
///
/// The file is read again on every fetch, so edits show up on the next
/// refresh.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    description: String,
}

impl FileStore {
    /// Create a new file store for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MeasurementStore for FileStore {
    async fn fetch_measurements(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawMeasurement>, AdapterError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let rows: Vec<RawMeasurement> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), rows = rows.len(), "read measurement file");
        Ok(select_recent(&rows, since, limit))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
