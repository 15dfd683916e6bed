//! In-memory measurement store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use envwatch_adapters::AdapterError;
use envwatch_types::RawMeasurement;

use super::{select_recent, MeasurementStore};

/// A store backed by a vector of rows.
///
/// Useful for tests, benchmarks and demos. Rows can be added while a
/// dashboard is reading from it.
#[derive(Debug)]
pub struct MemoryStore {
    rows: Mutex<Vec<RawMeasurement>>,
    failure: Option<String>,
    description: String,
}

impl MemoryStore {
    pub fn new(rows: Vec<RawMeasurement>) -> Self {
        Self {
            rows: Mutex::new(rows),
            failure: None,
            description: "memory".to_string(),
        }
    }

    /// A store whose every fetch fails with a connection error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failure: Some(message.into()),
            description: "memory (offline)".to_string(),
        }
    }

    /// Append a row, as a sensor node would.
    pub fn push(&self, row: RawMeasurement) {
        self.lock().push(row);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RawMeasurement>> {
        // A panic while holding the lock cannot leave the vector half-written.
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    async fn fetch_measurements(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawMeasurement>, AdapterError> {
        if let Some(message) = &self.failure {
            return Err(AdapterError::Connection(message.clone()));
        }
        Ok(select_recent(&self.lock(), since, limit))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_push_is_visible_to_next_fetch() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let store = MemoryStore::new(vec![RawMeasurement::new("2024-03-01T10:00:00Z")]);
        assert_eq!(store.fetch_measurements(since, 10).await.unwrap().len(), 1);

        store.push(RawMeasurement::new("2024-03-01T11:00:00Z"));
        let rows = store.fetch_measurements(since, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].measured_at, "2024-03-01T11:00:00Z");
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::failing("network unreachable");
        let err = store.fetch_measurements(Utc::now(), 10).await.unwrap_err();
        assert!(matches!(err, AdapterError::Connection(ref m) if m == "network unreachable"));
        assert!(store.is_empty());
    }
}
