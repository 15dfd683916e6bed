//! Measurement store abstraction.
//!
//! The pipeline never holds a connection of its own: it is handed a
//! [`MeasurementStore`] and asks it for "the newest rows since T". Hosted
//! tables, JSON dumps and in-memory fakes all answer the same question.

mod file;
mod memory;
mod refresh;
mod supabase;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use refresh::{FetchOutcome, Refresher};
pub use supabase::SupabaseStore;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use envwatch_adapters::AdapterError;
use envwatch_types::RawMeasurement;

use crate::config::StoreSettings;
use crate::data::parse_timestamp;

/// A store that can be queried for recent measurements.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use envwatch::source::{MeasurementStore, MemoryStore};
/// use envwatch_types::RawMeasurement;
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new(vec![RawMeasurement::new(Utc::now().to_rfc3339())]);
/// let rows = store
///     .fetch_measurements(Utc::now() - Duration::days(7), 5000)
///     .await
///     .unwrap();
/// assert_eq!(rows.len(), 1);
/// # });
/// ```
#[async_trait]
pub trait MeasurementStore: Send + Sync + Debug {
    /// Fetch at most `limit` rows measured at or after `since`, newest first.
    ///
    /// Implementations must not cache: every call reflects the latest writes.
    async fn fetch_measurements(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawMeasurement>, AdapterError>;

    /// Returns a human-readable description of the store.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Open the store the settings point at: a file if one is given, otherwise
/// the hosted table.
pub fn open(settings: &StoreSettings) -> Result<Arc<dyn MeasurementStore>, AdapterError> {
    match &settings.file {
        Some(path) => Ok(Arc::new(FileStore::new(path))),
        None => Ok(Arc::new(SupabaseStore::from_settings(settings)?)),
    }
}

/// Apply the store query ("since, newest first, at most limit") to rows held
/// locally.
///
/// Rows whose timestamp does not parse are kept and sorted last, so the
/// pipeline still sees them and rejects the batch.
pub(crate) fn select_recent(
    rows: &[RawMeasurement],
    since: DateTime<Utc>,
    limit: usize,
) -> Vec<RawMeasurement> {
    let mut selected: Vec<(Option<DateTime<Utc>>, &RawMeasurement)> = rows
        .iter()
        .map(|row| (parse_timestamp(&row.measured_at), row))
        .filter(|(at, _)| at.map_or(true, |at| at >= since))
        .collect();

    // Newest first; `None` sorts below every `Some`, so unparseable rows land last.
    selected.sort_by(|a, b| b.0.cmp(&a.0));

    selected.into_iter().take(limit).map(|(_, row)| row.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rows() -> Vec<RawMeasurement> {
        vec![
            RawMeasurement::new("2024-03-01T10:00:00Z"),
            RawMeasurement::new("2024-03-01T12:00:00Z"),
            RawMeasurement::new("bogus"),
            RawMeasurement::new("2024-02-20T12:00:00Z"),
            RawMeasurement::new("2024-03-01T11:00:00Z"),
        ]
    }

    #[test]
    fn test_select_recent_filters_and_orders() {
        let since = Utc.with_ymd_and_hms(2024, 2, 25, 0, 0, 0).unwrap();
        let out = select_recent(&rows(), since, 10);
        let stamps: Vec<&str> = out.iter().map(|r| r.measured_at.as_str()).collect();
        assert_eq!(
            stamps,
            vec![
                "2024-03-01T12:00:00Z",
                "2024-03-01T11:00:00Z",
                "2024-03-01T10:00:00Z",
                "bogus"
            ]
        );
    }

    #[test]
    fn test_open_prefers_file() {
        let settings = StoreSettings {
            url: Some("https://office.supabase.co".to_string()),
            file: Some("/tmp/rows.json".into()),
            ..StoreSettings::default()
        };
        let store = open(&settings).unwrap();
        assert_eq!(store.description(), "file: /tmp/rows.json");
    }

    #[test]
    fn test_open_without_location_fails() {
        assert!(matches!(
            open(&StoreSettings::default()),
            Err(AdapterError::Config(_))
        ));
    }

    #[test]
    fn test_select_recent_limit_keeps_newest() {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let out = select_recent(&rows(), since, 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].measured_at, "2024-03-01T12:00:00Z");
        assert_eq!(out[1].measured_at, "2024-03-01T11:00:00Z");
    }
}
