//! Background refreshes with last-request-wins semantics.
//!
//! The UI thread never awaits the store. Each [`Refresher::request`] spawns a
//! fetch on the runtime and bumps a generation counter; [`Refresher::poll`]
//! only hands back the outcome of the newest request. Older fetches are left
//! to finish and their rows are dropped, so a late response can never
//! overwrite newer data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use envwatch_adapters::AdapterError;
use envwatch_types::RawMeasurement;

use super::MeasurementStore;
use crate::data::{TimeWindows, WindowSpec};

/// Result of one refresh request.
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    /// The `now` the request was issued with. The pipeline must run with it.
    pub requested_at: DateTime<Utc>,
    pub result: Result<Vec<RawMeasurement>, AdapterError>,
}

/// Issues fetches against a store and keeps only the newest result.
#[derive(Debug)]
pub struct Refresher {
    store: Arc<dyn MeasurementStore>,
    window: WindowSpec,
    limit: usize,
    runtime: Handle,
    generation: u64,
    awaiting: bool,
    tx: UnboundedSender<FetchOutcome>,
    rx: UnboundedReceiver<FetchOutcome>,
}

impl Refresher {
    pub fn new(
        store: Arc<dyn MeasurementStore>,
        window: WindowSpec,
        limit: usize,
        runtime: Handle,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            window,
            limit,
            runtime,
            generation: 0,
            awaiting: false,
            tx,
            rx,
        }
    }

    /// Start a fetch of the retention window ending at `now` and return its
    /// generation.
    pub fn request(&mut self, now: DateTime<Utc>) -> u64 {
        self.generation += 1;
        self.awaiting = true;
        let generation = self.generation;

        let since = TimeWindows::at(now, &self.window).retention_start;
        let limit = self.limit;
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();

        debug!(generation, %since, limit, "spawning fetch");
        self.runtime.spawn(async move {
            let result = store.fetch_measurements(since, limit).await;
            // The receiver only goes away with the refresher itself.
            let _ = tx.send(FetchOutcome {
                generation,
                requested_at: now,
                result,
            });
        });

        generation
    }

    /// Drain completed fetches and return the newest request's outcome, if it
    /// has arrived.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation == self.generation {
                latest = Some(outcome);
            } else {
                debug!(
                    stale = outcome.generation,
                    current = self.generation,
                    "discarding stale refresh result"
                );
            }
        }
        if latest.is_some() {
            self.awaiting = false;
        }
        latest
    }

    /// True while the newest request has not been delivered by [`poll`](Self::poll).
    pub fn in_flight(&self) -> bool {
        self.awaiting
    }

    /// Generation of the newest request, 0 before the first.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn description(&self) -> &str {
        self.store.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, SecondsFormat, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    use envwatch_types::Metric;

    use crate::source::MemoryStore;

    /// The first fetch is slow and reports 10 °C, later ones are fast and
    /// report 25 °C.
    #[derive(Debug)]
    struct SlowFirstStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MeasurementStore for SlowFirstStore {
        async fn fetch_measurements(
            &self,
            since: DateTime<Utc>,
            _limit: usize,
        ) -> Result<Vec<RawMeasurement>, AdapterError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let temperature = if call == 0 {
                tokio::time::sleep(StdDuration::from_millis(300)).await;
                10.0
            } else {
                25.0
            };
            let at = (since + Duration::days(6)).to_rfc3339_opts(SecondsFormat::Secs, true);
            Ok(vec![RawMeasurement::new(at)
                .with(Metric::Temperature, temperature)
                .with(Metric::Humidity, 40.0)
                .with(Metric::Lightness, 100.0)])
        }

        fn description(&self) -> &str {
            "slow-first"
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
    }

    fn refresher(store: Arc<dyn MeasurementStore>) -> Refresher {
        Refresher::new(store, WindowSpec::default(), 5000, Handle::current())
    }

    async fn wait_for(refresher: &mut Refresher) -> FetchOutcome {
        for _ in 0..200 {
            if let Some(outcome) = refresher.poll() {
                return outcome;
            }
            tokio::time::sleep(StdDuration::from_millis(5)).await;
        }
        panic!("refresh never completed");
    }

    #[tokio::test]
    async fn test_single_request() {
        let store = Arc::new(MemoryStore::new(vec![RawMeasurement::new("2024-03-08T10:00:00Z")
            .with(Metric::Temperature, 21.0)
            .with(Metric::Humidity, 40.0)
            .with(Metric::Lightness, 100.0)]));
        let mut refresher = refresher(store);

        assert!(!refresher.in_flight());
        assert_eq!(refresher.request(t0()), 1);
        assert!(refresher.in_flight());

        let outcome = wait_for(&mut refresher).await;
        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.requested_at, t0());
        assert_eq!(outcome.result.unwrap().len(), 1);
        assert!(!refresher.in_flight());
        assert_eq!(refresher.description(), "memory");
    }

    #[tokio::test]
    async fn test_last_request_wins() {
        let store = Arc::new(SlowFirstStore {
            calls: AtomicUsize::new(0),
        });
        let mut refresher = refresher(store.clone());

        refresher.request(t0());
        // Let the first fetch start before it is superseded.
        tokio::time::sleep(StdDuration::from_millis(20)).await;
        let second = t0() + Duration::minutes(1);
        refresher.request(second);

        let outcome = wait_for(&mut refresher).await;
        assert_eq!(outcome.generation, 2);
        assert_eq!(outcome.requested_at, second);
        let rows = outcome.result.unwrap();
        assert_eq!(rows[0].temperature, Some(25.0));

        // The slow first fetch still completes, but its rows are dropped.
        tokio::time::sleep(StdDuration::from_millis(400)).await;
        assert!(refresher.poll().is_none());
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        assert_eq!(refresher.generation(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_reported() {
        let store = Arc::new(MemoryStore::failing("down"));
        let mut refresher = refresher(store);
        refresher.request(t0());

        let outcome = wait_for(&mut refresher).await;
        assert!(matches!(outcome.result, Err(AdapterError::Connection(_))));
    }
}
