//! Hosted store backed by the Supabase REST adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use envwatch_adapters::supabase::SupabaseAdapter;
use envwatch_adapters::AdapterError;
use envwatch_types::RawMeasurement;

use super::MeasurementStore;
use crate::config::StoreSettings;

/// Measurements table in a Supabase project.
#[derive(Debug)]
pub struct SupabaseStore {
    adapter: SupabaseAdapter,
    description: String,
}

impl SupabaseStore {
    /// Build a store from the `[store]` settings. A URL is required.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, AdapterError> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| AdapterError::Config("no store url configured".to_string()))?;

        let mut builder = SupabaseAdapter::builder()
            .endpoint(url)
            .table(&settings.table)
            .timeout(settings.timeout());
        if let Some(key) = &settings.api_key {
            builder = builder.api_key(key);
        }

        Ok(Self {
            adapter: builder.build()?,
            description: format!("supabase: {}/{}", url.trim_end_matches('/'), settings.table),
        })
    }
}

#[async_trait]
impl MeasurementStore for SupabaseStore {
    async fn fetch_measurements(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawMeasurement>, AdapterError> {
        self.adapter.fetch(since, limit).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}
