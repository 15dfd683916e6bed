//! # envwatch-adapters
//!
//! Pre-built adapters for fetching sensor measurements from hosted stores.
//!
//! Each adapter answers the same question: "give me at most `limit` rows
//! measured at or after `since`, newest first", and returns them as
//! [`RawMeasurement`]s without interpreting them.
//!
//! ## Supported Stores
//!
//! - **Supabase / PostgREST** (`supabase` feature) - Queries a measurements
//!   table through the REST endpoint with caching disabled
//!
//! ## Quick Start (Supabase)
//!
//! ```rust,no_run
//! use envwatch_adapters::supabase::SupabaseAdapter;
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = SupabaseAdapter::builder()
//!         .endpoint("https://project.supabase.co")
//!         .api_key("anon-key")
//!         .build()?;
//!
//!     let since = Utc::now() - Duration::days(7);
//!     let rows = adapter.fetch(since, 5000).await?;
//!
//!     println!("Fetched {} rows", rows.len());
//!     Ok(())
//! }
//! ```

pub mod error;

#[cfg(feature = "supabase")]
pub mod supabase;

pub use error::AdapterError;

// Re-export types for convenience
pub use envwatch_types::{Metric, RawMeasurement};

/// Columns requested from every store, in table order.
pub const COLUMNS: [&str; 4] = ["measured_at", "temperature", "humidity", "lightness"];

/// Default maximum number of rows fetched per refresh.
pub const DEFAULT_LIMIT: usize = 5000;
