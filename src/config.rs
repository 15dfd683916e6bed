//! Layered configuration.
//!
//! Settings are read from an optional TOML file, then from environment
//! variables such as `ENVWATCH__STORE__URL`, and finally patched by command-line flags.
//!
//! ```toml
//! [store]
//! url = "https://project.supabase.co"
//! api_key = "anon-key"
//! table = "measurements"
//! limit = 5000
//!
//! [window]
//! retention_days = 7
//! summary_hours = 24
//! display_pad_hours = 6
//!
//! [ranges]
//! temperature = [10, 30]
//! humidity = [5, 65]
//! lightness = [1, 500]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use envwatch_adapters::DEFAULT_LIMIT;
use envwatch_types::Metric;

use crate::data::{MetricRanges, WindowSpec};

/// Config file read when `--config` is not given. Missing is fine.
pub const DEFAULT_CONFIG_FILE: &str = "envwatch.toml";

/// Where and how measurements are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Supabase project URL.
    pub url: Option<String>,
    /// Supabase API key.
    pub api_key: Option<String>,
    /// Read rows from this JSON file instead of a hosted store.
    pub file: Option<PathBuf>,
    pub table: String,
    /// Maximum rows per refresh.
    pub limit: usize,
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            file: None,
            table: "measurements".to_string(),
            limit: DEFAULT_LIMIT,
            timeout_secs: 10,
        }
    }
}

impl StoreSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub window: WindowSpec,
    pub ranges: MetricRanges,
}

impl Settings {
    /// Load settings from `path` (required) or the default file (optional),
    /// layered under the environment.
    ///
    /// The result is not validated: command-line overrides still apply on
    /// top, so call [`validate`](Self::validate) once they are in.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("ENVWATCH").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let w = &self.window;
        if !(1..=366).contains(&w.retention_days) {
            bail!("window.retention_days must be between 1 and 366, got {}", w.retention_days);
        }
        if w.summary_hours < 1 || w.summary_hours > w.retention_days * 24 {
            bail!(
                "window.summary_hours must be between 1 and the retention window ({}h), got {}",
                w.retention_days * 24,
                w.summary_hours
            );
        }
        if !(0..=168).contains(&w.display_pad_hours) {
            bail!("window.display_pad_hours must be between 0 and 168, got {}", w.display_pad_hours);
        }

        for metric in Metric::ALL {
            let range = self.ranges.get(metric);
            if !range.is_valid() {
                bail!(
                    "ranges.{} must be [min, max] with min < max, got [{}, {}]",
                    metric,
                    range.min,
                    range.max
                );
            }
        }

        if self.store.limit == 0 {
            bail!("store.limit must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::data::MetricRange;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.store.table, "measurements");
        assert_eq!(settings.store.limit, 5000);
        assert_eq!(settings.window, WindowSpec::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[store]
url = "https://office.supabase.co"
limit = 1000

[window]
summary_hours = 12

[ranges]
temperature = [15, 28]
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.store.url.as_deref(), Some("https://office.supabase.co"));
        assert_eq!(settings.store.limit, 1000);
        assert_eq!(settings.store.table, "measurements");
        assert_eq!(settings.window.summary_hours, 12);
        assert_eq!(settings.window.retention_days, 7);
        assert_eq!(settings.ranges.temperature, MetricRange::new(15.0, 28.0));
        assert_eq!(settings.ranges.lightness, MetricRange::new(1.0, 500.0));
    }

    #[test]
    fn test_load_defers_validation_to_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[store]\nlimit = 0").unwrap();

        let mut settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.store.limit, 0);
        assert!(settings.validate().is_err());

        settings.store.limit = 100;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/envwatch.toml"))).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let mut settings = Settings::default();
        settings.window.retention_days = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.window.summary_hours = 24 * 8;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut settings = Settings::default();
        settings.ranges.humidity = MetricRange::new(65.0, 5.0);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("ranges.humidity"));
    }
}
