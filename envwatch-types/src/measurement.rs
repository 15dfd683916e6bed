//! Raw measurement rows as stored by the sensor node.

use crate::Metric;

/// A single row from the measurements table, before any validation.
///
/// The timestamp is kept as the store's ISO-8601 text so that parsing
/// (and rejecting malformed values) happens in one place downstream.
/// Sensor fields are `None` when the node could not read that sensor.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMeasurement {
    /// When the reading was taken (ISO-8601, UTC).
    pub measured_at: String,

    /// Temperature in °C.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: Option<f64>,

    /// Relative humidity in %.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<f64>,

    /// Illuminance in lux.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lightness: Option<f64>,
}

impl RawMeasurement {
    /// Create a row with the given timestamp and no sensor values.
    pub fn new(measured_at: impl Into<String>) -> Self {
        Self {
            measured_at: measured_at.into(),
            ..Self::default()
        }
    }

    /// Set one sensor value (builder style).
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        *self.slot(metric) = Some(value);
        self
    }

    /// Get the value of one sensor, if it was reported.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Lightness => self.lightness,
        }
    }

    /// True when every tracked sensor reported a value.
    pub fn is_complete(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_some())
    }

    fn slot(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Temperature => &mut self.temperature,
            Metric::Humidity => &mut self.humidity,
            Metric::Lightness => &mut self.lightness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_only_requested_fields() {
        let row = RawMeasurement::new("2024-03-01T00:00:00Z").with(Metric::Humidity, 40.0);
        assert_eq!(row.temperature, None);
        assert_eq!(row.humidity, Some(40.0));
        assert_eq!(row.lightness, None);
    }

    #[test]
    fn test_is_complete() {
        let row = RawMeasurement::new("2024-03-01T00:00:00Z")
            .with(Metric::Temperature, 21.0)
            .with(Metric::Humidity, 40.0);
        assert!(!row.is_complete());
        assert!(row.with(Metric::Lightness, 120.0).is_complete());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_store_row() {
        let json = r#"[
            {"measured_at": "2024-03-01T12:34:56.789+00:00", "temperature": 22.4, "humidity": 41, "lightness": null},
            {"measured_at": "2024-03-01T12:30:00+00:00", "humidity": 40.5}
        ]"#;

        let rows: Vec<RawMeasurement> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].temperature, Some(22.4));
        assert_eq!(rows[0].humidity, Some(41.0));
        assert_eq!(rows[0].lightness, None);
        assert_eq!(rows[1].temperature, None);
        assert_eq!(rows[1].measured_at, "2024-03-01T12:30:00+00:00");
    }
}
