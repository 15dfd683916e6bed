//! The tracked sensor quantities.

use std::fmt;

/// One of the three quantities reported by the sensor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Air temperature in degrees Celsius.
    Temperature,
    /// Relative humidity in percent.
    Humidity,
    /// Illuminance in lux.
    Lightness,
}

impl Metric {
    /// All metrics, in display order.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Lightness];

    /// Column name in the measurements table.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Lightness => "lightness",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Lightness => "Brightness",
        }
    }

    /// Display unit.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Lightness => "lux",
        }
    }

    /// Position of this metric in [`Metric::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Metric::Temperature => 0,
            Metric::Humidity => 1,
            Metric::Lightness => 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
