//! Terminal rendering.

pub mod common;
pub mod overview;
pub mod table;
pub mod theme;

pub use theme::Theme;

use chrono::{DateTime, Local, Utc};

/// Format an instant in local time for display, e.g. "03-08 14:05".
pub fn format_local(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%m-%d %H:%M").to_string()
}

/// Format an optional reading with its unit, or "-" for a gap.
pub fn format_reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{:.1}", v),
        Some(v) => format!("{:.1} {}", v, unit),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reading() {
        assert_eq!(format_reading(Some(21.44), "°C"), "21.4 °C");
        assert_eq!(format_reading(Some(40.0), ""), "40.0");
        assert_eq!(format_reading(None, "%"), "-");
    }
}
