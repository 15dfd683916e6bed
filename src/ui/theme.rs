//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use envwatch_types::Metric;

use crate::data::MetricRange;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for readings outside their display range.
    pub warning: Color,
    /// Color for errors.
    pub critical: Color,
    /// Color for a fresh, error-free dashboard.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Line colors for temperature, humidity and lightness, in [`Metric::ALL`] order.
    pub metrics: [Color; 3],
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            metrics: [Color::LightRed, Color::LightBlue, Color::LightYellow],
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Magenta,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            metrics: [Color::Red, Color::Blue, Color::Rgb(176, 128, 0)],
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Line color for a metric.
    pub fn metric_color(&self, metric: Metric) -> Color {
        self.metrics[metric.index()]
    }

    /// Style for a reading: plain inside the range, flagged outside it.
    pub fn reading_style(&self, value: Option<f64>, range: MetricRange) -> Style {
        match value {
            Some(v) if !range.contains(v) => {
                Style::default().fg(self.warning).add_modifier(Modifier::BOLD)
            }
            Some(_) => Style::default(),
            None => Style::default().add_modifier(Modifier::DIM),
        }
    }
}
