//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::data::{DashboardData, PipelineError};
use crate::source::{FetchOutcome, Refresher};
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Charts for each metric plus the last-day averages.
    Overview,
    /// The measurements inside the retention window, newest first.
    Table,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Table,
            View::Table => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views, so both directions land on the other one.
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Table => "Raw Data",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data
    refresher: Refresher,
    pub settings: Settings,
    pub data: Option<DashboardData>,
    pub last_updated: Option<Instant>,
    pub load_error: Option<String>,

    // Navigation state (Table view)
    pub selected_row: usize,
    table_offset: usize,
    viewport_height: u16,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(refresher: Refresher, settings: Settings, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            refresher,
            settings,
            data: None,
            last_updated: None,
            load_error: None,
            selected_row: 0,
            table_offset: 0,
            viewport_height: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current store.
    pub fn source_description(&self) -> &str {
        self.refresher.description()
    }

    /// True while a refresh has been requested and not yet applied.
    pub fn is_loading(&self) -> bool {
        self.refresher.in_flight()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_TTL => Some(msg),
            _ => None,
        }
    }

    /// Ask the store for fresh data. The clock is read once here.
    pub fn request_refresh(&mut self) {
        let generation = self.refresher.request(Utc::now());
        info!(generation, "refresh requested");
    }

    /// Apply the newest refresh result, if one has arrived.
    ///
    /// Returns true if the app state changed.
    pub fn poll_refresh(&mut self) -> bool {
        match self.refresher.poll() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Run the pipeline over one fetch outcome and apply the result.
    ///
    /// A failed fetch or a rejected batch keeps the previous data on screen
    /// and records the error for the status bar.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        let result = outcome.result.map_err(PipelineError::from).and_then(|raw| {
            DashboardData::from_snapshot(&raw, outcome.requested_at, &self.settings)
        });

        match result {
            Ok(data) => {
                let rows = data.measurements.len();
                if self.selected_row >= rows {
                    self.selected_row = rows.saturating_sub(1);
                }
                self.data = Some(data);
                self.keep_selection_visible();
                self.load_error = None;
                self.last_updated = Some(Instant::now());
            }
            Err(e) => {
                warn!(generation = outcome.generation, error = %e, "refresh failed");
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Get breadcrumb trail for current navigation.
    pub fn breadcrumb(&self) -> &'static str {
        self.current_view.label()
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.measurements.len())
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
        self.keep_selection_visible();
    }

    /// Move selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
        self.keep_selection_visible();
    }

    /// Select a row by index, ignoring indices past the end.
    pub fn select_row(&mut self, row: usize) {
        if row < self.row_count() {
            self.selected_row = row;
            self.keep_selection_visible();
        }
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
        self.keep_selection_visible();
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.row_count().saturating_sub(1);
        self.keep_selection_visible();
    }

    /// Record the terminal height; called before every draw.
    pub fn set_viewport_height(&mut self, height: u16) {
        self.viewport_height = height;
        self.keep_selection_visible();
    }

    /// Table rows that fit on screen below the header bar, tabs, borders and
    /// column header, and above the status bar.
    pub fn table_page_rows(&self) -> usize {
        usize::from(self.viewport_height).saturating_sub(6).max(1)
    }

    /// Index of the first table row on screen.
    pub fn table_offset(&self) -> usize {
        self.table_offset
    }

    /// Scroll the table only as far as needed to show the selected row.
    fn keep_selection_visible(&mut self) {
        let page = self.table_page_rows();
        if self.selected_row < self.table_offset {
            self.table_offset = self.selected_row;
        } else if self.selected_row >= self.table_offset + page {
            self.table_offset = self.selected_row + 1 - page;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard data to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "exported dashboard state");

        Ok(())
    }
}
