//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use envwatch_types::Metric;

use crate::app::{App, View};

/// Render the header bar with the overall state and the last-day averages.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" ENVWATCH ", Style::default().add_modifier(Modifier::BOLD));

    let Some(ref data) = app.data else {
        let line = Line::from(vec![title, Span::raw("| Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    // Stale data stays on screen after a failed refresh, flagged in red.
    let status_style = if app.load_error.is_some() {
        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
    } else if !data.summary.has_data() {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.healthy)
    };

    let mut spans = vec![Span::styled(" ● ", status_style), title, Span::raw("│")];
    for metric in Metric::ALL {
        spans.push(Span::raw(format!(" {} ", metric.label())));
        spans.push(Span::styled(
            data.summary.get(metric).display(metric),
            Style::default().fg(app.theme.metric_color(metric)).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" │"));
    }
    spans.push(Span::raw(format!(
        " {} samples / {}h",
        data.summary.samples,
        app.settings.window.summary_hours
    )));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Overview "), Line::from(" 2:Raw Data ")];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Table => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: breadcrumb, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let loading = if app.is_loading() { " (refreshing)" } else { "" };

    let (status, style) = if let Some(ref err) = app.load_error {
        let kept = if app.data.is_some() { " | showing last good data" } else { "" };
        (
            format!(" Error: {}{} | r:retry q:quit", err, kept),
            Style::default().fg(app.theme.critical),
        )
    } else if let Some(updated) = app.last_updated {
        let controls = match app.current_view {
            View::Overview => "Tab:switch r:refresh e:export ?:help q:quit",
            View::Table => "↑↓:scroll Tab:switch r:refresh e:export ?:help q:quit",
        };
        (
            format!(
                " {} | {} | Updated {:.1}s ago{} | {}",
                app.breadcrumb(),
                app.source_description(),
                updated.elapsed().as_secs_f64(),
                loading,
                controls,
            ),
            Style::default().add_modifier(Modifier::DIM),
        )
    } else {
        (
            format!(" Loading from {}... | q:quit", app.source_description()),
            Style::default().add_modifier(Modifier::DIM),
        )
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Views"),
        Line::from("  1 / 2       Overview / Raw data"),
        Line::from("  Tab ←/→     Switch views"),
        Line::from(""),
        section(" Raw Data"),
        Line::from("  ↑/↓ j/k     Scroll rows"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Newest / oldest"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Refresh now"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 19u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
