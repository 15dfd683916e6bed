//! Overview rendering: one chart per metric plus the last-day averages.
//!
//! All three charts share the time axis of the dashboard's [`AxisDomain`]
//! and use the fixed vertical range of their metric, so they line up and do
//! not rescale between refreshes.
//!
//! [`AxisDomain`]: crate::data::AxisDomain

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use envwatch_types::Metric;

use super::{format_local, format_reading};
use crate::app::App;
use crate::data::series::axis_seconds;
use crate::data::{DashboardData, MetricRange};

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        frame.render_widget(Paragraph::new(" Waiting for the first refresh...").block(block), area);
        return;
    };

    let [charts, summary] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(6)]).areas(area);
    let chart_areas = Layout::vertical([Constraint::Ratio(1, 3); 3]).split(charts);

    for (metric, chart_area) in Metric::ALL.into_iter().zip(chart_areas.iter()) {
        render_chart(frame, app, data, metric, *chart_area);
    }
    render_summary(frame, app, data, summary);
}

/// Pin each point's value to `range`, so outliers draw on the edge of the
/// chart instead of disappearing.
fn clip(segment: &[(f64, f64)], range: MetricRange) -> Vec<(f64, f64)> {
    segment.iter().map(|&(x, y)| (x, range.clamp(y))).collect()
}

fn render_chart(frame: &mut Frame, app: &App, data: &DashboardData, metric: Metric, area: Rect) {
    let series = data.series(metric);
    let range = data.domain.range(metric);
    let [x_min, x_max] = data.domain.time_bounds();
    let color = app.theme.metric_color(metric);

    let segments: Vec<Vec<(f64, f64)>> =
        series.segments().iter().map(|s| clip(s, range)).collect();
    let now = axis_seconds(data.windows.now);
    let now_marker = [(now, range.min), (now, range.max)];

    let mut datasets: Vec<Dataset> = segments
        .iter()
        .map(|segment| {
            // A lone reading between two gaps has no line to draw.
            let graph_type = if segment.len() == 1 { GraphType::Scatter } else { GraphType::Line };
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(color))
                .data(segment)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.border).add_modifier(Modifier::DIM))
            .data(&now_marker),
    );

    let latest = series
        .latest()
        .map(|p| format_reading(p.value, metric.unit()))
        .unwrap_or_else(|| "-".to_string());
    let title = Line::from(vec![
        Span::styled(format!(" {} ", metric.label()), Style::default().fg(color)),
        Span::raw(format!("now {} ", latest)),
        Span::styled(
            format!("[{} pts, {} gaps] ", series.len(), series.gap_count()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    let (start, end) = data.domain.time_range;
    let x_axis = Axis::default()
        .style(Style::default().fg(app.theme.border))
        .bounds([x_min, x_max])
        .labels([
            Span::raw(format_local(start)),
            Span::raw(format_local(start + (end - start) / 2)),
            Span::raw(format_local(end)),
        ]);

    let y_axis = Axis::default()
        .style(Style::default().fg(app.theme.border))
        .bounds(range.bounds())
        .labels([
            Span::raw(format!("{:.0}", range.min)),
            Span::raw(format!("{:.0}", (range.min + range.max) / 2.0)),
            Span::raw(format!("{:.0} {}", range.max, metric.unit())),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

fn render_summary(frame: &mut Frame, app: &App, data: &DashboardData, area: Rect) {
    let summary = &data.summary;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Metric::ALL
        .into_iter()
        .map(|metric| {
            let average = summary.get(metric);
            let style = match average.as_option() {
                Some(v) if !data.domain.range(metric).contains(v) => {
                    Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD)
                }
                Some(_) => Style::default()
                    .fg(app.theme.metric_color(metric))
                    .add_modifier(Modifier::BOLD),
                None => Style::default().add_modifier(Modifier::DIM),
            };
            Line::from(vec![
                Span::styled(format!(" {:<12}", metric.label()), bold),
                Span::styled(average.display(metric), style),
            ])
        })
        .collect();

    lines.push(Line::from(Span::styled(
        format!(
            " {} complete records since {}",
            summary.samples,
            format_local(summary.since)
        ),
        Style::default().add_modifier(Modifier::DIM),
    )));

    let title = format!(" Last {}h ", app.settings.window.summary_hours);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(paragraph, area);
}
