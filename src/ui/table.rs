//! Raw data view: every measurement in the retention window, newest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use envwatch_types::Metric;

use super::{format_local, format_reading};
use crate::app::App;
use crate::data::Measurement;

/// Render the Raw Data view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let mut header = vec![Cell::from("Measured at")];
    header.extend(
        Metric::ALL
            .into_iter()
            .map(|m| Cell::from(format!("{} ({})", m.label(), m.unit()))),
    );
    let header = Row::new(header).height(1).style(app.theme.header);

    let rows: Vec<Row> = newest_first(&data.measurements)
        .into_iter()
        .map(|m| {
            let mut cells = vec![Cell::from(format_local(m.measured_at))];
            cells.extend(Metric::ALL.into_iter().map(|metric| {
                let value = m.get(metric);
                Cell::from(format_reading(value, ""))
                    .style(app.theme.reading_style(value, data.domain.range(metric)))
            }));
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let count = data.measurements.len();
    let selected = app.selected_row.min(count.saturating_sub(1));
    let position_info = if count > 0 {
        format!(" [{}/{}]", selected + 1, count)
    } else {
        String::new()
    };
    let title = format!(
        " Measurements since {}{} ",
        format_local(data.windows.retention_start),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_offset(app.table_offset());
    if count > 0 {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Measurements sorted newest first, independent of store order.
fn newest_first(measurements: &[Measurement]) -> Vec<&Measurement> {
    let mut sorted: Vec<&Measurement> = measurements.iter().collect();
    sorted.sort_by(|a, b| b.measured_at.cmp(&a.measured_at));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32) -> Measurement {
        Measurement {
            measured_at: Utc.with_ymd_and_hms(2024, 3, 8, hour, 0, 0).unwrap(),
            temperature: Some(20.0),
            humidity: None,
            lightness: None,
        }
    }

    #[test]
    fn test_newest_first() {
        let rows = vec![at(9), at(11), at(10)];
        let sorted: Vec<u32> = newest_first(&rows)
            .iter()
            .map(|m| m.measured_at.format("%H").to_string().parse().unwrap())
            .collect();
        assert_eq!(sorted, vec![11, 10, 9]);
    }
}
