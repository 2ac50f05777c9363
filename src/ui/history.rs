//! History view rendering.
//!
//! Displays a table of the recent values for each parameter with
//! min/max and sparkline trends.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{History, Parameter, MAX_HISTORY};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Number of sparkline characters shown per row.
const TREND_WIDTH: usize = 20;

/// Render the History view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.session.history();
    let snapshots = app.session.parameters();

    let header = Row::new(vec![
        Cell::from("Parameter"),
        Cell::from("Latest"),
        Cell::from("Min"),
        Cell::from("Max"),
        Cell::from("Trend"),
        Cell::from("Samples"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = Parameter::ALL
        .iter()
        .map(|&parameter| {
            let snapshot = snapshots.iter().find(|s| s.parameter == parameter);

            let latest = snapshot
                .map(|s| format!("{} {}", s.formatted_value(), s.unit))
                .unwrap_or_else(|| "-".to_string());
            let (min, max) = history
                .range(parameter)
                .map(|(lo, hi)| (parameter.format_value(lo), parameter.format_value(hi)))
                .unwrap_or_else(|| ("-".to_string(), "-".to_string()));

            let status_cell = match snapshot {
                Some(s) => Cell::from(s.status.symbol()).style(app.theme.status_style(s.status)),
                None => Cell::from("-"),
            };

            Row::new(vec![
                Cell::from(parameter.name()),
                Cell::from(latest),
                Cell::from(min),
                Cell::from(max),
                Cell::from(render_sparkline(history, parameter)),
                Cell::from(format!("{}/{}", history.len(parameter), MAX_HISTORY)),
                status_cell,
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(TREND_WIDTH as u16),
        Constraint::Min(7),
        Constraint::Min(6),
    ];

    let selected = app.selected_index.min(Parameter::ALL.len() - 1);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(" Recent Readings ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_sparkline(history: &History, parameter: Parameter) -> String {
    let data = history.sparkline(parameter);
    if data.is_empty() {
        return " ".repeat(TREND_WIDTH);
    }

    let skip = data.len().saturating_sub(TREND_WIDTH);
    data[skip..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}
