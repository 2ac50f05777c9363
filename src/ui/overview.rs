//! Overview view rendering.
//!
//! Displays the alert summary line and one card per monitored parameter,
//! four across on wide terminals and a 2x2 grid otherwise.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::ParameterSnapshot;
use crate::session::StatusSummary;
use crate::ui::common::render_error_banner;

/// Width at which cards are laid out in a single row.
const WIDE_LAYOUT: u16 = 120;

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let used = render_error_banner(frame, app, area);
    let area = Rect::new(area.x, area.y + used, area.width, area.height.saturating_sub(used));

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(4)]).split(area);

    frame.render_widget(
        Paragraph::new(summary_line(app, app.session.summary())),
        chunks[0],
    );

    let parameters = app.session.parameters();
    if parameters.is_empty() {
        let message = if app.session.is_loaded() {
            " No sensor readings available"
        } else {
            " Loading sensor data..."
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().add_modifier(Modifier::DIM)),
            chunks[1],
        );
        return;
    }

    for (index, (snapshot, cell)) in parameters
        .iter()
        .zip(card_areas(chunks[1], parameters.len()))
        .enumerate()
    {
        render_card(frame, app, snapshot, index == app.selected_index, cell);
    }
}

fn summary_line(app: &App, summary: StatusSummary) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];

    if summary.critical > 0 {
        spans.push(Span::styled(
            format!("{} {}", summary.critical, plural(summary.critical, "Critical Alert")),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("  "));
    }
    if summary.warning > 0 {
        spans.push(Span::styled(
            format!("{} {}", summary.warning, plural(summary.warning, "Warning")),
            Style::default().fg(app.theme.warning),
        ));
    }
    if summary.critical == 0 && summary.warning == 0 && app.session.is_loaded() {
        spans.push(Span::styled(
            "All parameters normal",
            Style::default().fg(app.theme.normal),
        ));
    }

    Line::from(spans)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}

/// Split the content area into one rectangle per card.
fn card_areas(area: Rect, count: usize) -> Vec<Rect> {
    if area.width >= WIDE_LAYOUT {
        let constraints = vec![Constraint::Ratio(1, count as u32); count];
        return Layout::horizontal(constraints).split(area).to_vec();
    }

    let per_row = 2;
    let rows = count.div_ceil(per_row);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                .split(*row)
                .to_vec()
        })
        .take(count)
        .collect()
}

fn render_card(
    frame: &mut Frame,
    app: &App,
    snapshot: &ParameterSnapshot,
    selected: bool,
    area: Rect,
) {
    let parameter = snapshot.parameter;
    let band = snapshot.band;
    let status_style = app.theme.status_style(snapshot.status);

    let observed = snapshot
        .observed_at
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(Span::styled(
            format!("{} {}", snapshot.formatted_value(), snapshot.unit),
            status_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Normal Range: {} - {} {}",
            band.normal_min, band.normal_max, snapshot.unit
        )),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(
                format!("{} ({})", snapshot.status.symbol(), snapshot.status.label()),
                status_style,
            ),
        ]),
        Line::from(Span::styled(
            format!("Observed: {}", observed),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let title_style = if selected {
        app.theme.selected
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", parameter.name()), title_style))
        .title_bottom(Line::from(format!(" {} ", parameter.id())).right_aligned())
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.card_border(snapshot.status, selected));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
