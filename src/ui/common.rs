//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, error banner, status bar,
//! and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with station identity and alert counts.
///
/// Displays: connectivity badge, station name, location, last sync, counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if !app.session.is_loaded() {
        let line = Line::from(vec![
            Span::styled(" ENVWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading sensor data..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let station = app.session.station();
    let summary = app.session.summary();

    let mut location = station.location.clone();
    if let Some(coords) = station.coordinates {
        location.push_str(&format!(
            " ({:.4}, {:.4})",
            coords.latitude, coords.longitude
        ));
    }

    let mut spans = vec![
        Span::styled(
            format!(" ● {} ", station.connectivity.label()),
            app.theme.connectivity_style(station.connectivity),
        ),
        Span::styled(
            format!("{} ", station.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("#{} ", station.id),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::raw("│ "),
        Span::raw(location),
        Span::raw(" │ Last sync: "),
        Span::raw(station.formatted_last_sync()),
        Span::raw(" │ "),
    ];

    if summary.critical > 0 {
        spans.push(Span::styled(
            format!("{} crit ", summary.critical),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
    }
    if summary.warning > 0 {
        spans.push(Span::styled(
            format!("{} warn ", summary.warning),
            Style::default().fg(app.theme.warning),
        ));
    }
    if summary.critical == 0 && summary.warning == 0 {
        spans.push(Span::styled(
            "all normal",
            Style::default().fg(app.theme.normal),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Overview "), Line::from(" 2:History ")];

    let selected = match app.current_view {
        View::Overview => 0,
        View::History => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the offline banner, if the last cycle failed.
///
/// Returns the number of rows used.
pub fn render_error_banner(frame: &mut Frame, app: &App, area: Rect) -> u16 {
    let Some(message) = app.session.error() else {
        return 0;
    };

    let banner = Paragraph::new(format!(" ⚠ {}", message)).style(
        Style::default()
            .fg(app.theme.critical)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(banner, Rect::new(area.x, area.y, area.width, 1));
    1
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, error cause, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Overview => "←→:select Tab:switch e:export ?:help q:quit",
        View::History => "↑↓:select Tab:switch e:export ?:help q:quit",
    };

    let status = match (app.last_update, app.session.error_cause()) {
        (Some(_), Some(cause)) => format!(
            " {} | Error: {} | {}",
            app.source_description(),
            cause,
            controls
        ),
        (Some(updated), None) => format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            controls
        ),
        (None, _) => format!(" {} | Waiting for data... | q:quit", app.source_description()),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab/S-Tab   Switch views"),
        Line::from("  1 / 2       Overview / History"),
        Line::from("  ←→ ↑↓ hjkl  Select parameter"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Apply pending data"),
        Line::from("  e           Export to JSON"),
        Line::from("  q / Esc     Quit"),
        Line::from(""),
        section(" Status"),
        Line::from("  OK          Within normal range"),
        Line::from("  WARN        Warning range or alert"),
        Line::from("  CRIT        Outside safe limits"),
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

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
