//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{Connectivity, Status};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level parameters.
    pub warning: Color,
    /// Color for critical-level parameters and the error banner.
    pub critical: Color,
    /// Color for normal parameters and an online station.
    pub normal: Color,
    /// Color for borders and separators.
    pub border: Color,
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
            normal: Color::Green,
            border: Color::Gray,
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
            warning: Color::Rgb(184, 134, 11),
            critical: Color::Red,
            normal: Color::Rgb(0, 128, 0),
            border: Color::DarkGray,
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

    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Normal => self.normal,
            Status::Warning => self.warning,
            Status::Critical => self.critical,
        }
    }

    /// Get style for a parameter status
    pub fn status_style(&self, status: Status) -> Style {
        let style = Style::default().fg(self.status_color(status));
        if status == Status::Critical {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Border style for a parameter card.
    pub fn card_border(&self, status: Status, selected: bool) -> Style {
        let style = Style::default().fg(self.status_color(status));
        if selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn connectivity_style(&self, connectivity: Connectivity) -> Style {
        match connectivity {
            Connectivity::Online => Style::default().fg(self.normal).add_modifier(Modifier::BOLD),
            Connectivity::Offline => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.status_color(Status::Normal), Color::Green);
        assert_eq!(theme.status_color(Status::Warning), Color::Yellow);
        assert_eq!(theme.status_color(Status::Critical), Color::Red);
        assert!(theme
            .status_style(Status::Critical)
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_selected_card_is_bold() {
        let theme = Theme::light();
        assert!(theme
            .card_border(Status::Normal, true)
            .add_modifier
            .contains(Modifier::BOLD));
        assert!(!theme
            .card_border(Status::Normal, false)
            .add_modifier
            .contains(Modifier::BOLD));
    }
}
