//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::session::Session;
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Station header, alerts and one card per parameter.
    Overview,
    /// Recent values, min/max and sparklines per parameter.
    History,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::History,
            View::History => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views: previous and next coincide.
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::History => "History",
        }
    }
}

/// Main application state.
///
/// Owns the data source and the [`Session`] it feeds: the app is the
/// polling driver, and rendering only reads the session.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub session: Session,
    pub last_update: Option<Instant>,

    // Navigation state
    pub selected_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given data source.
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self::with_theme(source, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme (skips terminal detection).
    pub fn with_theme(source: Box<dyn DataSource>, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            session: Session::new(),
            last_update: None,
            selected_index: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Apply every pending event from the data source to the session.
    ///
    /// Returns true if at least one event was applied.
    pub fn reload_data(&mut self) -> bool {
        let mut applied = false;
        while let Some(event) = self.source.poll() {
            self.session.apply(event, Utc::now());
            applied = true;
        }

        if applied {
            self.last_update = Some(Instant::now());
            let count = self.session.parameters().len();
            if self.selected_index >= count {
                self.selected_index = count.saturating_sub(1);
            }
        }
        applied
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

    /// Move selection to the next parameter.
    pub fn select_next(&mut self) {
        let max = self.session.parameters().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max);
    }

    /// Move selection to the previous parameter.
    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        write_export(&self.session, path)
    }
}

/// Write a session as pretty JSON.
pub fn write_export(session: &Session, path: &Path) -> Result<()> {
    if !session.is_loaded() {
        anyhow::bail!("No data to export");
    }

    let json = serde_json::to_string_pretty(&session.export())?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "exported session");
    Ok(())
}
