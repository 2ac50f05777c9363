//! Terminal rendering.
//!
//! - [`overview`]: alert summary and parameter cards
//! - [`history`]: recent values with sparklines
//! - [`common`]: header, tabs, banner, status bar and help overlay

pub mod common;
pub mod history;
pub mod overview;
pub mod theme;

pub use theme::Theme;
