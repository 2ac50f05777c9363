//! # envwatch
//!
//! A terminal dashboard and library for environmental sensor stations
//! publishing to ThingSpeak channels.
//!
//! The station reports temperature, humidity, pressure and light intensity,
//! each with an alert flag. envwatch polls the channel, classifies every
//! reading against fixed threshold bands, and renders the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐   ┌──────────┐   ┌─────────┐   ┌──────────┐     │
//! │  │   app   │──▶│ session  │──▶│   ui    │──▶│ Terminal │     │
//! │  │ (state) │   │(snapshots)   │(render) │   │          │     │
//! │  └────┬────┘   └────▲─────┘   └─────────┘   └──────────┘     │
//! │       │             │ data (parse, classify, resolve)        │
//! │       ▼             │                                        │
//! │  ┌─────────┐        │                                        │
//! │  │ source  │── PollEvent ◀── PollingSource | FileSource      │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the ThingSpeak client ([`FeedApi`]), the timer-driven
//!   [`PollingSource`], and a [`FileSource`] for offline replays
//! - **[`data`]**: parsing, threshold classification, station resolution,
//!   and history for sparklines
//! - **[`session`]**: the display state one poll outcome at a time updates
//! - **[`app`]** / **[`ui`]**: navigation and ratatui rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the default public channel
//! envwatch
//!
//! # A private channel, refreshing every 30 seconds
//! envwatch --channel 123456 --api-key XXXXXXXXXXXXXXXX --refresh 30
//!
//! # Fetch once and write JSON
//! envwatch --export snapshot.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use envwatch::{classify, Parameter, Status};
//!
//! let band = Parameter::Temperature.band();
//! assert_eq!(classify(22.0, false, &band), Status::Normal);
//! assert_eq!(classify(28.0, false, &band), Status::Warning);
//! assert_eq!(classify(31.0, false, &band), Status::Critical);
//! ```
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use envwatch::{App, PollingSource, ThingSpeakClient};
//!
//! # tokio_test::block_on(async {
//! let client = ThingSpeakClient::builder().channel("2983726").build()?;
//! let source = PollingSource::spawn(Arc::new(client), Duration::from_secs(10), 30);
//! let app = App::new(Box::new(source));
//! # Ok::<(), envwatch::FetchError>(())
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod session;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use config::{Overrides, Settings};
pub use data::{
    classify, parse_entry, resolve, Connectivity, History, Parameter, ParameterSnapshot,
    StationSnapshot, Status, ThresholdBand,
};
pub use error::FetchError;
pub use session::{Session, StatusSummary};
pub use source::{
    run_cycle, ChannelMetadata, DataSource, FeedApi, FeedEntry, FileSource, PollEvent,
    PollingSource, ThingSpeakClient,
};
