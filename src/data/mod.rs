//! Data models and processing for sensor feeds.
//!
//! This module handles the transformation of raw feed entries into
//! classified, display-ready snapshots.
//!
//! ## Submodules
//!
//! - [`reading`]: Parsing raw string fields into typed [`Reading`]s
//! - [`classify`]: Threshold bands and the [`classify`](classify::classify) function
//! - [`station`]: Station identity and the [`resolve`] function
//! - [`history`]: Recent values for sparklines
//!
//! ## Data Flow
//!
//! ```text
//! FeedEntry (raw strings)
//!        │
//!        ▼
//! parse_entry() ──▶ [Reading; 4]
//!        │
//!        ▼
//! ParameterSnapshot::from_reading() (status from ThresholdBand)
//!        │
//!        └──▶ History::record() (for sparklines)
//!
//! ChannelMetadata ──▶ resolve() ──▶ StationSnapshot
//! ```

pub mod classify;
pub mod history;
pub mod reading;
pub mod station;

pub use classify::{classify, snapshot_entry, BandPolicy, ParameterSnapshot, Status, ThresholdBand};
pub use history::{History, MAX_HISTORY};
pub use reading::{parse_entry, parse_value, Parameter, Reading};
pub use station::{resolve, Connectivity, Coordinates, StationSnapshot};
