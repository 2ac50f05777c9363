//! Display state owned by the polling driver.
//!
//! The session holds the latest parameter snapshots and station snapshot.
//! Each applied event replaces them wholesale; the UI only reads them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::data::{
    resolve, snapshot_entry, Connectivity, History, ParameterSnapshot, StationSnapshot, Status,
};
use crate::source::PollEvent;

/// Banner text shown when the latest-entry fetch fails.
pub const OFFLINE_MESSAGE: &str = "Failed to fetch sensor data. Using offline mode.";

/// Counts of parameters by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
}

/// Serializable view of a session, for export.
#[derive(Debug, Serialize)]
pub struct SessionExport<'a> {
    pub station: &'a StationSnapshot,
    pub summary: StatusSummary,
    pub parameters: &'a [ParameterSnapshot],
}

/// Mutable display state for one dashboard run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    parameters: Vec<ParameterSnapshot>,
    station: StationSnapshot,
    error: Option<String>,
    error_cause: Option<String>,
    loaded: bool,
    history: History,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one poll outcome.
    ///
    /// `now` stamps the station's last sync when metadata is available.
    pub fn apply(&mut self, event: PollEvent, now: DateTime<Utc>) {
        match event {
            PollEvent::Cycle { entry, channel } => {
                self.error = None;
                self.error_cause = None;

                if let Some(entry) = entry {
                    let parameters = snapshot_entry(&entry);
                    self.history.record(&parameters);
                    self.parameters = parameters;
                    debug!(entry_id = ?entry.entry_id, "parameters updated");
                }

                let metadata = match channel {
                    Ok(meta) => Some(meta),
                    Err(err) => {
                        warn!(error = %err, "could not fetch channel info");
                        None
                    }
                };
                let station = resolve(metadata.as_ref(), &self.station, now);
                if station.connectivity != self.station.connectivity {
                    info!(status = station.connectivity.label(), "station connectivity changed");
                }
                self.station = station;
                self.loaded = true;
            }
            PollEvent::Failed(err) => {
                self.error = Some(OFFLINE_MESSAGE.to_string());
                self.error_cause = Some(err.to_string());
                self.station = resolve(None, &self.station, now);
                self.loaded = true;
            }
            PollEvent::Backfill(entries) => {
                debug!(entries = entries.len(), "backfilling history");
                self.history.backfill(&entries);
            }
        }
    }

    /// Latest parameter snapshots, in display order.
    pub fn parameters(&self) -> &[ParameterSnapshot] {
        &self.parameters
    }

    pub fn station(&self) -> &StationSnapshot {
        &self.station
    }

    /// Banner message from the last failed cycle, cleared by the next good one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Underlying cause of the last failure.
    pub fn error_cause(&self) -> Option<&str> {
        self.error_cause.as_deref()
    }

    /// Whether any cycle outcome has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_online(&self) -> bool {
        self.station.connectivity == Connectivity::Online
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for parameter in &self.parameters {
            match parameter.status {
                Status::Normal => summary.normal += 1,
                Status::Warning => summary.warning += 1,
                Status::Critical => summary.critical += 1,
            }
        }
        summary
    }

    pub fn export(&self) -> SessionExport<'_> {
        SessionExport {
            station: &self.station,
            summary: self.summary(),
            parameters: &self.parameters,
        }
    }
}
