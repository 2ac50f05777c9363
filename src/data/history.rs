//! Historical reading tracking for sparklines and min/max.

use std::collections::{HashMap, VecDeque};

use super::classify::{snapshot_entry, ParameterSnapshot};
use super::reading::Parameter;
use crate::source::FeedEntry;

/// Maximum number of samples to keep per parameter.
pub const MAX_HISTORY: usize = 60;

/// Tracks recent values for trending and sparklines.
///
/// History is display-only: it never feeds back into classification.
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: HashMap<Parameter, VecDeque<f64>>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one poll cycle's snapshots.
    pub fn record(&mut self, snapshots: &[ParameterSnapshot]) {
        for snapshot in snapshots {
            let values = self.samples.entry(snapshot.parameter).or_default();
            values.push_back(snapshot.display_value);
            if values.len() > MAX_HISTORY {
                values.pop_front();
            }
        }
    }

    /// Seed history from past entries (oldest first).
    ///
    /// Backfilled samples go in front of anything already recorded, so a
    /// late-arriving backfill does not reorder live samples.
    pub fn backfill(&mut self, entries: &[FeedEntry]) {
        let mut past = History::new();
        for entry in entries {
            past.record(&snapshot_entry(entry));
        }

        for (parameter, mut older) in past.samples {
            let values = self.samples.entry(parameter).or_default();
            older.extend(values.drain(..));
            while older.len() > MAX_HISTORY {
                older.pop_front();
            }
            *values = older;
        }
    }

    /// Recorded samples for a parameter, oldest first.
    pub fn samples(&self, parameter: Parameter) -> Option<&VecDeque<f64>> {
        self.samples.get(&parameter)
    }

    /// Number of samples recorded for a parameter.
    pub fn len(&self, parameter: Parameter) -> usize {
        self.samples.get(&parameter).map_or(0, VecDeque::len)
    }

    /// Minimum and maximum recorded value.
    pub fn range(&self, parameter: Parameter) -> Option<(f64, f64)> {
        let values = self.samples.get(&parameter)?;
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }

    /// Get sparkline data (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, parameter: Parameter) -> Vec<u8> {
        let Some(values) = self.samples.get(&parameter) else {
            return Vec::new();
        };

        if values.len() < 2 {
            return Vec::new();
        }

        let Some((min, max)) = self.range(parameter) else {
            return Vec::new();
        };
        let range = max - min;

        values
            .iter()
            .map(|&v| {
                if range <= f64::EPSILON {
                    return 0;
                }
                let normalized = ((v - min) / range * 7.0).round() as u8;
                normalized.min(7)
            })
            .collect()
    }
}
