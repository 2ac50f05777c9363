//! Data source abstraction for receiving poll cycle outcomes.
//!
//! A poll cycle is one fetch of the latest feed entry followed by one fetch
//! of the channel metadata. Sources deliver the outcome of each cycle as a
//! [`PollEvent`]; the session applies them in arrival order.

mod feed;
mod file;
mod poller;
mod thingspeak;

pub use feed::{ChannelMetadata, FeedEntry, FeedPage};
pub use file::FileSource;
pub use poller::PollingSource;
pub use thingspeak::{
    EntriesQuery, FeedApi, ThingSpeakClient, ThingSpeakClientBuilder, DEFAULT_BASE_URL,
};

use std::fmt::Debug;

use tracing::{debug, error};

use crate::error::FetchError;

/// Outcome of one poll cycle (or of the startup history backfill).
#[derive(Debug)]
pub enum PollEvent {
    /// The latest-entry fetch succeeded.
    ///
    /// `entry` is `None` when the channel has no entries yet. The channel
    /// metadata fetch runs after the entry fetch and may fail independently.
    Cycle {
        entry: Option<FeedEntry>,
        channel: Result<ChannelMetadata, FetchError>,
    },
    /// The latest-entry fetch failed; channel metadata was not requested.
    Failed(FetchError),
    /// Recent entries, oldest first, for seeding reading history.
    Backfill(Vec<FeedEntry>),
}

/// Trait for receiving poll outcomes from various sources.
///
/// Implementations deliver [`PollEvent`]s from different backends - the
/// ThingSpeak HTTP API on a timer, or a local JSON file.
///
/// # Example
///
/// ```
/// use envwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("feed.json");
/// if let Some(event) = source.poll() {
///     println!("{:?}", event);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next pending event.
    ///
    /// Returns `Some(event)` if an event is ready, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<PollEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Run one poll cycle against a feed.
///
/// Failure of the latest-entry fetch ends the cycle; failure of the metadata
/// fetch is carried inside the [`PollEvent::Cycle`].
pub async fn run_cycle(api: &dyn FeedApi) -> PollEvent {
    debug!("starting poll cycle");

    let entry = match api.latest_entry().await {
        Ok(entry) => entry,
        Err(err) => {
            error!(error = %err, "error fetching latest entry");
            return PollEvent::Failed(err);
        }
    };

    let channel = api.channel_info().await;
    debug!(
        has_entry = entry.is_some(),
        channel_ok = channel.is_ok(),
        "poll cycle finished"
    );

    PollEvent::Cycle { entry, channel }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory feed for driving sources in tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Debug, Default)]
    pub struct StubFeed {
        pub entry: Mutex<Option<FeedEntry>>,
        pub fail_latest: Mutex<bool>,
        pub fail_channel: Mutex<bool>,
        pub history: Vec<FeedEntry>,
        pub latest_calls: AtomicUsize,
    }

    impl StubFeed {
        pub fn with_entry(entry: FeedEntry) -> Self {
            Self {
                entry: Mutex::new(Some(entry)),
                ..Self::default()
            }
        }

        pub fn latest_calls(&self) -> usize {
            self.latest_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedApi for StubFeed {
        async fn latest_entry(&self) -> Result<Option<FeedEntry>, FetchError> {
            self.latest_calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail_latest.lock().unwrap() {
                return Err(FetchError::Status {
                    what: "latest entry",
                    status: 500,
                });
            }
            Ok(self.entry.lock().unwrap().clone())
        }

        async fn channel_info(&self) -> Result<ChannelMetadata, FetchError> {
            if *self.fail_channel.lock().unwrap() {
                return Err(FetchError::Timeout);
            }
            Ok(ChannelMetadata {
                id: Some(7),
                name: Some("Stub Station".to_string()),
                ..ChannelMetadata::default()
            })
        }

        async fn entries(&self, _query: &EntriesQuery) -> Result<FeedPage, FetchError> {
            Ok(FeedPage {
                channel: None,
                feeds: self.history.clone(),
            })
        }

        fn description(&self) -> String {
            "stub".to_string()
        }
    }
}
