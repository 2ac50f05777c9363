//! Timer-driven data source.
//!
//! Runs poll cycles against a [`FeedApi`] on a fixed cadence in the
//! background and makes their outcomes available via `poll()`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{run_cycle, DataSource, EntriesQuery, FeedApi, PollEvent};

/// A data source that polls a feed on a fixed interval.
///
/// Every tick spawns one independent poll cycle. Cycles are not serialized:
/// if a cycle is still in flight when the next tick fires, both run and
/// their outcomes are delivered in completion order (last write wins).
///
/// Dropping the source (or calling [`cancel`](Self::cancel)) stops future
/// ticks. Cycles already in flight are left to finish on their own and their
/// outcomes are discarded.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use envwatch::{PollingSource, ThingSpeakClient};
///
/// # tokio_test::block_on(async {
/// let client = ThingSpeakClient::builder().channel("2983726").build().unwrap();
/// let source = PollingSource::spawn(Arc::new(client), Duration::from_secs(10), 30);
/// # });
/// ```
#[derive(Debug)]
pub struct PollingSource {
    receiver: mpsc::Receiver<PollEvent>,
    description: String,
    timer: JoinHandle<()>,
}

impl PollingSource {
    /// Spawn the polling timer. Must be called within a tokio runtime.
    ///
    /// The first cycle runs immediately. When `backfill` is non-zero, the
    /// `backfill` most recent entries are fetched once, concurrently with
    /// the first cycle, and delivered as [`PollEvent::Backfill`].
    pub fn spawn(api: Arc<dyn FeedApi>, interval: Duration, backfill: u32) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let description = format!("thingspeak: {}", api.description());

        if backfill > 0 {
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                match api.entries(&EntriesQuery::latest(backfill)).await {
                    Ok(page) => {
                        debug!(entries = page.feeds.len(), "history backfill fetched");
                        let _ = tx.send(PollEvent::Backfill(page.feeds)).await;
                    }
                    Err(err) => warn!(error = %err, "could not backfill history"),
                }
            });
        }

        let timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }

                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let event = run_cycle(api.as_ref()).await;
                    // Receiver gone means the source was dropped mid-cycle.
                    let _ = tx.send(event).await;
                });
            }
        });

        Self {
            receiver: rx,
            description,
            timer,
        }
    }

    /// Stop future poll cycles.
    pub fn cancel(&self) {
        self.timer.abort();
    }

    /// Whether the timer is still running.
    pub fn is_running(&self) -> bool {
        !self.timer.is_finished()
    }
}

impl Drop for PollingSource {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

impl DataSource for PollingSource {
    fn poll(&mut self) -> Option<PollEvent> {
        // Try to receive without blocking
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::StubFeed;
    use crate::source::FeedEntry;

    fn entry(temperature: &str) -> FeedEntry {
        FeedEntry {
            field1: Some(temperature.to_string()),
            ..FeedEntry::default()
        }
    }

    #[tokio::test]
    async fn test_first_cycle_runs_immediately() {
        let feed = Arc::new(StubFeed::with_entry(entry("21.0")));
        let mut source = PollingSource::spawn(feed.clone(), Duration::from_secs(60), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;

        match source.poll() {
            Some(PollEvent::Cycle { entry, .. }) => {
                assert_eq!(entry.unwrap().field1.as_deref(), Some("21.0"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(source.poll().is_none());
        assert_eq!(feed.latest_calls(), 1);
    }

    #[tokio::test]
    async fn test_repeats_on_interval() {
        let feed = Arc::new(StubFeed::with_entry(entry("21.0")));
        let mut source = PollingSource::spawn(feed.clone(), Duration::from_millis(20), 0);

        tokio::time::sleep(Duration::from_millis(110)).await;

        let mut cycles = 0;
        while let Some(event) = source.poll() {
            assert!(matches!(event, PollEvent::Cycle { .. }));
            cycles += 1;
        }
        assert!(cycles >= 3, "expected at least 3 cycles, got {}", cycles);
    }

    #[tokio::test]
    async fn test_failure_is_delivered_and_polling_continues() {
        let feed = Arc::new(StubFeed::default());
        *feed.fail_latest.lock().unwrap() = true;
        let mut source = PollingSource::spawn(feed.clone(), Duration::from_millis(20), 0);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(matches!(source.poll(), Some(PollEvent::Failed(_))));

        *feed.fail_latest.lock().unwrap() = false;
        tokio::time::sleep(Duration::from_millis(60)).await;

        let mut recovered = false;
        while let Some(event) = source.poll() {
            if matches!(event, PollEvent::Cycle { .. }) {
                recovered = true;
            }
        }
        assert!(recovered);
    }

    #[tokio::test]
    async fn test_cancel_stops_future_cycles() {
        let feed = Arc::new(StubFeed::with_entry(entry("21.0")));
        let source = PollingSource::spawn(feed.clone(), Duration::from_millis(20), 0);

        tokio::time::sleep(Duration::from_millis(30)).await;
        source.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!source.is_running());

        let calls = feed.latest_calls();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(feed.latest_calls(), calls);
    }

    #[tokio::test]
    async fn test_backfill_delivered() {
        let feed = Arc::new(StubFeed {
            history: vec![entry("19.0"), entry("20.0")],
            ..StubFeed::default()
        });
        let mut source = PollingSource::spawn(feed, Duration::from_secs(60), 2);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut backfilled = None;
        while let Some(event) = source.poll() {
            if let PollEvent::Backfill(entries) = event {
                backfilled = Some(entries.len());
            }
        }
        assert_eq!(backfilled, Some(2));
    }

    #[tokio::test]
    async fn test_description() {
        let feed = Arc::new(StubFeed::default());
        let source = PollingSource::spawn(feed, Duration::from_secs(60), 0);
        assert_eq!(source.description(), "thingspeak: stub");
    }
}
