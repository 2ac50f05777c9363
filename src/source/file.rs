//! File-based data source.
//!
//! Polls a local JSON file holding either a single feed entry (the shape of
//! `feeds/last.json`) or a page of entries with channel metadata (the shape
//! of `feeds.json`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;
use tracing::warn;

use super::{ChannelMetadata, DataSource, FeedEntry, FeedPage, PollEvent};
use crate::error::FetchError;

/// A data source that reads feed snapshots from a JSON file.
///
/// Useful for replaying a captured response or running without network
/// access. The source tracks the file's modification time and only returns
/// an event when the file has changed since the last attempt.
///
/// A failed read (missing file, bad JSON) is reported once and not retried
/// until the file changes again. A file that disappears after a good read is
/// reported as one failure, so the station goes offline.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    /// Modification time seen at the last attempt; `Some(None)` when the
    /// file was absent, `None` before the first attempt.
    last_seen: Option<Option<SystemTime>>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_seen: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file's modification time.
    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and interpret the file.
    fn read_file(&self) -> Result<PollEvent, FetchError> {
        let content = fs::read_to_string(&self.path).map_err(|e| FetchError::Read(e.to_string()))?;
        let value: Value = serde_json::from_str(&content)?;
        parse_document(value)
    }
}

/// Turn a file document into a cycle outcome.
///
/// A document without channel metadata resolves the station from defaults.
fn parse_document(value: Value) -> Result<PollEvent, FetchError> {
    if value.get("feeds").is_some() {
        let mut page: FeedPage = serde_json::from_value(value)?;
        let entry = page.feeds.pop();
        let channel = page.channel.unwrap_or_default();
        return Ok(PollEvent::Cycle {
            entry,
            channel: Ok(channel),
        });
    }

    let entry = FeedEntry::from_value(value)?;
    Ok(PollEvent::Cycle {
        entry,
        channel: Ok(ChannelMetadata::default()),
    })
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<PollEvent> {
        let current_modified = self.get_modified_time();

        // Check if file has changed since the last attempt
        let file_changed = match (self.last_seen, current_modified) {
            (None, _) => true,                  // Nothing tried yet
            (Some(None), None) => false,        // Still missing, already reported
            (Some(Some(_)), None) => true,      // File disappeared
            (Some(None), Some(_)) => true,      // File appeared
            (Some(Some(last)), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        self.last_seen = Some(current_modified);

        match self.read_file() {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read feed file");
                Some(PollEvent::Failed(err))
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn last_entry_json() -> &'static str {
        r#"{
            "created_at": "2025-06-01T12:00:00Z",
            "entry_id": 10,
            "field1": "22.0",
            "field2": "45.0",
            "field3": "101.5",
            "field4": "150",
            "field5": "0",
            "field6": "0",
            "field7": "0",
            "field8": "0"
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/feed.json");
        assert_eq!(source.path(), Path::new("/tmp/feed.json"));
        assert_eq!(source.description(), "file: /tmp/feed.json");
    }

    #[test]
    fn test_file_source_reads_last_entry() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", last_entry_json()).unwrap();

        let mut source = FileSource::new(file.path());

        match source.poll() {
            Some(PollEvent::Cycle { entry, channel }) => {
                assert_eq!(entry.unwrap().entry_id, Some(10));
                assert_eq!(channel.unwrap(), ChannelMetadata::default());
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // Second poll without file change should return None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_reads_feed_page() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "channel": {{"id": 99, "name": "Greenhouse"}},
                "feeds": [{{"entry_id": 1}}, {{"entry_id": 2}}]
            }}"#
        )
        .unwrap();

        let mut source = FileSource::new(file.path());

        match source.poll() {
            Some(PollEvent::Cycle { entry, channel }) => {
                assert_eq!(entry.unwrap().entry_id, Some(2));
                assert_eq!(channel.unwrap().name.as_deref(), Some("Greenhouse"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_file_source_empty_feed_page() {
        let event = parse_document(serde_json::json!({"feeds": []})).unwrap();
        assert!(matches!(event, PollEvent::Cycle { entry: None, .. }));
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/feed.json");

        match source.poll() {
            Some(PollEvent::Failed(FetchError::Read(msg))) => assert!(!msg.is_empty()),
            other => panic!("unexpected event: {:?}", other),
        }

        // Reported once; nothing more until the file shows up
        assert!(source.poll().is_none());
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(matches!(
            source.poll(),
            Some(PollEvent::Failed(FetchError::Parse(_)))
        ));
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_broken_after_good_read() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", last_entry_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(matches!(source.poll(), Some(PollEvent::Cycle { .. })));

        std::fs::write(file.path(), "not valid json").unwrap();
        file.as_file()
            .set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        assert!(matches!(
            source.poll(),
            Some(PollEvent::Failed(FetchError::Parse(_)))
        ));
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_disappears_after_good_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(&path, last_entry_json()).unwrap();

        let mut source = FileSource::new(&path);
        assert!(matches!(source.poll(), Some(PollEvent::Cycle { .. })));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            source.poll(),
            Some(PollEvent::Failed(FetchError::Read(_)))
        ));
        assert!(source.poll().is_none());

        // Coming back is picked up again
        std::fs::write(&path, last_entry_json()).unwrap();
        assert!(matches!(source.poll(), Some(PollEvent::Cycle { .. })));
    }
}
