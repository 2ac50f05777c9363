//! Wire records for the ThingSpeak read API.
//!
//! ThingSpeak reports every field value as a string (or `null` when the
//! field was not written for an entry). Some deployments and proxies emit
//! bare numbers instead, so all string fields are read leniently: strings are
//! kept verbatim, numbers and booleans are stringified, and `null` becomes
//! `None`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One feed entry, as returned by `feeds/last.json` or inside `feeds.json`.
///
/// Field mapping used by the station firmware:
///
/// | field | meaning |
/// |---|---|
/// | `field1` | temperature (°C) |
/// | `field2` | humidity (%) |
/// | `field3` | pressure (kPa) |
/// | `field4` | light (lumen) |
/// | `field5`..`field8` | alert flags for the above, `"1"` when raised |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub entry_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field3: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field4: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field5: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field6: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field7: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field8: Option<String>,
}

impl FeedEntry {
    /// Interpret a `last.json` body.
    ///
    /// An empty channel answers with `-1` instead of an object; that is
    /// reported as `Ok(None)` rather than an error.
    pub fn from_value(value: Value) -> Result<Option<Self>, serde_json::Error> {
        if value.is_object() {
            serde_json::from_value(value).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Channel metadata from `channels/{id}.json`.
///
/// Every field is optional; the station resolver substitutes defaults for
/// whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_entry_id: Option<u64>,
}

/// Response of `feeds.json`: the channel plus a page of entries, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub channel: Option<ChannelMetadata>,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_last_entry() {
        let json = r#"{
            "created_at": "2025-06-01T12:00:00Z",
            "entry_id": 42,
            "field1": "22.5",
            "field2": "45",
            "field3": "101.3",
            "field4": "150",
            "field5": "0",
            "field6": "0",
            "field7": "1",
            "field8": null
        }"#;

        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.entry_id, Some(42));
        assert_eq!(entry.field1.as_deref(), Some("22.5"));
        assert_eq!(entry.field7.as_deref(), Some("1"));
        assert!(entry.field8.is_none());
    }

    #[test]
    fn test_numeric_fields_are_stringified() {
        let json = r#"{"field1": 21.5, "field5": 1}"#;
        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.field1.as_deref(), Some("21.5"));
        assert_eq!(entry.field5.as_deref(), Some("1"));
        assert!(entry.created_at.is_none());
    }

    #[test]
    fn test_empty_channel_is_no_entry() {
        let value: Value = serde_json::from_str("-1").unwrap();
        assert_eq!(FeedEntry::from_value(value).unwrap(), None);
    }

    #[test]
    fn test_deserialize_feed_page() {
        let json = r#"{
            "channel": {
                "id": 2983726,
                "name": "Lab Station",
                "description": "Room 204",
                "latitude": "50.06",
                "longitude": "19.94",
                "last_entry_id": 7
            },
            "feeds": [
                {"entry_id": 6, "field1": "20.0"},
                {"entry_id": 7, "field1": "20.5"}
            ]
        }"#;

        let page: FeedPage = serde_json::from_str(json).unwrap();
        let channel = page.channel.unwrap();
        assert_eq!(channel.id, Some(2983726));
        assert_eq!(channel.description.as_deref(), Some("Room 204"));
        assert_eq!(page.feeds.len(), 2);
        assert_eq!(page.feeds[1].entry_id, Some(7));
    }
}
