//! Station identity and connectivity.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::source::ChannelMetadata;

pub const DEFAULT_STATION_ID: &str = "station-001";
pub const DEFAULT_STATION_NAME: &str = "Environmental Station Alpha";
pub const DEFAULT_STATION_LOCATION: &str = "Building A - Floor 3";

/// Whether the station's data is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn label(&self) -> &'static str {
        match self {
            Connectivity::Online => "Online",
            Connectivity::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Identity, location and connectivity of the monitored station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub id: String,
    pub name: String,
    pub location: String,
    pub connectivity: Connectivity,
    /// Time of the last successful metadata sync; `None` before the first.
    pub last_sync_time: Option<DateTime<Utc>>,
    pub coordinates: Option<Coordinates>,
}

impl Default for StationSnapshot {
    fn default() -> Self {
        Self {
            id: DEFAULT_STATION_ID.to_string(),
            name: DEFAULT_STATION_NAME.to_string(),
            location: DEFAULT_STATION_LOCATION.to_string(),
            connectivity: Connectivity::Offline,
            last_sync_time: None,
            coordinates: None,
        }
    }
}

impl StationSnapshot {
    /// Last sync as `YYYY-MM-DD, HH:MM:SS` in local time, or `never`.
    pub fn formatted_last_sync(&self) -> String {
        match self.last_sync_time {
            Some(time) => format_sync_time(time.with_timezone(&Local)),
            None => "never".to_string(),
        }
    }
}

fn format_sync_time<Tz: chrono::TimeZone>(time: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%Y-%m-%d, %H:%M:%S").to_string()
}

/// Derive the station snapshot for this cycle.
///
/// With metadata, every field is taken from it (empty strings count as
/// absent and fall back to the defaults), connectivity is online and the
/// sync time is stamped with `now`. Without metadata, the previous identity
/// is kept, connectivity goes offline and the sync time is left untouched.
pub fn resolve(
    metadata: Option<&ChannelMetadata>,
    previous: &StationSnapshot,
    now: DateTime<Utc>,
) -> StationSnapshot {
    let Some(meta) = metadata else {
        return StationSnapshot {
            connectivity: Connectivity::Offline,
            ..previous.clone()
        };
    };

    StationSnapshot {
        id: meta
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| DEFAULT_STATION_ID.to_string()),
        name: non_empty(&meta.name)
            .unwrap_or(DEFAULT_STATION_NAME)
            .to_string(),
        location: non_empty(&meta.description)
            .unwrap_or(DEFAULT_STATION_LOCATION)
            .to_string(),
        connectivity: Connectivity::Online,
        last_sync_time: Some(now),
        coordinates: parse_coordinates(meta),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_coordinates(meta: &ChannelMetadata) -> Option<Coordinates> {
    let parse = |field: &Option<String>| {
        non_empty(field)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    };
    Some(Coordinates {
        latitude: parse(&meta.latitude)?,
        longitude: parse(&meta.longitude)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
    }

    fn lab_metadata() -> ChannelMetadata {
        ChannelMetadata {
            id: Some(2983726),
            name: Some("Lab Station".to_string()),
            description: Some("Room 204".to_string()),
            latitude: Some("50.0614".to_string()),
            longitude: Some("19.9366".to_string()),
            ..ChannelMetadata::default()
        }
    }

    #[test]
    fn test_resolve_maps_metadata() {
        let station = resolve(Some(&lab_metadata()), &StationSnapshot::default(), at(0));

        assert_eq!(station.id, "2983726");
        assert_eq!(station.name, "Lab Station");
        assert_eq!(station.location, "Room 204");
        assert_eq!(station.connectivity, Connectivity::Online);
        assert_eq!(station.last_sync_time, Some(at(0)));
        let coords = station.coordinates.unwrap();
        assert!((coords.latitude - 50.0614).abs() < 1e-9);
        assert!((coords.longitude - 19.9366).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_defaults_absent_fields() {
        let meta = ChannelMetadata {
            name: Some(String::new()),
            latitude: Some("50.0".to_string()),
            ..ChannelMetadata::default()
        };
        let previous = StationSnapshot {
            name: "Old".to_string(),
            ..StationSnapshot::default()
        };

        let station = resolve(Some(&meta), &previous, at(5));

        assert_eq!(station.id, DEFAULT_STATION_ID);
        assert_eq!(station.name, DEFAULT_STATION_NAME);
        assert_eq!(station.location, DEFAULT_STATION_LOCATION);
        assert_eq!(station.connectivity, Connectivity::Online);
        assert_eq!(station.last_sync_time, Some(at(5)));
        // Only one coordinate present.
        assert!(station.coordinates.is_none());
    }

    #[test]
    fn test_resolve_zero_id_is_kept() {
        let meta = ChannelMetadata {
            id: Some(0),
            ..ChannelMetadata::default()
        };
        let station = resolve(Some(&meta), &StationSnapshot::default(), at(0));
        assert_eq!(station.id, "0");
    }

    #[test]
    fn test_resolve_without_metadata_goes_offline() {
        let online = resolve(Some(&lab_metadata()), &StationSnapshot::default(), at(0));

        let offline = resolve(None, &online, at(30));

        assert_eq!(offline.id, "2983726");
        assert_eq!(offline.name, "Lab Station");
        assert_eq!(offline.location, "Room 204");
        assert_eq!(offline.connectivity, Connectivity::Offline);
        assert_eq!(offline.last_sync_time, Some(at(0)));
        assert_eq!(offline.coordinates, online.coordinates);
    }

    #[test]
    fn test_default_station() {
        let station = StationSnapshot::default();
        assert_eq!(station.id, "station-001");
        assert_eq!(station.connectivity, Connectivity::Offline);
        assert_eq!(station.formatted_last_sync(), "never");
    }

    #[test]
    fn test_format_sync_time() {
        let time = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_sync_time(time), "2025-03-07, 09:05:02");
    }
}
