//! Parsing raw feed entries into typed readings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::source::FeedEntry;

/// A monitored environmental parameter.
///
/// Variants are declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Temperature,
    Humidity,
    Pressure,
    Light,
}

impl Parameter {
    /// All parameters in display order.
    pub const ALL: [Parameter; 4] = [
        Parameter::Temperature,
        Parameter::Humidity,
        Parameter::Pressure,
        Parameter::Light,
    ];

    /// Stable identifier, used in exports.
    pub fn id(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Humidity => "humidity",
            Parameter::Pressure => "pressure",
            Parameter::Light => "light",
        }
    }

    /// Display name for cards and tables.
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Temperature => "Temperature",
            Parameter::Humidity => "Humidity",
            Parameter::Pressure => "Pressure",
            Parameter::Light => "Light Intensity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Humidity => "%",
            Parameter::Pressure => "hPa",
            Parameter::Light => "lumen",
        }
    }

    /// Number of decimal places shown for this parameter.
    pub fn precision(&self) -> usize {
        match self {
            Parameter::Temperature | Parameter::Humidity => 1,
            Parameter::Pressure | Parameter::Light => 0,
        }
    }

    /// Round a value to this parameter's display precision.
    pub fn round_for_display(&self, value: f64) -> f64 {
        match self.precision() {
            1 => (value * 10.0).round() / 10.0,
            _ => value.round(),
        }
    }

    /// Format a value with this parameter's precision (no unit).
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.precision(), value)
    }
}

/// One parsed sensor value and its alert flag for a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub parameter: Parameter,
    /// Value in display units (pressure already converted to hPa).
    pub value: f64,
    pub alert: bool,
    pub observed_at: Option<DateTime<Utc>>,
}

/// kPa → hPa.
const PRESSURE_SCALE: f64 = 10.0;

/// Parse a feed entry into one reading per parameter, in display order.
///
/// Missing or non-numeric fields read as 0. Alert flags are raised only by
/// the exact string `"1"`.
pub fn parse_entry(entry: &FeedEntry) -> [Reading; 4] {
    trace!(?entry, "raw feed entry");

    let observed_at = entry.created_at.as_deref().and_then(parse_timestamp);

    let temperature = parse_value(entry.field1.as_deref());
    let humidity = parse_value(entry.field2.as_deref());
    let pressure = parse_value(entry.field3.as_deref()) * PRESSURE_SCALE;
    let light = parse_value(entry.field4.as_deref());

    let readings = [
        (Parameter::Temperature, temperature, &entry.field5),
        (Parameter::Humidity, humidity, &entry.field6),
        (Parameter::Pressure, pressure, &entry.field7),
        (Parameter::Light, light, &entry.field8),
    ]
    .map(|(parameter, value, flag)| Reading {
        parameter,
        value,
        alert: parse_flag(flag.as_deref()),
        observed_at,
    });

    trace!(
        temperature,
        humidity,
        pressure,
        light,
        alerts = ?readings.map(|r| r.alert),
        "parsed readings"
    );

    readings
}

/// Parse a numeric field, falling back to 0.
///
/// Accepts a leading decimal number and ignores trailing text, so `"21.5C"`
/// reads as 21.5. Anything without a numeric prefix, and any non-finite
/// result, reads as 0.
pub fn parse_value(raw: Option<&str>) -> f64 {
    raw.and_then(leading_number).filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw == Some("1")
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    end = digits(end);
    if bytes.get(end) == Some(&b'.') {
        end = digits(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
