//! Threshold bands and status classification.
//!
//! Each parameter has a fixed [`ThresholdBand`]. Classification is a pure
//! function of `(value, alert, band)`: no history, no hidden state.
//!
//! The bands do not all share one shape, so each carries a [`BandPolicy`]:
//!
//! | Parameter | normal | warning | policy |
//! |---|---|---|---|
//! | temperature | 18–25 | 15–30 | [`Nested`](BandPolicy::Nested) |
//! | humidity | 30–50 | 10–80 | [`Nested`](BandPolicy::Nested) |
//! | pressure | 990–1020 | 980–989 | [`SubBand`](BandPolicy::SubBand), critical outside 950–1050 |
//! | light | 100–200 | 1–99 | [`ZeroCritical`](BandPolicy::ZeroCritical) |

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::reading::{parse_entry, Parameter, Reading};
use crate::source::FeedEntry;

/// Status of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Warning,
    Critical,
}

impl Status {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Normal => "OK",
            Status::Warning => "WARN",
            Status::Critical => "CRIT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }
}

/// How a band turns a value and alert flag into a status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandPolicy {
    /// The warning range encloses the normal range.
    ///
    /// Outside the warning range is critical. Inside it, a raised alert or a
    /// value outside the normal range is a warning.
    Nested,
    /// The warning range is a narrow sub-band next to the normal range.
    ///
    /// Inside the sub-band is always a warning, even with the alert raised.
    /// Elsewhere a raised alert is critical, and without one only values
    /// outside `critical_min..=critical_max` are critical.
    SubBand { critical_min: f64, critical_max: f64 },
    /// Zero means the sensor sees nothing.
    ///
    /// Zero or above the normal maximum is critical. A raised alert, or a
    /// positive value below the normal minimum, is a warning.
    ZeroCritical,
}

/// Fixed normal/warning ranges for one parameter. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdBand {
    pub normal_min: f64,
    pub normal_max: f64,
    pub warning_min: f64,
    pub warning_max: f64,
    pub policy: BandPolicy,
}

impl ThresholdBand {
    pub fn in_normal(&self, value: f64) -> bool {
        value >= self.normal_min && value <= self.normal_max
    }

    pub fn in_warning(&self, value: f64) -> bool {
        value >= self.warning_min && value <= self.warning_max
    }
}

impl Parameter {
    /// The fixed threshold band for this parameter.
    pub fn band(&self) -> ThresholdBand {
        match self {
            Parameter::Temperature => ThresholdBand {
                normal_min: 18.0,
                normal_max: 25.0,
                warning_min: 15.0,
                warning_max: 30.0,
                policy: BandPolicy::Nested,
            },
            Parameter::Humidity => ThresholdBand {
                normal_min: 30.0,
                normal_max: 50.0,
                warning_min: 10.0,
                warning_max: 80.0,
                policy: BandPolicy::Nested,
            },
            Parameter::Pressure => ThresholdBand {
                normal_min: 990.0,
                normal_max: 1020.0,
                warning_min: 980.0,
                warning_max: 989.0,
                policy: BandPolicy::SubBand {
                    critical_min: 950.0,
                    critical_max: 1050.0,
                },
            },
            Parameter::Light => ThresholdBand {
                normal_min: 100.0,
                normal_max: 200.0,
                warning_min: 1.0,
                warning_max: 99.0,
                policy: BandPolicy::ZeroCritical,
            },
        }
    }
}

/// Classify a value against a band.
///
/// Never fails: invalid input has already been read as 0 by the parser and
/// is classified like any other value.
pub fn classify(value: f64, alert: bool, band: &ThresholdBand) -> Status {
    match band.policy {
        BandPolicy::Nested => {
            if !band.in_warning(value) {
                Status::Critical
            } else if alert || !band.in_normal(value) {
                Status::Warning
            } else {
                Status::Normal
            }
        }
        BandPolicy::SubBand {
            critical_min,
            critical_max,
        } => {
            if band.in_warning(value) {
                Status::Warning
            } else if alert || value < critical_min || value > critical_max {
                Status::Critical
            } else {
                Status::Normal
            }
        }
        BandPolicy::ZeroCritical => {
            if value == 0.0 || value > band.normal_max {
                Status::Critical
            } else if alert || (value > 0.0 && value < band.normal_min) {
                Status::Warning
            } else {
                Status::Normal
            }
        }
    }
}

/// Classified, display-ready state of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSnapshot {
    pub parameter: Parameter,
    /// Value rounded to the parameter's display precision.
    pub display_value: f64,
    pub unit: &'static str,
    pub status: Status,
    pub band: ThresholdBand,
    pub observed_at: Option<DateTime<Utc>>,
}

impl ParameterSnapshot {
    /// Classify a reading. Uses the unrounded value.
    pub fn from_reading(reading: &Reading) -> Self {
        let band = reading.parameter.band();
        Self {
            parameter: reading.parameter,
            display_value: reading.parameter.round_for_display(reading.value),
            unit: reading.parameter.unit(),
            status: classify(reading.value, reading.alert, &band),
            band,
            observed_at: reading.observed_at,
        }
    }

    /// Display value formatted with the parameter's precision.
    pub fn formatted_value(&self) -> String {
        self.parameter.format_value(self.display_value)
    }
}

/// Parse and classify a feed entry, one snapshot per parameter in display order.
pub fn snapshot_entry(entry: &FeedEntry) -> Vec<ParameterSnapshot> {
    parse_entry(entry)
        .iter()
        .map(ParameterSnapshot::from_reading)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(parameter: Parameter, value: f64, alert: bool) -> Status {
        classify(value, alert, &parameter.band())
    }

    #[test]
    fn test_temperature_boundaries() {
        use Parameter::Temperature as T;
        assert_eq!(status(T, 18.0, false), Status::Normal);
        assert_eq!(status(T, 25.0, false), Status::Normal);
        assert_eq!(status(T, 17.9, false), Status::Warning);
        assert_eq!(status(T, 25.1, false), Status::Warning);
        assert_eq!(status(T, 15.0, false), Status::Warning);
        assert_eq!(status(T, 30.0, false), Status::Warning);
        assert_eq!(status(T, 14.9, false), Status::Critical);
        assert_eq!(status(T, 30.1, false), Status::Critical);
    }

    #[test]
    fn test_temperature_alert() {
        use Parameter::Temperature as T;
        // Alert escalates an in-range value to warning, never to critical.
        assert_eq!(status(T, 22.0, true), Status::Warning);
        assert_eq!(status(T, 16.0, true), Status::Warning);
        assert_eq!(status(T, 31.0, true), Status::Critical);
        assert_eq!(status(T, 0.0, true), Status::Critical);
    }

    #[test]
    fn test_humidity() {
        use Parameter::Humidity as H;
        assert_eq!(status(H, 30.0, false), Status::Normal);
        assert_eq!(status(H, 50.0, false), Status::Normal);
        assert_eq!(status(H, 29.9, false), Status::Warning);
        assert_eq!(status(H, 80.0, false), Status::Warning);
        assert_eq!(status(H, 9.9, false), Status::Critical);
        assert_eq!(status(H, 80.1, false), Status::Critical);
        assert_eq!(status(H, 40.0, true), Status::Warning);
        assert_eq!(status(H, 85.0, true), Status::Critical);
    }

    #[test]
    fn test_pressure_sub_band_demotes_alert() {
        use Parameter::Pressure as P;
        assert_eq!(status(P, 985.0, true), Status::Warning);
        assert_eq!(status(P, 980.0, true), Status::Warning);
        assert_eq!(status(P, 989.0, true), Status::Warning);
        assert_eq!(status(P, 985.0, false), Status::Warning);
    }

    #[test]
    fn test_pressure_alert_outside_sub_band() {
        use Parameter::Pressure as P;
        assert_eq!(status(P, 900.0, true), Status::Critical);
        assert_eq!(status(P, 1000.0, true), Status::Critical);
        assert_eq!(status(P, 989.5, true), Status::Critical);
    }

    #[test]
    fn test_pressure_without_alert() {
        use Parameter::Pressure as P;
        assert_eq!(status(P, 1015.0, false), Status::Normal);
        assert_eq!(status(P, 990.0, false), Status::Normal);
        // Between the hard limits but outside both ranges still reads normal.
        assert_eq!(status(P, 960.0, false), Status::Normal);
        assert_eq!(status(P, 1040.0, false), Status::Normal);
        assert_eq!(status(P, 950.0, false), Status::Normal);
        assert_eq!(status(P, 1050.0, false), Status::Normal);
        assert_eq!(status(P, 949.9, false), Status::Critical);
        assert_eq!(status(P, 1050.1, false), Status::Critical);
        assert_eq!(status(P, 0.0, false), Status::Critical);
    }

    #[test]
    fn test_light() {
        use Parameter::Light as L;
        assert_eq!(status(L, 0.0, false), Status::Critical);
        assert_eq!(status(L, 0.0, true), Status::Critical);
        assert_eq!(status(L, 150.0, false), Status::Normal);
        assert_eq!(status(L, 100.0, false), Status::Normal);
        assert_eq!(status(L, 200.0, false), Status::Normal);
        assert_eq!(status(L, 99.0, false), Status::Warning);
        assert_eq!(status(L, 1.0, false), Status::Warning);
        assert_eq!(status(L, 200.5, false), Status::Critical);
        assert_eq!(status(L, 150.0, true), Status::Warning);
        assert_eq!(status(L, 250.0, true), Status::Critical);
    }

    #[test]
    fn test_classification_is_pure() {
        for parameter in Parameter::ALL {
            for value in [0.0, 14.9, 22.0, 85.0, 985.0, 1015.0, 150.0, 5000.0] {
                for alert in [false, true] {
                    let first = status(parameter, value, alert);
                    let second = status(parameter, value, alert);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn test_snapshot_entry_end_to_end() {
        let entry = FeedEntry {
            field1: Some("22.0".to_string()),
            field2: Some("45.0".to_string()),
            field3: Some("101.5".to_string()),
            field4: Some("150".to_string()),
            field5: Some("0".to_string()),
            field6: Some("0".to_string()),
            field7: Some("0".to_string()),
            field8: Some("0".to_string()),
            ..FeedEntry::default()
        };

        let snapshots = snapshot_entry(&entry);
        let summary: Vec<(Parameter, f64, Status)> = snapshots
            .iter()
            .map(|s| (s.parameter, s.display_value, s.status))
            .collect();

        assert_eq!(
            summary,
            vec![
                (Parameter::Temperature, 22.0, Status::Normal),
                (Parameter::Humidity, 45.0, Status::Normal),
                (Parameter::Pressure, 1015.0, Status::Normal),
                (Parameter::Light, 150.0, Status::Normal),
            ]
        );
        assert_eq!(snapshots[2].unit, "hPa");
        assert_eq!(snapshots[2].formatted_value(), "1015");
    }

    #[test]
    fn test_classification_uses_unrounded_value() {
        // 25.04 displays as 25.0 but is above the normal maximum.
        let reading = Reading {
            parameter: Parameter::Temperature,
            value: 25.04,
            alert: false,
            observed_at: None,
        };
        let snapshot = ParameterSnapshot::from_reading(&reading);
        assert_eq!(snapshot.display_value, 25.0);
        assert_eq!(snapshot.status, Status::Warning);
    }

    #[test]
    fn test_status_ordering() {
        assert!(Status::Critical > Status::Warning);
        assert!(Status::Warning > Status::Normal);
    }
}
