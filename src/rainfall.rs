//! # Rainfall summaries and flood warnings
//!
//! Works on rainfall readings that the caller has already fetched (live or archival). Each
//! [`RainfallReading`] is a `(stationReference, value)` pair, in millimetres over the reading
//! period, with an optional ISO 8601 `dateTime`; the CSV column names of the Environment Agency
//! exports deserialize directly.
//!
//! | max reading (mm)   | [`RainfallLevel`] |
//! |--------------------|-------------------|
//! | `≤ 0`              | `None`            |
//! | `(0, 0.1]`         | `Light`           |
//! | `(0.1, 0.3]`       | `Moderate`        |
//! | `> 0.3`            | `Heavy`           |
//!
//! A flood warning is raised when rainfall is heavy over a postcode whose probability band is
//! `Medium` or worse.

use std::fmt;

use ahash::AHashMap;
use serde::Deserialize;

use crate::risk_zone::ProbabilityBand;

/// Upper bound of light rainfall, in mm.
pub const LIGHT_RAINFALL: f64 = 0.1;

/// Upper bound of moderate rainfall, in mm. Anything above is heavy.
pub const MODERATE_RAINFALL: f64 = 0.3;

/// A single rainfall measurement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RainfallReading {
    #[serde(rename = "stationReference")]
    pub station_reference: String,
    /// Timestamp as exported, e.g. `2021-05-09T14:15:00Z`.
    #[serde(rename = "dateTime", default)]
    pub date_time: Option<String>,
    pub value: f64,
}

impl RainfallReading {
    pub fn new(station_reference: &str, value: f64) -> Self {
        RainfallReading {
            station_reference: station_reference.to_string(),
            date_time: None,
            value,
        }
    }

    pub fn with_date_time(mut self, date_time: &str) -> Self {
        self.date_time = Some(date_time.to_string());
        self
    }
}

/// Qualitative rainfall level derived from the maximum reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RainfallLevel {
    None,
    Light,
    Moderate,
    Heavy,
}

impl RainfallLevel {
    /// Classify a maximum reading. NaN is treated as no rainfall.
    pub fn from_max(max_rainfall: f64) -> Self {
        if max_rainfall.is_nan() || max_rainfall <= 0.0 {
            RainfallLevel::None
        } else if max_rainfall <= LIGHT_RAINFALL {
            RainfallLevel::Light
        } else if max_rainfall <= MODERATE_RAINFALL {
            RainfallLevel::Moderate
        } else {
            RainfallLevel::Heavy
        }
    }
}

impl fmt::Display for RainfallLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RainfallLevel::None => "none",
            RainfallLevel::Light => "light",
            RainfallLevel::Moderate => "moderate",
            RainfallLevel::Heavy => "heavy",
        };
        write!(f, "{label}")
    }
}

/// Per-station aggregate of rainfall readings.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub station_reference: String,
    pub count: usize,
    pub mean: f64,
    pub total: f64,
    pub max: f64,
    /// Timestamp of the first reading equal to `max`, when it carried one.
    pub peak_time: Option<String>,
}

impl StationSummary {
    /// Group readings by station and summarise each group.
    ///
    /// Non-finite values are skipped; a station with no finite reading is omitted.
    ///
    /// Returns
    /// -------
    /// * One summary per station, sorted by station reference.
    pub fn from_readings(readings: &[RainfallReading]) -> Vec<StationSummary> {
        let mut groups: AHashMap<&str, (usize, f64, &RainfallReading)> = AHashMap::new();

        let mut skipped = 0usize;
        for reading in readings {
            if !reading.value.is_finite() {
                skipped += 1;
                continue;
            }
            let (count, total, peak) = groups
                .entry(reading.station_reference.as_str())
                .or_insert((0, 0.0, reading));
            *count += 1;
            *total += reading.value;
            if reading.value > peak.value {
                *peak = reading;
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "ignored non-finite rainfall readings");
        }

        let mut summaries: Vec<StationSummary> = groups
            .into_iter()
            .map(|(station, (count, total, peak))| StationSummary {
                station_reference: station.to_string(),
                count,
                mean: total / count as f64,
                total,
                max: peak.value,
                peak_time: peak.date_time.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.station_reference.cmp(&b.station_reference));
        summaries
    }

    pub fn level(&self) -> RainfallLevel {
        RainfallLevel::from_max(self.max)
    }

    /// Station with the highest mean rainfall, first by station reference on ties.
    pub fn wettest(summaries: &[StationSummary]) -> Option<&StationSummary> {
        summaries.iter().fold(None, |best, s| match best {
            Some(b) if b.mean >= s.mean => Some(b),
            _ => Some(s),
        })
    }
}

/// Reading with the largest finite value, the earliest in slice order on ties.
pub fn peak_reading(readings: &[RainfallReading]) -> Option<&RainfallReading> {
    readings
        .iter()
        .filter(|r| r.value.is_finite())
        .fold(None, |best, r| match best {
            Some(b) if b.value >= r.value => Some(b),
            _ => Some(r),
        })
}

/// Largest finite reading, `0.0` when there is none.
pub fn max_rainfall(readings: &[RainfallReading]) -> f64 {
    readings
        .iter()
        .map(|r| r.value)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// True when heavy rainfall falls on a postcode of `Medium` or `High` probability.
pub fn flood_warning(max_rainfall: f64, band: ProbabilityBand) -> bool {
    RainfallLevel::from_max(max_rainfall) == RainfallLevel::Heavy
        && band >= ProbabilityBand::Medium
}

#[cfg(test)]
mod rainfall_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rainfall_level() {
        assert_eq!(RainfallLevel::from_max(0.0), RainfallLevel::None);
        assert_eq!(RainfallLevel::from_max(-1.0), RainfallLevel::None);
        assert_eq!(RainfallLevel::from_max(f64::NAN), RainfallLevel::None);
        assert_eq!(RainfallLevel::from_max(0.05), RainfallLevel::Light);
        assert_eq!(RainfallLevel::from_max(0.1), RainfallLevel::Light);
        assert_eq!(RainfallLevel::from_max(0.2), RainfallLevel::Moderate);
        assert_eq!(RainfallLevel::from_max(0.3), RainfallLevel::Moderate);
        assert_eq!(RainfallLevel::from_max(0.31), RainfallLevel::Heavy);
        assert_eq!(RainfallLevel::Heavy.to_string(), "heavy");
    }

    #[test]
    fn test_station_summary() {
        let readings = [
            RainfallReading::new("E7050", 0.2),
            RainfallReading::new("240662TP", 0.0),
            RainfallReading::new("E7050", 0.4),
            RainfallReading::new("E7050", f64::NAN),
            RainfallReading::new("240662TP", 0.1),
            RainfallReading::new("3680", f64::INFINITY),
        ];
        let summaries = StationSummary::from_readings(&readings);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].station_reference, "240662TP");
        assert_eq!(summaries[0].count, 2);
        assert_relative_eq!(summaries[0].mean, 0.05);
        assert_eq!(summaries[0].level(), RainfallLevel::Light);

        assert_eq!(summaries[1].station_reference, "E7050");
        assert_eq!(summaries[1].count, 2);
        assert_relative_eq!(summaries[1].total, 0.6);
        assert_relative_eq!(summaries[1].mean, 0.3);
        assert_eq!(summaries[1].max, 0.4);
        assert_eq!(summaries[1].level(), RainfallLevel::Heavy);

        assert_eq!(max_rainfall(&readings), 0.4);
        assert_eq!(max_rainfall(&[]), 0.0);
    }

    #[test]
    fn test_flood_warning() {
        assert!(flood_warning(0.5, ProbabilityBand::High));
        assert!(flood_warning(0.5, ProbabilityBand::Medium));
        assert!(!flood_warning(0.5, ProbabilityBand::Low));
        assert!(!flood_warning(0.3, ProbabilityBand::High));
        assert!(!flood_warning(0.0, ProbabilityBand::Zero));
    }

    #[test]
    fn test_peak_time_and_wettest_station() {
        let readings = [
            RainfallReading::new("E7050", 0.2).with_date_time("2021-05-09T14:00:00Z"),
            RainfallReading::new("E7050", 0.6).with_date_time("2021-05-09T14:15:00Z"),
            RainfallReading::new("3680", 0.3).with_date_time("2021-05-09T14:00:00Z"),
            RainfallReading::new("3680", 0.6).with_date_time("2021-05-09T14:30:00Z"),
            RainfallReading::new("240662TP", 0.0),
        ];
        let summaries = StationSummary::from_readings(&readings);

        assert_eq!(summaries[0].station_reference, "240662TP");
        assert_eq!(summaries[0].peak_time, None);
        assert_eq!(
            summaries[2].peak_time.as_deref(),
            Some("2021-05-09T14:15:00Z")
        );

        let wettest = StationSummary::wettest(&summaries).unwrap();
        assert_eq!(wettest.station_reference, "3680");
        assert_relative_eq!(wettest.mean, 0.45);
        assert!(StationSummary::wettest(&[]).is_none());

        let peak = peak_reading(&readings).unwrap();
        assert_eq!(peak.station_reference, "E7050");
        assert_eq!(peak.date_time.as_deref(), Some("2021-05-09T14:15:00Z"));
        assert!(peak_reading(&[RainfallReading::new("E7050", f64::NAN)]).is_none());
    }

    #[test]
    fn test_reading_from_csv() {
        let data = "\
dateTime,stationReference,value
2021-05-09T14:15:00Z,E7050,0.4
2021-05-09T14:15:00Z,3680,0.0
";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let readings: Vec<RainfallReading> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            readings[0],
            RainfallReading::new("E7050", 0.4).with_date_time("2021-05-09T14:15:00Z")
        );

        let mut rdr = csv::Reader::from_reader("stationReference,value\nE7050,0.1\n".as_bytes());
        let readings: Vec<RainfallReading> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(readings[0].date_time, None);
    }
}
