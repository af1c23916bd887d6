//! Core data models for surf forecasts
//!
//! This module contains the types that flow through the forecast pipeline:
//! raw records as fetched from a forecast source, the canonical forecast
//! point they normalize into, and the regional summary cards built from them.

pub mod codes;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fetched forecast document, exactly as the source delivered it
///
/// Every marine and weather field is optional. The normalizer is the only
/// place that decides what a missing value turns into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Identifier of the source document
    #[serde(default)]
    pub document_id: String,
    /// Beach this record belongs to
    #[serde(default)]
    pub beach_id: i64,
    /// Region the beach is filed under
    #[serde(default)]
    pub region: String,
    /// Forecast timestamp
    pub timestamp: DateTime<Utc>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
    /// Wind direction in compass degrees
    pub wind_direction: Option<f64>,
    /// Wave height in meters from the primary source
    pub wave_height: Option<f64>,
    /// Air temperature in Celsius
    pub air_temperature: Option<f64>,
    /// Precipitation probability in percent (0-100)
    pub precipitation_probability: Option<f64>,
    /// Precipitation type code (0 = none, 1 = rain, 2 = rain/snow, 3 = snow, 4 = shower)
    pub precipitation_type: Option<i32>,
    /// Sky condition code (1 = clear, 3 = broken cloud, 4 = overcast)
    pub sky_condition: Option<i32>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Precipitation amount in mm
    pub precipitation: Option<f64>,
    /// Snowfall in cm
    pub snow: Option<f64>,
    /// Wave height in meters from the alternate marine source
    pub alt_wave_height: Option<f64>,
    /// Wave direction in compass degrees from the alternate marine source
    pub alt_wave_direction: Option<f64>,
    /// Sea surface temperature in Celsius from the alternate marine source
    pub sea_surface_temperature: Option<f64>,
    /// Weather category code supplied directly by the source
    #[serde(rename = "weatherCode")]
    pub explicit_weather_code: Option<i32>,
    /// Measured wave period in seconds
    pub wave_period: Option<f64>,
}

impl RawRecord {
    /// Creates a record with identity and timestamp set and every reading absent
    pub fn new(beach_id: i64, region: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            beach_id,
            region: region.into(),
            timestamp,
            ..Default::default()
        }
    }
}

/// Canonical forecast for one beach at one point in time
///
/// Every field carries a concrete value. Directions are in [0, 360) and
/// magnitudes are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub beach_id: i64,
    pub time: DateTime<Utc>,
    pub wind_direction_deg: f64,
    pub wind_speed_ms: f64,
    pub wave_direction_deg: f64,
    pub wave_height_m: f64,
    pub wave_period_s: f64,
    pub water_temp_c: f64,
    pub air_temp_c: f64,
    /// Stored as its canonical integer code, see [`codes`]
    pub weather: WeatherCategory,
}

/// Unified sky and precipitation category
///
/// Domain logic matches on the variants. The integer codes live only in
/// [`codes`] and are used when a point is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
    Clear,
    Rain,
    Snow,
    Cloudy,
    PartlyCloudySun,
    MostlyCloudySun,
    Fog,
    /// No usable weather signal
    Unknown,
}

impl WeatherCategory {
    /// Whether this category is the "no data" sentinel
    pub fn is_no_data(self) -> bool {
        self == WeatherCategory::Unknown
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Rain => "Rain",
            WeatherCategory::Snow => "Snow",
            WeatherCategory::Cloudy => "Cloudy",
            WeatherCategory::PartlyCloudySun => "Partly cloudy",
            WeatherCategory::MostlyCloudySun => "Mostly cloudy",
            WeatherCategory::Fog => "Fog",
            WeatherCategory::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// A beach known to the forecast source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeachDescriptor {
    pub id: i64,
    pub region: String,
    pub name: String,
}

/// Bookkeeping document a source keeps per beach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Timestamp of the newest record
    pub last_updated: DateTime<Utc>,
    /// Number of records stored for the beach
    #[serde(default)]
    pub total_records: u64,
    /// Free-form ingest status reported by the source
    #[serde(default)]
    pub status: String,
}

/// Which quantity a summary card describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Wind,
    Wave,
}

/// One averaged summary across the beaches of a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSummaryCard {
    pub kind: CardKind,
    /// Mean wind speed (m/s) or mean wave height (m)
    pub magnitude: f64,
    /// Formatted magnitude, e.g. "3.2m/s"
    pub magnitude_label: String,
    /// Mean wave period in seconds, wave cards only
    pub period: Option<f64>,
    /// Formatted period, e.g. "8.0s"
    pub secondary_label: Option<String>,
    /// Circular-mean direction, `None` when it is undefined
    pub direction_deg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_raw_record_new_leaves_readings_absent() {
        let ts = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();
        let raw = RawRecord::new(2001, "jeju", ts);

        assert_eq!(raw.beach_id, 2001);
        assert_eq!(raw.region, "jeju");
        assert_eq!(raw.timestamp, ts);
        assert!(raw.wind_speed.is_none());
        assert!(raw.wave_height.is_none());
        assert!(raw.explicit_weather_code.is_none());
    }

    #[test]
    fn test_raw_record_parses_camel_case_document() {
        let json = r#"{
            "documentId": "2001_202407150600",
            "beachId": 2001,
            "region": "jeju",
            "timestamp": "2024-07-15T06:00:00Z",
            "windSpeed": 3.4,
            "windDirection": 225,
            "waveHeight": -999,
            "altWaveHeight": 0.8,
            "skyCondition": 3,
            "precipitationType": 0,
            "weatherCode": 4
        }"#;

        let raw: RawRecord = serde_json::from_str(json).expect("Failed to parse record");

        assert_eq!(raw.document_id, "2001_202407150600");
        assert_eq!(raw.wind_speed, Some(3.4));
        assert_eq!(raw.wind_direction, Some(225.0));
        assert_eq!(raw.wave_height, Some(-999.0));
        assert_eq!(raw.alt_wave_height, Some(0.8));
        assert_eq!(raw.sky_condition, Some(3));
        assert_eq!(raw.explicit_weather_code, Some(4));
        assert!(raw.humidity.is_none());
        assert!(raw.wave_period.is_none());
    }

    #[test]
    fn test_raw_record_requires_timestamp() {
        let json = r#"{ "beachId": 2001, "windSpeed": 2.0 }"#;
        assert!(serde_json::from_str::<RawRecord>(json).is_err());
    }

    #[test]
    fn test_only_unknown_is_no_data() {
        assert!(WeatherCategory::Unknown.is_no_data());
        assert!(!WeatherCategory::Clear.is_no_data());
        assert!(!WeatherCategory::Fog.is_no_data());
    }

    #[test]
    fn test_weather_category_display() {
        assert_eq!(WeatherCategory::PartlyCloudySun.to_string(), "Partly cloudy");
        assert_eq!(WeatherCategory::MostlyCloudySun.to_string(), "Mostly cloudy");
        assert_eq!(WeatherCategory::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_metadata_parses_with_defaults() {
        let json = r#"{ "lastUpdated": "2024-07-15T06:00:00Z" }"#;
        let metadata: Metadata = serde_json::from_str(json).expect("Failed to parse metadata");

        assert_eq!(metadata.total_records, 0);
        assert!(metadata.status.is_empty());
    }
}
