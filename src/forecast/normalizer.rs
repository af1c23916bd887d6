//! Conversion of raw source records into canonical forecast points
//!
//! Each output field has one fallback chain, resolved here and nowhere else:
//!
//! | field            | resolution order                                  |
//! |------------------|---------------------------------------------------|
//! | wave height      | primary height, alternate height, 0.0             |
//! | wave period      | measured period, wind-based estimate, 0.0         |
//! | wave direction   | alternate wave direction, 0.0                     |
//! | water temp       | alternate sea surface temperature, 0.0            |
//! | wind, air temp   | direct value, 0.0                                 |
//! | weather          | explicit source code, derived classification      |
//!
//! Sentinel wave heights are scrubbed before the chain runs. Negative or
//! non-finite magnitudes count as missing.

use crate::data::{ForecastPoint, RawRecord};

use super::{classifier, direction, validator, wave_period};

/// Normalizes one raw record
///
/// Never fails. Missing data degrades to zero so aggregation downstream
/// does not have to handle absent values.
pub fn normalize(raw: RawRecord) -> ForecastPoint {
    let raw = validator::scrub_sentinels(raw);

    let wind_speed = magnitude(raw.wind_speed);
    let wave_height = magnitude(raw.wave_height).or(magnitude(raw.alt_wave_height));
    let wave_period = magnitude(raw.wave_period).or_else(|| wave_period::estimate(wind_speed));

    let weather = classifier::resolve(
        raw.explicit_weather_code,
        raw.sky_condition.unwrap_or(0),
        raw.precipitation_type.unwrap_or(0),
        raw.humidity,
        wind_speed,
        raw.precipitation_probability,
    );

    ForecastPoint {
        beach_id: raw.beach_id,
        time: raw.timestamp,
        wind_direction_deg: heading(raw.wind_direction).unwrap_or(0.0),
        wind_speed_ms: wind_speed.unwrap_or(0.0),
        wave_direction_deg: heading(raw.alt_wave_direction).unwrap_or(0.0),
        wave_height_m: wave_height.unwrap_or(0.0),
        wave_period_s: wave_period.unwrap_or(0.0),
        water_temp_c: finite(raw.sea_surface_temperature).unwrap_or(0.0),
        air_temp_c: finite(raw.air_temperature).unwrap_or(0.0),
        weather,
    }
}

/// Normalizes a batch of records, preserving their order
pub fn normalize_all(records: Vec<RawRecord>) -> Vec<ForecastPoint> {
    records.into_iter().map(normalize).collect()
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn magnitude(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v >= 0.0)
}

fn heading(value: Option<f64>) -> Option<f64> {
    finite(value).map(direction::normalize_degrees)
}
