//! Weather classification from sky and precipitation codes
//!
//! Rules are evaluated in a fixed order and the first one that matches wins:
//! precipitation, then the fog heuristic, then the sky condition. A category
//! supplied directly by the source overrides the whole derivation.

use crate::data::WeatherCategory;

/// Relative humidity (percent) at or above which still air is treated as fog
const FOG_HUMIDITY_MIN: f64 = 95.0;

/// Wind speed (m/s) at or below which saturated air is treated as fog
const FOG_WIND_MAX: f64 = 2.0;

/// Precipitation probability (percent) that tips broken cloud into "mostly cloudy"
const MOSTLY_CLOUDY_PROBABILITY_MIN: f64 = 30.0;

/// Relative humidity (percent) that tips broken cloud into "mostly cloudy"
const MOSTLY_CLOUDY_HUMIDITY_MIN: f64 = 85.0;

/// Derives a weather category from sky and precipitation codes
///
/// A missing humidity reading counts as -1 and a missing wind reading as
/// +infinity, so neither can satisfy the fog thresholds.
pub fn classify(
    sky_condition: i32,
    precipitation_type: i32,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    precipitation_probability: Option<f64>,
) -> WeatherCategory {
    if precipitation_type != 0 {
        return precipitation_category(precipitation_type);
    }

    let humidity = humidity.unwrap_or(-1.0);
    let wind_speed = wind_speed.unwrap_or(f64::INFINITY);
    if humidity >= FOG_HUMIDITY_MIN && wind_speed <= FOG_WIND_MAX {
        return WeatherCategory::Fog;
    }

    match sky_condition {
        1 => WeatherCategory::Clear,
        3 => {
            let probability = precipitation_probability.unwrap_or(0.0);
            if probability >= MOSTLY_CLOUDY_PROBABILITY_MIN || humidity >= MOSTLY_CLOUDY_HUMIDITY_MIN
            {
                WeatherCategory::MostlyCloudySun
            } else {
                WeatherCategory::PartlyCloudySun
            }
        }
        4 => WeatherCategory::Cloudy,
        _ => WeatherCategory::Unknown,
    }
}

/// Resolves the final category, preferring a code sent by the source
///
/// An explicit code only wins when it names a real category. Codes outside
/// the canonical table, and the "no data" code itself, fall back to
/// [`classify`].
pub fn resolve(
    explicit_code: Option<i32>,
    sky_condition: i32,
    precipitation_type: i32,
    humidity: Option<f64>,
    wind_speed: Option<f64>,
    precipitation_probability: Option<f64>,
) -> WeatherCategory {
    match explicit_code.and_then(WeatherCategory::from_code) {
        Some(category) if !category.is_no_data() => category,
        _ => classify(
            sky_condition,
            precipitation_type,
            humidity,
            wind_speed,
            precipitation_probability,
        ),
    }
}

fn precipitation_category(precipitation_type: i32) -> WeatherCategory {
    match precipitation_type {
        1 | 4 => WeatherCategory::Rain,
        2 | 3 => WeatherCategory::Snow,
        _ => WeatherCategory::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precipitation_overrides_sky_condition() {
        for sky in [0, 1, 3, 4, 9] {
            assert_eq!(classify(sky, 1, None, None, None), WeatherCategory::Rain);
            assert_eq!(classify(sky, 2, None, None, None), WeatherCategory::Snow);
            assert_eq!(classify(sky, 3, None, None, None), WeatherCategory::Snow);
            assert_eq!(classify(sky, 4, None, None, None), WeatherCategory::Rain);
            assert_eq!(classify(sky, 7, None, None, None), WeatherCategory::Unknown);
        }
    }

    #[test]
    fn test_precipitation_overrides_fog() {
        assert_eq!(
            classify(1, 1, Some(99.0), Some(0.5), None),
            WeatherCategory::Rain
        );
    }

    #[test]
    fn test_fog_requires_humid_still_air() {
        for sky in [0, 1, 3, 4] {
            assert_eq!(
                classify(sky, 0, Some(96.0), Some(1.5), Some(80.0)),
                WeatherCategory::Fog
            );
        }
        assert_ne!(
            classify(1, 0, Some(96.0), Some(3.0), Some(80.0)),
            WeatherCategory::Fog
        );
        assert_ne!(
            classify(1, 0, Some(94.9), Some(1.5), None),
            WeatherCategory::Fog
        );
    }

    #[test]
    fn test_fog_thresholds_are_inclusive() {
        assert_eq!(
            classify(1, 0, Some(95.0), Some(2.0), None),
            WeatherCategory::Fog
        );
    }

    #[test]
    fn test_missing_readings_skip_fog() {
        assert_eq!(classify(1, 0, None, Some(0.0), None), WeatherCategory::Clear);
        assert_eq!(classify(1, 0, Some(100.0), None, None), WeatherCategory::Clear);
    }

    #[test]
    fn test_sky_condition_mapping() {
        assert_eq!(classify(1, 0, None, None, None), WeatherCategory::Clear);
        assert_eq!(classify(4, 0, None, None, None), WeatherCategory::Cloudy);
        assert_eq!(classify(0, 0, None, None, None), WeatherCategory::Unknown);
        assert_eq!(classify(2, 0, None, None, None), WeatherCategory::Unknown);
    }

    #[test]
    fn test_broken_cloud_partly_or_mostly() {
        assert_eq!(
            classify(3, 0, Some(60.0), Some(5.0), Some(10.0)),
            WeatherCategory::PartlyCloudySun
        );
        assert_eq!(
            classify(3, 0, Some(60.0), Some(5.0), Some(30.0)),
            WeatherCategory::MostlyCloudySun
        );
        assert_eq!(
            classify(3, 0, Some(85.0), Some(5.0), None),
            WeatherCategory::MostlyCloudySun
        );
        assert_eq!(
            classify(3, 0, None, None, None),
            WeatherCategory::PartlyCloudySun
        );
    }

    #[test]
    fn test_explicit_code_wins() {
        let fog = WeatherCategory::Fog.code();
        assert_eq!(resolve(Some(fog), 1, 1, None, None, None), WeatherCategory::Fog);
    }

    #[test]
    fn test_unmapped_explicit_code_falls_back_to_derivation() {
        assert_eq!(resolve(Some(99), 4, 0, None, None, None), WeatherCategory::Cloudy);
        assert_eq!(
            resolve(Some(WeatherCategory::Unknown.code()), 1, 0, None, None, None),
            WeatherCategory::Clear
        );
        assert_eq!(resolve(None, 0, 2, None, None, None), WeatherCategory::Snow);
    }
}
