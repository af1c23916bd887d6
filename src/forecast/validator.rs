//! Validity checks on raw readings and normalized points

use crate::data::{ForecastPoint, RawRecord};

/// Wave heights at or beyond this magnitude are upstream "no reading" markers
pub const WAVE_HEIGHT_SENTINEL_MIN: f64 = 900.0;

/// Whether a raw wave height is an upstream sentinel rather than a measurement
pub fn is_sentinel_wave_height(height: f64) -> bool {
    height.abs() >= WAVE_HEIGHT_SENTINEL_MIN
}

/// Clears sentinel wave heights so they read as absent
///
/// Both the primary and the alternate height are checked, so a sentinel in
/// the primary field falls through to the alternate one during
/// normalization instead of being reported as a measurement.
pub fn scrub_sentinels(mut raw: RawRecord) -> RawRecord {
    raw.wave_height = raw.wave_height.filter(|h| !is_sentinel_wave_height(*h));
    raw.alt_wave_height = raw.alt_wave_height.filter(|h| !is_sentinel_wave_height(*h));
    raw
}

/// Whether a point carries any real signal
///
/// A point is a sampling gap when its wind speed and wave period are both
/// zero and its weather is the "no data" category.
pub fn is_valid(point: &ForecastPoint) -> bool {
    point.wind_speed_ms != 0.0 || point.wave_period_s != 0.0 || !point.weather.is_no_data()
}

/// Drops sampling gaps, keeping the remaining points in order
pub fn filter_valid(points: Vec<ForecastPoint>) -> Vec<ForecastPoint> {
    points.into_iter().filter(is_valid).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeatherCategory;
    use chrono::{TimeZone, Utc};

    fn point(wind: f64, period: f64, weather: WeatherCategory) -> ForecastPoint {
        ForecastPoint {
            beach_id: 2001,
            time: Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap(),
            wind_direction_deg: 0.0,
            wind_speed_ms: wind,
            wave_direction_deg: 0.0,
            wave_height_m: 0.0,
            wave_period_s: period,
            water_temp_c: 0.0,
            air_temp_c: 0.0,
            weather,
        }
    }

    #[test]
    fn test_all_blank_point_is_dropped() {
        let kept = filter_valid(vec![point(0.0, 0.0, WeatherCategory::Unknown)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_any_signal_keeps_point() {
        let points = vec![
            point(1.2, 0.0, WeatherCategory::Unknown),
            point(0.0, 6.0, WeatherCategory::Unknown),
            point(0.0, 0.0, WeatherCategory::Clear),
        ];
        assert_eq!(filter_valid(points.clone()), points);
    }

    #[test]
    fn test_filter_preserves_order() {
        let points = vec![
            point(3.0, 0.0, WeatherCategory::Rain),
            point(0.0, 0.0, WeatherCategory::Unknown),
            point(1.0, 0.0, WeatherCategory::Fog),
        ];
        let kept = filter_valid(points);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].weather, WeatherCategory::Rain);
        assert_eq!(kept[1].weather, WeatherCategory::Fog);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let points = vec![
            point(0.0, 0.0, WeatherCategory::Unknown),
            point(2.0, 0.0, WeatherCategory::Unknown),
            point(0.0, 0.0, WeatherCategory::Cloudy),
            point(0.0, 0.0, WeatherCategory::Unknown),
            point(0.0, 4.0, WeatherCategory::Snow),
        ];
        let once = filter_valid(points);
        let twice = filter_valid(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(is_sentinel_wave_height(-999.0));
        assert!(is_sentinel_wave_height(999.0));
        assert!(is_sentinel_wave_height(900.0));
        assert!(!is_sentinel_wave_height(899.9));
        assert!(!is_sentinel_wave_height(0.0));
        assert!(!is_sentinel_wave_height(1.5));
    }

    #[test]
    fn test_scrub_clears_both_heights() {
        let ts = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();
        let raw = RawRecord {
            wave_height: Some(-999.0),
            alt_wave_height: Some(999.0),
            ..RawRecord::new(2001, "jeju", ts)
        };
        let scrubbed = scrub_sentinels(raw);
        assert!(scrubbed.wave_height.is_none());
        assert!(scrubbed.alt_wave_height.is_none());
    }

    #[test]
    fn test_scrub_keeps_real_heights() {
        let ts = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();
        let raw = RawRecord {
            wave_height: Some(1.4),
            alt_wave_height: Some(1.1),
            ..RawRecord::new(2001, "jeju", ts)
        };
        let scrubbed = scrub_sentinels(raw);
        assert_eq!(scrubbed.wave_height, Some(1.4));
        assert_eq!(scrubbed.alt_wave_height, Some(1.1));
    }
}
