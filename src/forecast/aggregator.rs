//! Regional summary cards from the latest point of each beach

use crate::data::{CardKind, ForecastPoint, RegionalSummaryCard};

use super::direction::circular_mean;

/// Builds the wind card and the wave card for a set of beaches
///
/// `latest_per_beach` holds the most recent point of every beach that
/// reported. Magnitudes are arithmetic means and directions are circular
/// means. An empty set yields zero magnitudes with no direction.
pub fn aggregate(latest_per_beach: &[ForecastPoint]) -> [RegionalSummaryCard; 2] {
    let wind_speeds: Vec<f64> = latest_per_beach.iter().map(|p| p.wind_speed_ms).collect();
    let wind_directions: Vec<f64> = latest_per_beach
        .iter()
        .map(|p| p.wind_direction_deg)
        .collect();
    let wave_heights: Vec<f64> = latest_per_beach.iter().map(|p| p.wave_height_m).collect();
    let wave_periods: Vec<f64> = latest_per_beach.iter().map(|p| p.wave_period_s).collect();
    let wave_directions: Vec<f64> = latest_per_beach
        .iter()
        .map(|p| p.wave_direction_deg)
        .collect();

    [
        wind_card(mean(&wind_speeds), circular_mean(&wind_directions)),
        wave_card(
            mean(&wave_heights),
            mean(&wave_periods),
            circular_mean(&wave_directions),
        ),
    ]
}

/// Picks the newest point of a series, by time
pub fn latest(points: &[ForecastPoint]) -> Option<ForecastPoint> {
    points.iter().max_by_key(|p| p.time).copied()
}

fn wind_card(speed: f64, direction: Option<f64>) -> RegionalSummaryCard {
    RegionalSummaryCard {
        kind: CardKind::Wind,
        magnitude: speed,
        magnitude_label: format!("{:.1}m/s", speed),
        period: None,
        secondary_label: None,
        direction_deg: direction,
    }
}

fn wave_card(height: f64, period: f64, direction: Option<f64>) -> RegionalSummaryCard {
    RegionalSummaryCard {
        kind: CardKind::Wave,
        magnitude: height,
        magnitude_label: format!("{:.1}m", height),
        period: Some(period),
        secondary_label: Some(format!("{:.1}s", period)),
        direction_deg: direction,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
