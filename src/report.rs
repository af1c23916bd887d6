//! Plain-text rendering of forecasts, summary cards and beach listings

use std::fmt::Write as _;

use chrono::Local;

use crate::data::{BeachDescriptor, CardKind, ForecastPoint, RegionalSummaryCard};

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Returns the 16-point compass label of a heading
pub fn compass_point(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = (normalized / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

fn direction_label(degrees: Option<f64>) -> String {
    match degrees {
        Some(d) => format!("{:>3.0}° {:<3}", d, compass_point(d)),
        None => "   -    ".to_string(),
    }
}

/// Renders a forecast series as a table
///
/// `smoothed` holds one rolling wind direction per point and adds a column.
pub fn forecast_table(points: &[ForecastPoint], smoothed: Option<&[Option<f64>]>) -> String {
    if points.is_empty() {
        return "No forecast data in the requested window.\n".to_string();
    }

    let mut out = String::new();
    let _ = write!(
        out,
        "{:<16}  {:>6}  {:<8}  {:>5}  {:>5}  {:<8}  {:>6}  {:>6}  {}",
        "time", "wind", "wind dir", "wave", "per.", "wave dir", "water", "air", "weather"
    );
    if smoothed.is_some() {
        out.push_str("  trend");
    }
    out.push('\n');

    for (i, point) in points.iter().enumerate() {
        let _ = write!(
            out,
            "{:<16}  {:>4.1}m/s  {}  {:>4.1}m  {:>4.1}s  {}  {:>5.1}°  {:>5.1}°  {}",
            point.time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            point.wind_speed_ms,
            direction_label(Some(point.wind_direction_deg)),
            point.wave_height_m,
            point.wave_period_s,
            direction_label(Some(point.wave_direction_deg)),
            point.water_temp_c,
            point.air_temp_c,
            point.weather,
        );
        if let Some(smoothed) = smoothed {
            let trend = smoothed.get(i).copied().flatten();
            let _ = write!(out, "  {}", direction_label(trend));
        }
        out.push('\n');
    }
    out
}

/// Renders the wind and wave cards
pub fn summary_cards(cards: &[RegionalSummaryCard]) -> String {
    let mut out = String::new();
    for card in cards {
        let title = match card.kind {
            CardKind::Wind => "Wind",
            CardKind::Wave => "Wave",
        };
        let _ = write!(
            out,
            "{:<5} {:>7}  {}",
            title,
            card.magnitude_label,
            direction_label(card.direction_deg)
        );
        if let Some(ref secondary) = card.secondary_label {
            let _ = write!(out, "  {}", secondary);
        }
        out.push('\n');
    }
    out
}

/// Renders the beach directory
pub fn beach_list(beaches: &[BeachDescriptor]) -> String {
    if beaches.is_empty() {
        return "No beaches found.\n".to_string();
    }
    let mut out = String::new();
    for beach in beaches {
        let _ = writeln!(out, "{:>6}  {:<12}  {}", beach.id, beach.region, beach.name);
    }
    out
}
