//! Wave period estimation from wind speed
//!
//! Uses the Pierson-Moskowitz fully developed sea relation between peak
//! period and wind speed. Only applied when a source has no measured period.

/// Seconds of peak period per m/s of wind
const PIERSON_MOSKOWITZ_FACTOR: f64 = 0.83;

/// Shortest period reported for an estimate
pub const MIN_ESTIMATED_PERIOD_S: f64 = 2.0;

/// Longest period reported for an estimate
pub const MAX_ESTIMATED_PERIOD_S: f64 = 18.0;

/// Estimates the wave period in seconds for the given wind speed
///
/// Returns `None` when the wind speed is missing, NaN, or not positive.
pub fn estimate(wind_speed_ms: Option<f64>) -> Option<f64> {
    let wind = wind_speed_ms.filter(|w| !w.is_nan() && *w > 0.0)?;
    Some((PIERSON_MOSKOWITZ_FACTOR * wind).clamp(MIN_ESTIMATED_PERIOD_S, MAX_ESTIMATED_PERIOD_S))
}
