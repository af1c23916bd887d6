//! Circular statistics for compass headings
//!
//! Headings are averaged as unit vectors. An arithmetic mean of raw degrees
//! is wrong across north: 350 and 10 average to 0, not 180.

/// Vector sums below this magnitude are treated as headings that cancel out
const CANCELLATION_EPSILON: f64 = 1e-6;

/// Wraps any angle in degrees into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Returns the circular mean of a set of compass headings in degrees
///
/// Returns `None` for an empty set, and when the headings cancel out (for
/// example due north and due south) so that no direction is meaningful.
pub fn circular_mean(degrees: &[f64]) -> Option<f64> {
    if degrees.is_empty() {
        return None;
    }

    let (sum_sin, sum_cos) = degrees.iter().fold((0.0_f64, 0.0_f64), |(s, c), deg| {
        let rad = deg.to_radians();
        (s + rad.sin(), c + rad.cos())
    });

    if sum_sin.abs() < CANCELLATION_EPSILON && sum_cos.abs() < CANCELLATION_EPSILON {
        return None;
    }

    Some(normalize_degrees(sum_sin.atan2(sum_cos).to_degrees()))
}

/// Rolling circular mean over the trailing `window` headings
///
/// The output has one entry per input heading. Entry `i` averages headings
/// `i + 1 - window ..= i` (fewer at the start). A window of 0 is treated
/// as 1.
pub fn smooth(degrees: &[f64], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..degrees.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            circular_mean(&degrees[start..=i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        let diff = diff.min(360.0 - diff);
        assert!(diff < 1e-6, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_mean_across_north() {
        assert_close(circular_mean(&[350.0, 10.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_opposed_headings_are_undefined() {
        assert!(circular_mean(&[0.0, 180.0]).is_none());
        assert!(circular_mean(&[90.0, 270.0]).is_none());
        assert!(circular_mean(&[0.0, 90.0, 180.0, 270.0]).is_none());
    }

    #[test]
    fn test_empty_is_undefined() {
        assert!(circular_mean(&[]).is_none());
    }

    #[test]
    fn test_single_heading() {
        assert_close(circular_mean(&[90.0]).unwrap(), 90.0);
        assert_close(circular_mean(&[270.0]).unwrap(), 270.0);
    }

    #[test]
    fn test_result_is_in_range() {
        let mean = circular_mean(&[300.0, 320.0]).unwrap();
        assert!((0.0..360.0).contains(&mean));
        assert_close(mean, 310.0);
    }

    #[test]
    fn test_three_north_one_south_leans_north() {
        assert_close(circular_mean(&[0.0, 0.0, 0.0, 180.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_close(normalize_degrees(360.0), 0.0);
        assert_close(normalize_degrees(-10.0), 350.0);
        assert_close(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_smooth_trailing_window() {
        let smoothed = smooth(&[350.0, 10.0, 30.0], 2);
        assert_eq!(smoothed.len(), 3);
        assert_close(smoothed[0].unwrap(), 350.0);
        assert_close(smoothed[1].unwrap(), 0.0);
        assert_close(smoothed[2].unwrap(), 20.0);
    }

    #[test]
    fn test_smooth_marks_cancelled_windows() {
        let smoothed = smooth(&[0.0, 180.0, 180.0], 2);
        assert!(smoothed[1].is_none());
        assert_close(smoothed[2].unwrap(), 180.0);
    }

    #[test]
    fn test_smooth_zero_window_is_identity() {
        let smoothed = smooth(&[45.0, 135.0], 0);
        assert_close(smoothed[0].unwrap(), 45.0);
        assert_close(smoothed[1].unwrap(), 135.0);
    }
}
