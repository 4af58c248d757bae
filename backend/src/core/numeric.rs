//! Numeric helpers shared by the environments.
//!
//! The simulation never raises on numeric edge cases; quantities are clamped
//! at the point of computation and divisions use a small epsilon floor.

/// Epsilon floor for denominators
pub const EPSILON: f64 = 1e-8;

/// Logistic function `1 / (1 + e^-x)`
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Map `value` from `[low, high]` into `[-1, 1]`, clipping outside values.
///
/// ```
/// use credit_negotiation_core::core::min_max_normalize;
///
/// assert!(min_max_normalize(0.5, 0.0, 1.0).abs() < 1e-6);
/// assert_eq!(min_max_normalize(-3.0, 0.0, 1.0), -1.0);
/// assert_eq!(min_max_normalize(9.0, 0.0, 1.0), 1.0);
/// ```
pub fn min_max_normalize(value: f64, low: f64, high: f64) -> f64 {
    let scaled = 2.0 * (value - low) / (high - low + EPSILON) - 1.0;
    if scaled.is_nan() {
        return -1.0;
    }
    scaled.clamp(-1.0, 1.0)
}

/// Clamp into `[low, high]`, replacing non-finite input with `fallback`.
pub(crate) fn clamp_finite(value: f64, low: f64, high: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(low, high)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_normalize_bounds() {
        assert!((min_max_normalize(0.3, 0.0, 0.3) - 1.0).abs() < 1e-6);
        assert!((min_max_normalize(0.0, 0.0, 0.3) + 1.0).abs() < 1e-12);
        assert_eq!(min_max_normalize(f64::NAN, 0.0, 1.0), -1.0);
    }

    #[test]
    fn test_clamp_finite_fallback() {
        assert_eq!(clamp_finite(f64::NAN, 0.0, 1.0, 0.4), 0.4);
        assert_eq!(clamp_finite(f64::INFINITY, 0.0, 1.0, 0.4), 0.4);
        assert_eq!(clamp_finite(1.7, 0.0, 1.0, 0.4), 1.0);
    }
}
