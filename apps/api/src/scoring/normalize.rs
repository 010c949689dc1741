//! Clamp and rounding helpers used by every scoring path.
//!
//! All functions are total. Non-finite input (NaN, ±inf) is treated as a
//! failed coercion and collapses to the lower bound. A collapsed range
//! (`hi < lo`) also yields the lower bound.

/// Rounds half-up to the nearest integer, then clamps into `[lo, hi]`.
pub fn clamp_round(value: f64, lo: i32, hi: i32) -> i32 {
    if !value.is_finite() || hi < lo {
        return lo;
    }
    let rounded = (value + 0.5).floor();
    if rounded <= lo as f64 {
        lo
    } else if rounded >= hi as f64 {
        hi
    } else {
        rounded as i32
    }
}

/// Clamps into `[lo, hi]` without rounding.
pub fn clamp_float(value: f64, lo: f64, hi: f64) -> f64 {
    if !value.is_finite() || hi < lo {
        return lo;
    }
    value.max(lo).min(hi)
}

/// Integer clamp with the same collapsed-range policy as `clamp_float`.
pub fn clamp_int(value: i64, lo: i64, hi: i64) -> i64 {
    if hi < lo {
        return lo;
    }
    value.max(lo).min(hi)
}

/// Presentation rounding to a fixed number of decimals. Never fed back into scoring.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_round_half_up() {
        assert_eq!(clamp_round(2.5, 0, 10), 3);
        assert_eq!(clamp_round(2.49, 0, 10), 2);
        assert_eq!(clamp_round(559.5, 0, 1000), 560);
    }

    #[test]
    fn test_clamp_round_bounds() {
        assert_eq!(clamp_round(-40.0, 0, 1000), 0);
        assert_eq!(clamp_round(1200.7, 0, 1000), 1000);
    }

    #[test]
    fn test_non_finite_collapses_to_lo() {
        assert_eq!(clamp_round(f64::NAN, 0, 1000), 0);
        assert_eq!(clamp_round(f64::INFINITY, 5, 1000), 5);
        assert_eq!(clamp_float(f64::NEG_INFINITY, 0.0, 100.0), 0.0);
        assert_eq!(clamp_float(f64::NAN, 10.0, 100.0), 10.0);
    }

    #[test]
    fn test_collapsed_range_yields_lo() {
        assert_eq!(clamp_int(7, 0, -3), 0);
        assert_eq!(clamp_float(7.0, 0.0, -3.0), 0.0);
        assert_eq!(clamp_round(7.0, 0, -3), 0);
    }

    #[test]
    fn test_clamp_float_passthrough() {
        assert_eq!(clamp_float(42.125, 0.0, 100.0), 42.125);
        assert_eq!(clamp_float(104.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert!((round_to(62.3456, 2) - 62.35).abs() < 1e-9);
        assert!((round_to(0.1234, 3) - 0.123).abs() < 1e-9);
    }
}
