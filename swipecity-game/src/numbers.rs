//! Numeric conversion helpers centralizing the few lossy casts gesture math needs.

use num_traits::cast::cast;

/// Floor a non-negative f64 into a `usize`, returning 0 for NaN or negative input.
#[must_use]
pub fn floor_f64_to_usize(value: f64) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f64, usize>(value.floor()).unwrap_or(usize::MAX)
}

/// Truncate a millisecond timestamp from a JS clock, returning 0 for NaN or negative input.
#[must_use]
pub fn f64_millis_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f64, u64>(value.trunc()).unwrap_or(u64::MAX)
}

/// Clamp a ratio into `[0.0, 1.0]`, mapping non-finite values to 0.
#[must_use]
pub fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite_and_negative() {
        assert_eq!(floor_f64_to_usize(f64::NAN), 0);
        assert_eq!(floor_f64_to_usize(-3.2), 0);
        assert_eq!(floor_f64_to_usize(7.9), 7);
        assert_eq!(f64_millis_to_u64(1_700_000_000_123.9), 1_700_000_000_123);
        assert_eq!(f64_millis_to_u64(f64::NAN), 0);
    }

    #[test]
    fn unit_clamp_caps_ratio() {
        assert!((unit_clamp(1.7) - 1.0).abs() < f64::EPSILON);
        assert!((unit_clamp(f64::NAN)).abs() < f64::EPSILON);
        assert!((unit_clamp(0.25) - 0.25).abs() < f64::EPSILON);
    }
}
