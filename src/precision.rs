//! Precision constants for orientation comparisons.
//!
//! Every equality test, zero-length check and logarithm guard in the crate
//! goes through these values.

/// Angular tolerance (radians) for axial equality and parallelism checks.
/// Value: 1.0e-9
pub const ANGULAR: f64 = 1.0e-9;

/// Confusion tolerance for polar vectors: two vectors are equal when
/// the length of their difference is below this value.
/// Value: 1.0e-9
pub const CONFUSION: f64 = 1.0e-9;

/// Square of CONFUSION for performance.
pub const SQUARE_CONFUSION: f64 = CONFUSION * CONFUSION;

/// Smallest vector length that can still be normalized.
/// Value: 1.0e-12
pub const RESOLUTION: f64 = 1.0e-12;

/// Replacement for zero eigenvalues or stretches inside logarithms.
/// Value: 1.0e-12
pub const LOG_EPSILON: f64 = 1.0e-12;

/// Grid step used to quantize components before hashing.
/// Value: 1.0e-9
pub const HASH_QUANTUM: f64 = 1.0e-9;

/// Quantize a component onto the hashing grid.
#[inline]
pub fn quantize(value: f64) -> i64 {
    (value / HASH_QUANTUM).round() as i64
}

/// Check if a length is too small to normalize.
#[inline]
pub fn is_degenerate_length(value: f64) -> bool {
    !(value > RESOLUTION) || !value.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_values() {
        assert_eq!(ANGULAR, 1.0e-9);
        assert_eq!(CONFUSION, 1.0e-9);
        assert_eq!(SQUARE_CONFUSION, 1.0e-18);
    }

    #[test]
    fn test_quantize_signed_zero() {
        assert_eq!(quantize(0.0), quantize(-0.0));
        assert_eq!(quantize(1.0e-12), 0);
        assert_ne!(quantize(1.0), quantize(-1.0));
    }

    #[test]
    fn test_degenerate_length() {
        assert!(is_degenerate_length(0.0));
        assert!(is_degenerate_length(f64::NAN));
        assert!(!is_degenerate_length(1.0));
    }
}
