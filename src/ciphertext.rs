//! Ciphertext metadata seen by the scheduler.

/// Relative tolerance under which two scales count as equal.
pub const SCALE_TOLERANCE: f64 = 1e-9;

/// The two pieces of metadata the evaluator schedules on.
///
/// The encrypted payload itself stays opaque; only the backend touches it.
pub trait Ciphertext: Clone {
    /// Remaining multiplicative budget.
    fn level(&self) -> usize;

    /// Fixed-point scale of the encoded plaintext.
    fn scale(&self) -> f64;
}

/// Scale equality up to [`SCALE_TOLERANCE`].
#[must_use]
pub fn scales_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCALE_TOLERANCE * a.abs().max(b.abs())
}

/// `true` when `a` and `b` may be added.
#[must_use]
pub fn aligned<C: Ciphertext>(a: &C, b: &C) -> bool {
    a.level() == b.level() && scales_match(a.scale(), b.scale())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Meta(usize, f64);

    impl Ciphertext for Meta {
        fn level(&self) -> usize {
            self.0
        }
        fn scale(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn test_scales_match_is_relative() {
        let delta = 2f64.powi(40);
        assert!(scales_match(delta * delta, delta * delta * (1.0 + 1e-12)));
        assert!(!scales_match(delta, delta * 2.0));
        assert!(scales_match(1.0, 1.0));
    }

    #[test]
    fn test_aligned_checks_level_and_scale() {
        assert!(aligned(&Meta(3, 1024.0), &Meta(3, 1024.0)));
        assert!(!aligned(&Meta(3, 1024.0), &Meta(2, 1024.0)));
        assert!(!aligned(&Meta(3, 1024.0), &Meta(3, 2048.0)));
    }
}
