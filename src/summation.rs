//! Leaf evaluation: `Σ c_k · x^k` straight from the power basis.

use log::debug;
use num_complex::Complex64;

use crate::{basis::PowerBasis, ciphertext::Ciphertext, error::Result, evaluator::Evaluator};

/// Coefficients at or below this magnitude (both parts) are skipped.
pub const DEFAULT_NEGLIGIBLE_THRESHOLD: f64 = 1e-15;

/// `true` when neither part of `c` exceeds `threshold`.
#[must_use]
pub fn is_negligible(c: Complex64, threshold: f64) -> bool {
    c.re.abs() <= threshold && c.im.abs() <= threshold
}

/// Weighted sum of basis entries, landing at `target_level`.
///
/// The accumulator starts as a zero at `target_level + 1` with the scale a
/// constant product carries, collects the constant term and every
/// non-negligible `c_k · x^k`, and is rescaled exactly once whatever was
/// skipped. Requires `coeffs.len() - 1` powers in `basis`, each at least one
/// level above `target_level`.
pub(crate) fn evaluate_from_basis<E: Evaluator>(
    eval: &E,
    coeffs: &[Complex64],
    basis: &PowerBasis<E::Ciphertext>,
    target_level: usize,
    threshold: f64,
) -> Result<E::Ciphertext> {
    let seed = basis.seed();
    let mut acc = eval.zero(target_level + 1, seed.scale() * eval.constant_scale());

    if let Some(&c0) = coeffs.first() {
        if !is_negligible(c0, threshold) {
            eval.add_constant(&mut acc, c0);
        }
    }

    let mut folded = 0usize;
    for (k, &c) in coeffs.iter().enumerate().skip(1).rev() {
        if is_negligible(c, threshold) {
            continue;
        }
        eval.mul_const_and_acc(&basis[k], c, &mut acc)?;
        folded += 1;
    }

    eval.rescale(&mut acc)?;
    debug!(
        "leaf of degree {} folded {folded} term(s), result at level {}",
        coeffs.len().saturating_sub(1),
        acc.level()
    );
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::CountingEvaluator;
    use crate::plain::PlainEvaluator;

    const SCALE: f64 = (1u64 << 30) as f64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn basis_up_to(eval: &CountingEvaluator<PlainEvaluator>, x: Complex64, n: usize) -> PowerBasis<crate::plain::PlainCiphertext> {
        let ct = eval.inner().encrypt(&[x], 8);
        let mut basis = PowerBasis::new(&ct);
        for k in 2..=n {
            basis.ensure(k, eval, &()).unwrap();
        }
        basis
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_negligible(c(1e-15, -1e-15), DEFAULT_NEGLIGIBLE_THRESHOLD));
        assert!(is_negligible(c(0.0, 0.0), DEFAULT_NEGLIGIBLE_THRESHOLD));
        assert!(!is_negligible(c(1e-14, 0.0), DEFAULT_NEGLIGIBLE_THRESHOLD));
        assert!(!is_negligible(c(0.0, -1e-14), DEFAULT_NEGLIGIBLE_THRESHOLD));
    }

    #[test]
    fn test_weighted_sum() {
        let eval = CountingEvaluator::new(PlainEvaluator::new(1, SCALE));
        let x = c(0.7, 0.2);
        let basis = basis_up_to(&eval, x, 4);
        let coeffs = [c(1.0, 0.0), c(-2.0, 0.5), c(0.0, 0.0), c(3.0, 0.0), c(0.25, -1.0)];

        let res = evaluate_from_basis(&eval, &coeffs, &basis, 5, DEFAULT_NEGLIGIBLE_THRESHOLD).unwrap();

        let expected: Complex64 = coeffs
            .iter()
            .enumerate()
            .map(|(k, &ck)| ck * x.powu(u32::try_from(k).unwrap()))
            .sum();
        assert!((res.slots()[0] - expected).norm() < 1e-12);
        assert_eq!(res.level(), 5);
        assert!((res.scale() - SCALE).abs() < 1e-3);
    }

    #[test]
    fn test_negligible_terms_are_skipped() {
        let eval = CountingEvaluator::new(PlainEvaluator::new(1, SCALE));
        let basis = basis_up_to(&eval, c(0.5, 0.0), 4);
        eval.reset();

        let coeffs = [c(1e-16, 0.0), c(0.0, 0.0), c(1e-14, 0.0), c(2.0, 0.0), c(0.0, 5e-16)];
        let res = evaluate_from_basis(&eval, &coeffs, &basis, 4, DEFAULT_NEGLIGIBLE_THRESHOLD).unwrap();

        let counts = eval.counts();
        assert_eq!(counts.add_constant, 0);
        assert_eq!(counts.mul_const_and_acc, 2);
        assert_eq!(counts.rescale, 1);
        assert!((res.slots()[0] - c(1e-14 * 0.25 + 2.0 * 0.125, 0.0)).norm() < 1e-15);
    }

    #[test]
    fn test_all_skipped_still_rescales_once() {
        let eval = CountingEvaluator::new(PlainEvaluator::new(1, SCALE));
        let basis = basis_up_to(&eval, c(0.5, 0.0), 2);
        eval.reset();

        let res = evaluate_from_basis(&eval, &[c(0.0, 0.0); 3], &basis, 6, DEFAULT_NEGLIGIBLE_THRESHOLD).unwrap();

        assert_eq!(eval.counts().rescale, 1);
        assert_eq!(res.level(), 6);
        assert_eq!(res.slots()[0], c(0.0, 0.0));
    }

    #[test]
    fn test_custom_threshold() {
        let eval = CountingEvaluator::new(PlainEvaluator::new(1, SCALE));
        let basis = basis_up_to(&eval, c(0.5, 0.0), 2);
        eval.reset();

        let coeffs = [c(1e-6, 0.0), c(1e-4, 0.0), c(1.0, 0.0)];
        let res = evaluate_from_basis(&eval, &coeffs, &basis, 6, 1e-5).unwrap();

        assert_eq!(eval.counts().add_constant, 0);
        assert_eq!(eval.counts().mul_const_and_acc, 2);
        assert!((res.slots()[0] - c(0.5e-4 + 0.25, 0.0)).norm() < 1e-15);
    }
}
