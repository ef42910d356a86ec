//! Power basis: memoized encryptions of `x^n`.
//!
//! Entry `n` is built from entries `⌈n/2⌉` and `⌊n/2⌋` with one
//! multiplication and one rescale, so `x^n` sits `⌈log2 n⌉` levels below the
//! seed. Every entry is written exactly once and never removed.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;

use log::debug;
use num_integer::Integer;

use crate::{ciphertext::Ciphertext, error::Result, evaluator::Evaluator, params::DepthParams};

/// Exponents requested by the builder, in build order: the dense baby-step
/// range `2..=2^L`, then the giant-step doublings `2^(L+1) .. 2^(M-1)`.
#[must_use]
pub fn schedule(params: DepthParams) -> Vec<usize> {
    let dense = 2..=params.baby_step_bound();
    let doublings = (params.l + 1..params.m).map(|i| 1usize << i);
    dense.chain(doublings).collect()
}

/// Every exponent the builder ends up holding for `params`, seed included.
#[must_use]
pub fn required_exponents(params: DepthParams) -> BTreeSet<usize> {
    fn close(n: usize, set: &mut BTreeSet<usize>) {
        if set.insert(n) {
            close(Integer::div_ceil(&n, &2), set);
            close(n / 2, set);
        }
    }

    let mut set = BTreeSet::from([1]);
    for n in schedule(params) {
        close(n, &mut set);
    }
    set
}

/// Exponent-indexed table of ciphertext powers, scoped to one evaluation.
#[derive(Clone, Debug)]
pub struct PowerBasis<C> {
    powers: BTreeMap<usize, C>,
}

impl<C: Ciphertext> PowerBasis<C> {
    /// Seeds `x^1` with a clone of `ct`; the caller's ciphertext is untouched.
    pub fn new(ct: &C) -> Self {
        Self {
            powers: BTreeMap::from([(1, ct.clone())]),
        }
    }

    /// Seeds from `ct` and computes every exponent in [`schedule`].
    pub fn build<E>(ct: &C, params: DepthParams, eval: &E, evk: &E::EvaluationKey) -> Result<Self>
    where
        E: Evaluator<Ciphertext = C>,
    {
        let mut basis = Self::new(ct);
        for n in schedule(params) {
            basis.ensure(n, eval, evk)?;
        }
        debug!(
            "power basis ready: M={} L={} entries={:?}",
            params.m,
            params.l,
            basis.exponents().collect::<Vec<_>>()
        );
        Ok(basis)
    }

    /// Computes `x^n` (and whatever it depends on) unless already present.
    pub fn ensure<E>(&mut self, n: usize, eval: &E, evk: &E::EvaluationKey) -> Result<()>
    where
        E: Evaluator<Ciphertext = C>,
    {
        debug_assert!(n >= 1, "exponent 0 is never stored");
        if self.powers.contains_key(&n) {
            return Ok(());
        }

        let a = Integer::div_ceil(&n, &2);
        let b = n / 2;
        self.ensure(a, eval, evk)?;
        self.ensure(b, eval, evk)?;

        let mut power = eval.mul_relin(&self.powers[&a], &self.powers[&b], evk)?;
        eval.rescale(&mut power)?;
        debug!("x^{n} = x^{a} * x^{b} at level {}", power.level());

        self.powers.insert(n, power);
        Ok(())
    }

    /// `x^n`, if it has been computed.
    pub fn get(&self, n: usize) -> Option<&C> {
        self.powers.get(&n)
    }

    /// `x^1`.
    pub fn seed(&self) -> &C {
        &self.powers[&1]
    }

    /// Whether `x^n` has been computed.
    pub fn contains(&self, n: usize) -> bool {
        self.powers.contains_key(&n)
    }

    /// Number of stored powers, seed included.
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Never true for a seeded basis.
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    /// Stored exponents in increasing order.
    pub fn exponents(&self) -> impl Iterator<Item = usize> + '_ {
        self.powers.keys().copied()
    }
}

/// Panics if `x^n` was never computed.
impl<C> Index<usize> for PowerBasis<C> {
    type Output = C;

    fn index(&self, n: usize) -> &C {
        &self.powers[&n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::CountingEvaluator;
    use crate::params::{giant_step, Strategy};
    use crate::plain::PlainEvaluator;
    use num_complex::Complex64;

    const SCALE: f64 = (1u64 << 40) as f64;

    #[test]
    fn test_schedule_fast_and_eco() {
        // M = 7
        assert_eq!(
            schedule(DepthParams::new(100, Strategy::Fast)),
            vec![2, 3, 4, 5, 6, 7, 8, 16, 32, 64]
        );
        assert_eq!(
            schedule(DepthParams::new(100, Strategy::Economical)),
            vec![2, 4, 8, 16, 32, 64]
        );
        assert!(schedule(DepthParams::new(1, Strategy::Fast)).is_empty());
    }

    #[test]
    fn test_required_exponents_closure() {
        let set = required_exponents(DepthParams::new(100, Strategy::Economical));
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 4, 8, 16, 32, 64]);

        // x^7 needs x^4 and x^3, x^3 needs x^2 and x^1
        let set = required_exponents(DepthParams { m: 4, l: 3 });
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_each_entry_computed_once() {
        for degree in [2usize, 5, 17, 64, 100, 300] {
            for strategy in Strategy::ALL {
                let params = DepthParams::new(degree, strategy);
                let eval = CountingEvaluator::new(PlainEvaluator::new(4, SCALE));
                let ct = eval.inner().encrypt(&[Complex64::new(0.5, 0.1); 4], 16);

                let basis = PowerBasis::build(&ct, params, &eval, &()).unwrap();

                assert_eq!(eval.counts().mul_relin, basis.len() - 1, "degree {degree} {strategy}");
                assert_eq!(
                    basis.exponents().collect::<BTreeSet<_>>(),
                    required_exponents(params)
                );
            }
        }
    }

    #[test]
    fn test_entries_hold_powers_at_expected_level() {
        let eval = PlainEvaluator::new(2, SCALE);
        let x = Complex64::new(0.9, -0.3);
        let ct = eval.encrypt(&[x, x], 10);

        let mut basis = PowerBasis::new(&ct);
        assert!(!basis.is_empty());
        assert!(basis.contains(1) && !basis.contains(2));
        assert!(basis.get(2).is_none());
        for n in 1..=9 {
            basis.ensure(n, &eval, &()).unwrap();
        }

        for n in 1..=9usize {
            let entry = &basis[n];
            let expected = x.powu(u32::try_from(n).unwrap());
            assert!((entry.slots()[0] - expected).norm() < 1e-12, "x^{n}");
            assert_eq!(entry.level(), 10 - giant_step(n) as usize, "level of x^{n}");
            assert!((entry.scale() - SCALE).abs() < 1.0);
        }
        assert_eq!(ct.level(), 10);
        assert_eq!(basis.get(9).map(Ciphertext::level), Some(6));
        assert!(basis.contains(9) && !basis.contains(10));
    }

    #[test]
    fn test_build_fails_without_levels() {
        let eval = PlainEvaluator::new(1, SCALE);
        let ct = eval.encrypt(&[Complex64::new(1.0, 0.0)], 2);
        let err = PowerBasis::build(&ct, DepthParams::new(64, Strategy::Economical), &eval, &()).unwrap_err();
        assert!(matches!(err, crate::error::EvalError::InsufficientLevel { level: 0, .. }));
    }
}
