//! Operation-counting wrapper around any [`Evaluator`].

use std::cell::Cell;

use num_complex::Complex64;
use serde::Serialize;

use crate::{error::Result, evaluator::Evaluator};

/// Calls made to each primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OpCounts {
    /// [`Evaluator::mul_relin`]
    pub mul_relin: usize,
    /// [`Evaluator::rescale`], including no-op calls.
    pub rescale: usize,
    /// [`Evaluator::add`]
    pub add: usize,
    /// [`Evaluator::add_constant`]
    pub add_constant: usize,
    /// [`Evaluator::mul_const_and_acc`]
    pub mul_const_and_acc: usize,
    /// [`Evaluator::drop_level`]
    pub drop_level: usize,
}

/// Forwards every call to `inner` and tallies it in [`OpCounts`].
pub struct CountingEvaluator<E> {
    inner: E,
    counts: Cell<OpCounts>,
}

impl<E> CountingEvaluator<E> {
    /// Wraps `inner` with all counters at zero.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            counts: Cell::new(OpCounts::default()),
        }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Snapshot of the counters.
    pub fn counts(&self) -> OpCounts {
        self.counts.get()
    }

    /// Zeroes every counter.
    pub fn reset(&self) {
        self.counts.set(OpCounts::default());
    }

    fn bump(&self, f: impl FnOnce(&mut OpCounts)) {
        let mut counts = self.counts.get();
        f(&mut counts);
        self.counts.set(counts);
    }
}

impl<E: Evaluator> Evaluator for CountingEvaluator<E> {
    type Ciphertext = E::Ciphertext;
    type EvaluationKey = E::EvaluationKey;

    fn target_scale(&self) -> f64 {
        self.inner.target_scale()
    }

    fn constant_scale(&self) -> f64 {
        self.inner.constant_scale()
    }

    fn zero(&self, level: usize, scale: f64) -> Self::Ciphertext {
        self.inner.zero(level, scale)
    }

    fn mul_relin(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
        evk: &Self::EvaluationKey,
    ) -> Result<Self::Ciphertext> {
        self.bump(|c| c.mul_relin += 1);
        self.inner.mul_relin(a, b, evk)
    }

    fn rescale(&self, ct: &mut Self::Ciphertext) -> Result<()> {
        self.bump(|c| c.rescale += 1);
        self.inner.rescale(ct)
    }

    fn add(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext> {
        self.bump(|c| c.add += 1);
        self.inner.add(a, b)
    }

    fn add_constant(&self, ct: &mut Self::Ciphertext, constant: Complex64) {
        self.bump(|c| c.add_constant += 1);
        self.inner.add_constant(ct, constant);
    }

    fn mul_const_and_acc(
        &self,
        ct: &Self::Ciphertext,
        constant: Complex64,
        acc: &mut Self::Ciphertext,
    ) -> Result<()> {
        self.bump(|c| c.mul_const_and_acc += 1);
        self.inner.mul_const_and_acc(ct, constant, acc)
    }

    fn drop_level(&self, ct: &mut Self::Ciphertext, n: usize) -> Result<()> {
        self.bump(|c| c.drop_level += 1);
        self.inner.drop_level(ct, n)
    }
}
