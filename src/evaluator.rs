//! Homomorphic arithmetic consumed by the polynomial evaluator.
//!
//! The scheduler never looks inside a ciphertext; everything it does goes
//! through this trait. Implementations must enforce the preconditions
//! listed on each method and report violations through [`EvalError`].
//!
//! [`EvalError`]: crate::error::EvalError

use num_complex::Complex64;

use crate::{ciphertext::Ciphertext, error::Result};

/// Primitive encrypted operations of a leveled CKKS-style scheme.
pub trait Evaluator {
    /// Ciphertext type operated on.
    type Ciphertext: Ciphertext;
    /// Relinearization material passed to [`Evaluator::mul_relin`].
    type EvaluationKey;

    /// The ambient scale every rescale normalizes to.
    fn target_scale(&self) -> f64;

    /// Scale at which plaintext constants are encoded for
    /// [`Evaluator::mul_const_and_acc`].
    fn constant_scale(&self) -> f64 {
        self.target_scale()
    }

    /// Fresh encryption of zero at the given level and scale.
    fn zero(&self, level: usize, scale: f64) -> Self::Ciphertext;

    /// `a * b` followed by relinearization.
    ///
    /// The product sits at `min(a.level, b.level)` with scale
    /// `a.scale * b.scale`. Fails with `InsufficientLevel` if either operand
    /// is at level 0.
    fn mul_relin(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
        evk: &Self::EvaluationKey,
    ) -> Result<Self::Ciphertext>;

    /// Divides out one modulus and normalizes the scale to
    /// [`Evaluator::target_scale`].
    ///
    /// A ciphertext carrying a product scale loses exactly one level. One
    /// already at the target scale has nothing to divide out and is left
    /// untouched. Fails with `InsufficientLevel` when a division is needed at
    /// level 0.
    fn rescale(&self, ct: &mut Self::Ciphertext) -> Result<()>;

    /// `a + b`; both operands must share level and scale
    /// (`LevelScaleMismatch` otherwise).
    fn add(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext>;

    /// Adds a plaintext constant encoded at `ct`'s own scale. Costs no level.
    fn add_constant(&self, ct: &mut Self::Ciphertext, constant: Complex64);

    /// `acc += ct * constant` without relinearization or rescale.
    ///
    /// Evaluated at `acc`'s level, so `ct.level >= acc.level` is required,
    /// and `acc.scale` must equal `ct.scale * constant_scale`.
    fn mul_const_and_acc(
        &self,
        ct: &Self::Ciphertext,
        constant: Complex64,
        acc: &mut Self::Ciphertext,
    ) -> Result<()>;

    /// Lowers `ct` by `n` levels without multiplying.
    fn drop_level(&self, ct: &mut Self::Ciphertext, n: usize) -> Result<()>;
}
