//! Paterson-Stockmeyer polynomial evaluation on encrypted inputs.
//!
//! `p(x) = q(x)·x^d + r(x)` is split at the largest power of two below the
//! degree, both halves are evaluated recursively against a shared power
//! basis, and recombined with one multiplication. Leaves of degree at most
//! `2^L` are summed directly from the basis. The whole call consumes
//! [`EvaluationPlan::depth`] levels, logarithmic in the degree.

use log::{debug, info};
use num_complex::Complex64;

use crate::{
    basis::PowerBasis,
    ciphertext::{scales_match, Ciphertext},
    coeffs::{split_at_power, CoefficientInput, Coefficients},
    error::{EvalError, Result},
    evaluator::Evaluator,
    params::{EvalConfig, Strategy},
    planner::{tighten, EvaluationPlan},
    summation,
};

/// Evaluates `Σ coefficients[i]·x^i` on the encryption `ct` of `x`.
///
/// `ct` must be at the evaluator's target scale and hold at least
/// [`EvaluationPlan::depth`] levels. It is cloned, never modified.
pub fn evaluate_polynomial<E: Evaluator>(
    eval: &E,
    ct: &E::Ciphertext,
    coefficients: impl Into<CoefficientInput>,
    evk: &E::EvaluationKey,
    strategy: Strategy,
) -> Result<E::Ciphertext> {
    let coeffs = Coefficients::normalize(coefficients)?;
    PolynomialEvaluator::new(eval, evk, strategy).evaluate(ct, &coeffs)
}

/// Holds the arithmetic backend, its key and the evaluation settings.
pub struct PolynomialEvaluator<'a, E: Evaluator> {
    eval: &'a E,
    evk: &'a E::EvaluationKey,
    config: EvalConfig,
}

impl<'a, E: Evaluator> PolynomialEvaluator<'a, E> {
    /// Accepts a bare [`Strategy`] or a full [`EvalConfig`].
    pub fn new(eval: &'a E, evk: &'a E::EvaluationKey, config: impl Into<EvalConfig>) -> Self {
        Self {
            eval,
            evk,
            config: config.into(),
        }
    }

    /// Settings in effect.
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Plan for a polynomial of `degree` under this evaluator's strategy.
    pub fn plan(&self, degree: usize) -> EvaluationPlan {
        EvaluationPlan::new(degree, self.config.strategy)
    }

    /// Evaluates `coeffs` on `ct`; the result lands `plan.depth` levels
    /// below `ct` at the target scale.
    pub fn evaluate(&self, ct: &E::Ciphertext, coeffs: &Coefficients) -> Result<E::Ciphertext> {
        let target_scale = self.eval.target_scale();
        if !scales_match(ct.scale(), target_scale) {
            return Err(EvalError::LevelScaleMismatch {
                lhs_level: ct.level(),
                rhs_level: ct.level(),
                lhs_scale: ct.scale(),
                rhs_scale: target_scale,
            });
        }

        let plan = self.plan(coeffs.degree());
        info!(
            "evaluating degree {} ({}): M={} L={} depth={} mults={}",
            plan.degree,
            plan.strategy,
            plan.m,
            plan.l,
            plan.depth,
            plan.multiplications()
        );
        plan.check_level(ct.level())?;

        let basis = PowerBasis::build(ct, plan.params(), self.eval, self.evk)?;
        let target = ct.level() - plan.depth;
        let res = self.recurse(&basis, plan.l, plan.m, coeffs.as_slice(), target)?;
        debug_assert_eq!(res.level(), target);
        Ok(res)
    }

    /// Produces the sub-polynomial `coeffs` at exactly `target` level.
    fn recurse(
        &self,
        basis: &PowerBasis<E::Ciphertext>,
        l: u32,
        m: u32,
        coeffs: &[Complex64],
        target: usize,
    ) -> Result<E::Ciphertext> {
        let max_degree = coeffs.len() - 1;
        if max_degree <= 1 << l {
            return summation::evaluate_from_basis(
                self.eval,
                coeffs,
                basis,
                target,
                self.config.negligible_threshold,
            );
        }

        let m = tighten(max_degree, m);
        let d = 1usize << (m - 1);
        let (high, low) = split_at_power(coeffs, d);
        debug!("degree {max_degree}: split at x^{d} (M={m}), target level {target}");

        let high = self.recurse(basis, l, m - 1, high, target + 1)?;
        let low = self.recurse(basis, l, m - 1, low, target)?;

        let mut res = self.eval.mul_relin(&high, &basis[d], self.evk)?;
        self.eval.rescale(&mut res)?;
        let mut res = self.eval.add(&res, &low)?;
        // scale alignment only; the product was already divided down
        self.eval.rescale(&mut res)?;
        Ok(res)
    }
}
