//! Level and multiplication accounting, computed before any homomorphic work.
//!
//! Every sub-evaluation is handed the level its result must land on:
//!
//! * a leaf builds its accumulator one level above its target (at the
//!   product scale) and rescales once, so it needs every power it reads to
//!   sit at least one level above the target;
//! * a split node asks for its high part one level above its own target,
//!   multiplies by `x^d` and rescales down to the target, then adds the low
//!   part produced directly at the target.
//!
//! The depth of a sub-tree is therefore the smallest gap between the input
//! level and the target that satisfies every leaf and every `x^d`.

use serde::Serialize;

use crate::{
    basis::required_exponents,
    error::{EvalError, Result},
    params::{giant_step, DepthParams, Strategy},
};

/// Shape and cost of one evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EvaluationPlan {
    /// Degree of the planned polynomial.
    pub degree: usize,
    /// Strategy the plan was made for.
    pub strategy: Strategy,
    /// Giant-step exponent `M`.
    pub m: u32,
    /// Baby-step exponent `L`.
    pub l: u32,
    /// Levels between the input ciphertext and the result.
    ///
    /// Economical plans use exactly `max(1, ⌈log2(degree + 1)⌉)` levels: the
    /// scalar products of a leaf need their own rescale, so even `x^1` costs
    /// one. Fast plans use at most one level more than that.
    pub depth: usize,
    /// Exponents the power basis will hold, seed included.
    pub basis_exponents: Vec<usize>,
    /// Ciphertext multiplications spent building the basis.
    pub basis_multiplications: usize,
    /// Ciphertext multiplications spent combining split halves.
    pub combine_multiplications: usize,
}

impl EvaluationPlan {
    /// Plans a polynomial of the given degree.
    #[must_use]
    pub fn new(degree: usize, strategy: Strategy) -> Self {
        let params = DepthParams::new(degree, strategy);
        let basis_exponents: Vec<usize> = required_exponents(params).into_iter().collect();
        Self {
            degree,
            strategy,
            m: params.m,
            l: params.l,
            depth: subtree_depth(degree, params.l, params.m),
            basis_multiplications: basis_exponents.len() - 1,
            basis_exponents,
            combine_multiplications: split_count(degree, params.l, params.m),
        }
    }

    /// `(M, L)` this plan was derived from.
    #[must_use]
    pub fn params(&self) -> DepthParams {
        DepthParams { m: self.m, l: self.l }
    }

    /// Total ciphertext-ciphertext multiplications.
    pub fn multiplications(&self) -> usize {
        self.basis_multiplications + self.combine_multiplications
    }

    /// Rejects inputs that cannot absorb [`EvaluationPlan::depth`] levels.
    pub fn check_level(&self, level: usize) -> Result<()> {
        if level < self.depth {
            return Err(EvalError::InsufficientLevel {
                level,
                required: self.depth,
            });
        }
        Ok(())
    }
}

/// Shorthand for [`EvaluationPlan::new`].
#[must_use]
pub fn plan(degree: usize, strategy: Strategy) -> EvaluationPlan {
    EvaluationPlan::new(degree, strategy)
}

/// Levels consumed by a leaf reading powers up to `x^max_degree`.
pub(crate) fn leaf_depth(max_degree: usize) -> usize {
    giant_step(max_degree) as usize + 1
}

/// Largest `M` whose split point `2^(M-1)` does not exceed `max_degree`.
pub(crate) fn tighten(max_degree: usize, mut m: u32) -> u32 {
    while m > 1 && (1usize << (m - 1)) > max_degree {
        m -= 1;
    }
    m
}

/// Levels consumed by evaluating a sub-polynomial of degree `max_degree`.
pub(crate) fn subtree_depth(max_degree: usize, l: u32, m: u32) -> usize {
    if max_degree <= 1 << l {
        return leaf_depth(max_degree);
    }
    let m = tighten(max_degree, m);
    let d = 1usize << (m - 1);
    let high = subtree_depth(max_degree - d, l, m - 1);
    let low = subtree_depth(d - 1, l, m - 1);
    (m as usize).max(high + 1).max(low)
}

fn split_count(max_degree: usize, l: u32, m: u32) -> usize {
    if max_degree <= 1 << l {
        return 0;
    }
    let m = tighten(max_degree, m);
    let d = 1usize << (m - 1);
    1 + split_count(max_degree - d, l, m - 1) + split_count(d - 1, l, m - 1)
}
