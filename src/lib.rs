//! Depth-aware polynomial evaluation on CKKS-style ciphertexts.
//!
//! Builds a memoized power basis of the encrypted input and evaluates
//! `p(x) = Σ cᵢxⁱ` with a Paterson-Stockmeyer split, consuming a number of
//! levels logarithmic in the degree. The homomorphic primitives themselves
//! come from an [`Evaluator`] implementation.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, missing_docs)]

pub mod basis;
pub mod ciphertext;
pub mod coeffs;
pub mod counting;
pub mod error;
pub mod evaluator;
pub mod params;
pub mod plain;
pub mod planner;
pub mod poly_eval;
pub mod summation;

pub use basis::PowerBasis;
pub use ciphertext::Ciphertext;
pub use coeffs::{CoefficientInput, Coefficients};
pub use counting::{CountingEvaluator, OpCounts};
pub use error::{EvalError, Result};
pub use evaluator::Evaluator;
pub use params::{DepthParams, EvalConfig, Strategy};
pub use plain::{PlainCiphertext, PlainEvaluator};
pub use planner::{plan, EvaluationPlan};
pub use poly_eval::{evaluate_polynomial, PolynomialEvaluator};
