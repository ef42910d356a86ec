//! Error taxonomy for polynomial evaluation.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Everything that can stop an evaluation.
///
/// All variants are raised at the point where the violated precondition is
/// detected and propagate unchanged to the top-level call; no partial result
/// is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The coefficient sequence has no elements.
    #[error("polynomial has no coefficients")]
    EmptyPolynomial,

    /// The coefficient input is neither a real nor a complex sequence.
    #[error("coefficients must be a sequence of f64 or Complex64, found `{found}`")]
    UnsupportedCoefficientType {
        /// Type name of the rejected value.
        found: &'static str,
    },

    /// A multiplication or rescale needs more levels than the ciphertext has left.
    #[error("insufficient level: ciphertext is at level {level} but {required} level(s) are required")]
    InsufficientLevel {
        /// Level the ciphertext is at.
        level: usize,
        /// Levels the operation needs.
        required: usize,
    },

    /// Two operands of an addition (or accumulation) disagree on level or scale.
    #[error(
        "level/scale mismatch: lhs (level {lhs_level}, scale {lhs_scale:e}) vs rhs (level {rhs_level}, scale {rhs_scale:e})"
    )]
    LevelScaleMismatch {
        /// Level of the left operand.
        lhs_level: usize,
        /// Level of the right operand.
        rhs_level: usize,
        /// Scale of the left operand.
        lhs_scale: f64,
        /// Scale of the right operand.
        rhs_scale: f64,
    },
}

impl EvalError {
    /// `true` for errors caused by the caller's input rather than by scheduling.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPolynomial | Self::UnsupportedCoefficientType { .. }
        )
    }
}
