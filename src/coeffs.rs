//! Coefficient normalization.
//!
//! Callers hand over either real or complex coefficients; everything past
//! this module only ever sees the canonical complex form.

use std::any::{type_name, Any};

use num_complex::Complex64;

use crate::error::{EvalError, Result};

/// Caller-side coefficient sequence, index = power.
#[derive(Clone, Debug, PartialEq)]
pub enum CoefficientInput {
    /// Real coefficients, widened with a zero imaginary part.
    Real(Vec<f64>),
    /// Complex coefficients, taken as-is.
    Complex(Vec<Complex64>),
}

impl CoefficientInput {
    /// Resolves a loosely-typed value into one of the two supported kinds.
    ///
    /// Accepts owned `Vec<f64>` and `Vec<Complex64>` only. Slices, `'static`
    /// or not, are rejected here; convert them with `CoefficientInput::from`.
    /// Anything else is `UnsupportedCoefficientType`.
    pub fn from_any<T: Any>(value: &T) -> Result<Self> {
        let any = value as &dyn Any;
        if let Some(v) = any.downcast_ref::<Vec<f64>>() {
            return Ok(Self::Real(v.clone()));
        }
        if let Some(v) = any.downcast_ref::<Vec<Complex64>>() {
            return Ok(Self::Complex(v.clone()));
        }
        Err(EvalError::UnsupportedCoefficientType {
            found: type_name::<T>(),
        })
    }

    /// Number of coefficients, i.e. degree + 1.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Complex(v) => v.len(),
        }
    }

    /// True when there is nothing to evaluate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<f64>> for CoefficientInput {
    fn from(v: Vec<f64>) -> Self {
        Self::Real(v)
    }
}

impl From<&[f64]> for CoefficientInput {
    fn from(v: &[f64]) -> Self {
        Self::Real(v.to_vec())
    }
}

impl From<Vec<Complex64>> for CoefficientInput {
    fn from(v: Vec<Complex64>) -> Self {
        Self::Complex(v)
    }
}

impl From<&[Complex64]> for CoefficientInput {
    fn from(v: &[Complex64]) -> Self {
        Self::Complex(v.to_vec())
    }
}

impl From<Coefficients> for CoefficientInput {
    fn from(c: Coefficients) -> Self {
        Self::Complex(c.coeffs)
    }
}

/// Normalized polynomial: `coeffs[i]` multiplies `x^i`, never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Coefficients {
    coeffs: Vec<Complex64>,
}

impl Coefficients {
    /// Widens and validates caller input.
    pub fn normalize(input: impl Into<CoefficientInput>) -> Result<Self> {
        let coeffs: Vec<Complex64> = match input.into() {
            CoefficientInput::Real(v) => v.into_iter().map(|re| Complex64::new(re, 0.0)).collect(),
            CoefficientInput::Complex(v) => v,
        };
        if coeffs.is_empty() {
            return Err(EvalError::EmptyPolynomial);
        }
        Ok(Self { coeffs })
    }

    /// Shorthand for [`Coefficients::normalize`] on real input.
    pub fn from_real(coeffs: &[f64]) -> Result<Self> {
        Self::normalize(coeffs)
    }

    /// Shorthand for [`Coefficients::normalize`] on complex input.
    pub fn from_complex(coeffs: &[Complex64]) -> Result<Self> {
        Self::normalize(coeffs)
    }

    /// `len - 1`; zero for a constant polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficients by increasing power.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Consumes the polynomial, returning its coefficients.
    pub fn into_vec(self) -> Vec<Complex64> {
        self.coeffs
    }

    /// Direct (Horner) evaluation in the clear.
    pub fn eval(&self, x: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
    }
}

/// Splits `p = q·x^d + r`, returning `(q, r)`.
///
/// `r` holds the `d` coefficients below `x^d`, `q` the rest re-indexed from
/// zero, so `q[0]` is the coefficient of `x^d`.
pub(crate) fn split_at_power(coeffs: &[Complex64], d: usize) -> (&[Complex64], &[Complex64]) {
    let (r, q) = coeffs.split_at(d);
    (q, r)
}
