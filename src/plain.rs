//! Plaintext model of the homomorphic arithmetic.
//!
//! Ciphertexts carry their slot values in the clear next to `level` and
//! `scale`; every precondition of [`Evaluator`] is enforced exactly as a
//! real backend would. Slots hold the decoded values, so scale bookkeeping
//! never perturbs them. An optional Gaussian perturbation at each rescale
//! stands in for CKKS approximation error.

use std::cell::RefCell;

use num_complex::Complex64;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};

use crate::{
    ciphertext::{aligned, scales_match, Ciphertext},
    error::{EvalError, Result},
    evaluator::Evaluator,
};

/// Slots in the clear plus the metadata a real ciphertext would carry.
#[derive(Clone, Debug, PartialEq)]
pub struct PlainCiphertext {
    slots: Vec<Complex64>,
    level: usize,
    scale: f64,
}

impl PlainCiphertext {
    /// Wraps raw slot values with their level and scale.
    pub fn new(slots: Vec<Complex64>, level: usize, scale: f64) -> Self {
        Self { slots, level, scale }
    }

    /// Slot values as plain numbers, with the scale factored out.
    pub fn slots(&self) -> &[Complex64] {
        &self.slots
    }
}

impl Ciphertext for PlainCiphertext {
    fn level(&self) -> usize {
        self.level
    }

    fn scale(&self) -> f64 {
        self.scale
    }
}

struct Perturbation {
    normal: Normal<f64>,
    rng: StdRng,
}

/// [`Evaluator`] over [`PlainCiphertext`]; needs no key material.
pub struct PlainEvaluator {
    slot_count: usize,
    scale: f64,
    noise: Option<RefCell<Perturbation>>,
}

impl PlainEvaluator {
    /// Evaluator for `slot_count` slots normalizing to `scale`.
    pub fn new(slot_count: usize, scale: f64) -> Self {
        Self {
            slot_count,
            scale,
            noise: None,
        }
    }

    /// Adds independent `N(0, std_dev)` noise to both parts of every slot on
    /// each effective rescale.
    pub fn with_noise(mut self, std_dev: f64, seed: u64) -> std::result::Result<Self, NormalError> {
        let normal = Normal::new(0.0, std_dev)?;
        self.noise = Some(RefCell::new(Perturbation {
            normal,
            rng: StdRng::seed_from_u64(seed),
        }));
        Ok(self)
    }

    /// Width every ciphertext is padded to.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// "Encrypts" `values` at the target scale, zero-padded or truncated to
    /// the slot count.
    pub fn encrypt(&self, values: &[Complex64], level: usize) -> PlainCiphertext {
        let mut slots = values.to_vec();
        slots.resize(self.slot_count, Complex64::new(0.0, 0.0));
        PlainCiphertext::new(slots, level, self.scale)
    }

    /// Slot values of `ct`.
    pub fn decrypt(&self, ct: &PlainCiphertext) -> Vec<Complex64> {
        ct.slots.clone()
    }

    fn perturb(&self, slots: &mut [Complex64]) {
        if let Some(noise) = &self.noise {
            let mut noise = noise.borrow_mut();
            let Perturbation { normal, rng } = &mut *noise;
            for s in slots.iter_mut() {
                *s += Complex64::new(normal.sample(&mut *rng), normal.sample(&mut *rng));
            }
        }
    }
}

fn mismatch(a: &PlainCiphertext, b: &PlainCiphertext) -> EvalError {
    EvalError::LevelScaleMismatch {
        lhs_level: a.level,
        rhs_level: b.level,
        lhs_scale: a.scale,
        rhs_scale: b.scale,
    }
}

impl Evaluator for PlainEvaluator {
    type Ciphertext = PlainCiphertext;
    type EvaluationKey = ();

    fn target_scale(&self) -> f64 {
        self.scale
    }

    fn zero(&self, level: usize, scale: f64) -> PlainCiphertext {
        PlainCiphertext::new(vec![Complex64::new(0.0, 0.0); self.slot_count], level, scale)
    }

    fn mul_relin(&self, a: &PlainCiphertext, b: &PlainCiphertext, _evk: &()) -> Result<PlainCiphertext> {
        for ct in [a, b] {
            if ct.level == 0 {
                return Err(EvalError::InsufficientLevel { level: 0, required: 1 });
            }
        }
        let slots = a.slots.iter().zip(&b.slots).map(|(x, y)| x * y).collect();
        Ok(PlainCiphertext::new(slots, a.level.min(b.level), a.scale * b.scale))
    }

    fn rescale(&self, ct: &mut PlainCiphertext) -> Result<()> {
        if scales_match(ct.scale, self.scale) {
            return Ok(());
        }
        if ct.level == 0 {
            return Err(EvalError::InsufficientLevel { level: 0, required: 1 });
        }
        ct.level -= 1;
        ct.scale = self.scale;
        self.perturb(&mut ct.slots);
        Ok(())
    }

    fn add(&self, a: &PlainCiphertext, b: &PlainCiphertext) -> Result<PlainCiphertext> {
        if !aligned(a, b) {
            return Err(mismatch(a, b));
        }
        let slots = a.slots.iter().zip(&b.slots).map(|(x, y)| x + y).collect();
        Ok(PlainCiphertext::new(slots, a.level, a.scale))
    }

    fn add_constant(&self, ct: &mut PlainCiphertext, constant: Complex64) {
        for s in &mut ct.slots {
            *s += constant;
        }
    }

    fn mul_const_and_acc(&self, ct: &PlainCiphertext, constant: Complex64, acc: &mut PlainCiphertext) -> Result<()> {
        let product_scale = ct.scale * self.constant_scale();
        if ct.level < acc.level || !scales_match(acc.scale, product_scale) {
            return Err(mismatch(ct, acc));
        }
        for (a, s) in acc.slots.iter_mut().zip(&ct.slots) {
            *a += s * constant;
        }
        Ok(())
    }

    fn drop_level(&self, ct: &mut PlainCiphertext, n: usize) -> Result<()> {
        if n > ct.level {
            return Err(EvalError::InsufficientLevel {
                level: ct.level,
                required: n,
            });
        }
        ct.level -= n;
        Ok(())
    }
}
