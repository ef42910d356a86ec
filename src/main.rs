//! Polynomial evaluation demo on the plaintext-model backend

use ckks_polyeval::{
    Ciphertext, Coefficients, CountingEvaluator, EvaluationPlan, PlainEvaluator, PolynomialEvaluator, Strategy,
};
use csv::Writer;
use itertools::iproduct;
use num_complex::Complex64;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::error::Error;
use std::time::Instant;

#[derive(Serialize)]
struct StatsRow {
    function: &'static str,
    degree: usize,
    strategy: Strategy,
    levels_consumed: usize,
    planned_depth: usize,
    ct_mults: usize,
    max_error: f64,
    time_us: u128,
}

fn taylor_exp(degree: usize) -> Vec<f64> {
    let mut coeffs = Vec::with_capacity(degree + 1);
    let mut term = 1.0;
    for k in 0..=degree {
        if k > 0 {
            term /= k as f64;
        }
        coeffs.push(term);
    }
    coeffs
}

fn taylor_sin(degree: usize) -> Vec<f64> {
    taylor_exp(degree)
        .into_iter()
        .enumerate()
        .map(|(k, c)| match k % 4 {
            1 => c,
            3 => -c,
            _ => 0.0,
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path("poly_stats.csv")?;

    let slots = 16;
    let scale = 2f64.powi(40);
    let max_level = 12;
    let degrees = [3usize, 7, 15, 31, 63];
    let functions: [(&'static str, fn(usize) -> Vec<f64>, fn(Complex64) -> Complex64); 2] =
        [("exp", taylor_exp, Complex64::exp), ("sin", taylor_sin, Complex64::sin)];

    println!("slots = {}, scale = 2^40, input level = {}", slots, max_level);

    let mut rng = StdRng::seed_from_u64(2024);
    let xs: Vec<Complex64> = (0..slots)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-0.5..0.5)))
        .collect();

    for ((name, coeffs_of, reference), degree, strategy) in iproduct!(functions, degrees, Strategy::ALL) {
        let plan = EvaluationPlan::new(degree, strategy);
        let eval = CountingEvaluator::new(PlainEvaluator::new(slots, scale).with_noise(1e-12, 7)?);
        let ct = eval.inner().encrypt(&xs, max_level);
        let poly = Coefficients::from_real(&coeffs_of(degree))?;

        let start = Instant::now();
        let res = match PolynomialEvaluator::new(&eval, &(), strategy).evaluate(&ct, &poly) {
            Ok(res) => res,
            Err(e) => {
                println!("{name:>3} degree {degree:>2} {strategy:>4}: skipped ({e})");
                continue;
            }
        };
        let elapsed = start.elapsed();

        let max_error = eval
            .inner()
            .decrypt(&res)
            .iter()
            .zip(&xs)
            .map(|(got, &x)| (got - reference(x)).norm())
            .fold(0.0, f64::max);
        let row = StatsRow {
            function: name,
            degree,
            strategy,
            levels_consumed: ct.level() - res.level(),
            planned_depth: plan.depth,
            ct_mults: eval.counts().mul_relin,
            max_error,
            time_us: elapsed.as_micros(),
        };
        println!(
            "{:>3} degree {:>2} {:>4}: levels {} (planned {}), mults {:>3}, max error {:.3e}",
            row.function, row.degree, row.strategy, row.levels_consumed, row.planned_depth, row.ct_mults, row.max_error
        );
        wtr.serialize(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
