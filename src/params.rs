//! Evaluation strategy and depth parameters.

use serde::{Deserialize, Serialize};

use crate::summation::DEFAULT_NEGLIGIBLE_THRESHOLD;

/// Depth/speed tradeoff of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Wide baby-step range (`L = ⌊M/2⌋`): fewer multiplications.
    Fast,
    /// Narrow baby-step range (`L = 1`): fewer levels.
    Economical,
}

impl Strategy {
    /// Both strategies, Fast first.
    pub const ALL: [Strategy; 2] = [Strategy::Fast, Strategy::Economical];

    /// Baby-step width for a giant-step exponent `m`, kept in `1..=m`.
    #[must_use]
    pub fn baby_step(self, m: u32) -> u32 {
        match self {
            Strategy::Fast => (m / 2).clamp(1.min(m), m),
            Strategy::Economical => 1.min(m),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Fast => f.pad("fast"),
            Strategy::Economical => f.pad("eco"),
        }
    }
}

/// `(M, L)` for one evaluation: `2^(M-1) < degree <= 2^M`, `1 <= L <= M`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthParams {
    /// Giant-step exponent: `2^(M-1) < degree <= 2^M`.
    pub m: u32,
    /// Baby-step exponent: the basis is dense up to `2^L`.
    pub l: u32,
}

impl DepthParams {
    /// `M` is the bit length of `degree - 1` (zero for a constant).
    #[must_use]
    pub fn new(degree: usize, strategy: Strategy) -> Self {
        let m = giant_step(degree);
        Self {
            m,
            l: strategy.baby_step(m),
        }
    }

    /// Highest exponent the baby-step range covers densely.
    #[must_use]
    pub fn baby_step_bound(&self) -> usize {
        1 << self.l
    }
}

/// `⌈log2(degree)⌉`, zero for degrees 0 and 1.
#[must_use]
pub fn giant_step(degree: usize) -> u32 {
    if degree <= 1 {
        0
    } else {
        usize::BITS - (degree - 1).leading_zeros()
    }
}

/// Per-call evaluation settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Baby-step width policy.
    pub strategy: Strategy,
    /// Coefficients whose real and imaginary parts are both at or below
    /// this magnitude are skipped.
    pub negligible_threshold: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Fast,
            negligible_threshold: DEFAULT_NEGLIGIBLE_THRESHOLD,
        }
    }
}

impl EvalConfig {
    /// Default settings for `strategy`.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Replaces the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replaces the skip threshold for tiny coefficients.
    #[must_use]
    pub fn with_negligible_threshold(mut self, threshold: f64) -> Self {
        self.negligible_threshold = threshold;
        self
    }
}

impl From<Strategy> for EvalConfig {
    fn from(strategy: Strategy) -> Self {
        Self::new(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_giant_step() {
        let cases = [(0, 0), (1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (100, 7), (128, 7), (129, 8)];
        for (degree, m) in cases {
            assert_eq!(giant_step(degree), m, "degree {degree}");
            if degree > 1 {
                assert!(1usize << (m - 1) < degree && degree <= 1 << m);
            }
        }
    }

    #[test]
    fn test_baby_step_bounds() {
        for m in 0..20 {
            for s in Strategy::ALL {
                let l = s.baby_step(m);
                assert!(l <= m);
                if m >= 1 {
                    assert!(l >= 1, "{s} m={m}");
                }
            }
        }
        assert_eq!(Strategy::Fast.baby_step(7), 3);
        assert_eq!(Strategy::Economical.baby_step(7), 1);
    }

    #[test]
    fn test_depth_params() {
        let p = DepthParams::new(100, Strategy::Fast);
        assert_eq!(p, DepthParams { m: 7, l: 3 });
        assert_eq!(p.baby_step_bound(), 8);

        let p = DepthParams::new(100, Strategy::Economical);
        assert_eq!(p, DepthParams { m: 7, l: 1 });

        let p = DepthParams::new(0, Strategy::Fast);
        assert_eq!(p, DepthParams { m: 0, l: 0 });
        assert_eq!(p.baby_step_bound(), 1);
    }

    #[test]
    fn test_config_defaults_and_builders() {
        let cfg = EvalConfig::default();
        assert_eq!(cfg.strategy, Strategy::Fast);
        assert!((cfg.negligible_threshold - 1e-15).abs() < f64::EPSILON);

        let cfg = EvalConfig::from(Strategy::Economical).with_negligible_threshold(1e-9);
        assert_eq!(cfg.strategy, Strategy::Economical);
        assert_eq!(cfg.with_strategy(Strategy::Fast).strategy, Strategy::Fast);
        assert!((cfg.negligible_threshold - 1e-9).abs() < f64::EPSILON);
    }
}
