//! Marsaglia's polar method.

use super::{MersenneTwisterUniformRng, VariateGenerator};
use mc_core::Real;

/// Standard-normal generator using the polar form of the Box–Muller
/// transform.
///
/// Two uniforms are mapped to `(u, v) ∈ (−1, 1)²` and rejected until
/// `0 < S = u² + v² ≤ 1`; the variate is `u·√(−2 ln S / S)`. The rejection
/// loop has no iteration bound: it terminates with probability one, and in
/// practice accepts about 79 % of proposals.
pub struct PolarMarsaglia {
    uniform: MersenneTwisterUniformRng,
}

impl PolarMarsaglia {
    /// Create a generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            uniform: MersenneTwisterUniformRng::new(seed),
        }
    }

    /// Create a generator seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self::new(super::entropy_seed())
    }
}

impl VariateGenerator for PolarMarsaglia {
    fn generate(&mut self) -> Real {
        loop {
            let u = 2.0 * self.uniform.next_real() - 1.0;
            let v = 2.0 * self.uniform.next_real() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s <= 1.0 {
                return u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }

    fn name(&self) -> &'static str {
        "Polar Marsaglia"
    }
}
