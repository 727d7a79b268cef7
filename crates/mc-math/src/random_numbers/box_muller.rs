//! Box–Muller transform.

use super::{MersenneTwisterUniformRng, VariateGenerator};
use mc_core::Real;
use std::f64::consts::PI;

/// Standard-normal generator using the basic Box–Muller transform.
///
/// Draws `U1, U2 ~ U[0,1)` and returns `√(−2 ln U1)·cos(2π U2)`. Draws with
/// `U1 = 0` are discarded so the logarithm stays finite. The sine companion
/// variate is not cached: each call consumes a fresh pair of uniforms.
pub struct BoxMuller {
    uniform: MersenneTwisterUniformRng,
}

impl BoxMuller {
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

impl VariateGenerator for BoxMuller {
    fn generate(&mut self) -> Real {
        let (u1, u2) = loop {
            let u1 = self.uniform.next_real();
            let u2 = self.uniform.next_real();
            if u1 > 0.0 {
                break (u1, u2);
            }
        };
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn name(&self) -> &'static str {
        "Box-Muller"
    }
}
