use super::{Fdm, SchemeBase};
use mc_core::{Real, Result, Size, Time};
use mc_processes::Sde;
use std::sync::Arc;

/// Milstein: Euler plus `½·Δt·b·b'·(Z² − 1)`.
#[derive(Debug, Clone)]
pub struct MilsteinFdm {
    base: SchemeBase,
}

impl MilsteinFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Milstein";

    /// Bind `sde` on a grid of `steps` intervals.
    pub fn new(sde: Arc<dyn Sde>, steps: Size) -> Result<Self> {
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
        })
    }
}

impl Fdm for MilsteinFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let b = sde.diffusion(x, t);
        x + sde.drift(x, t) * dt
            + b * dt.sqrt() * z
            + 0.5 * dt * b * sde.diffusion_derivative(x, t) * (z * z - 1.0)
    }

    delegate_base!();
}

/// Milstein with `b·b'` replaced by a forward difference of `b` at the
/// supporting value `Y = x + a·Δt + b·√Δt`.
#[derive(Debug, Clone)]
pub struct DiscreteMilsteinFdm {
    base: SchemeBase,
}

impl DiscreteMilsteinFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Discrete Milstein";

    /// Bind `sde` on a grid of `steps` intervals.
    pub fn new(sde: Arc<dyn Sde>, steps: Size) -> Result<Self> {
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
        })
    }
}

impl Fdm for DiscreteMilsteinFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let s = dt.sqrt();
        let a = sde.drift(x, t);
        let b = sde.diffusion(x, t);
        let y = x + a * dt + b * s;
        x + a * dt + b * s * z + 0.5 * s * (sde.diffusion(y, t) - b) * (z * z - 1.0)
    }

    delegate_base!();
}
