use super::{euler_step, Fdm, SchemeBase};
use mc_core::{Real, Result, Size, Time};
use mc_processes::Sde;
use std::sync::Arc;

/// Euler–Maruyama: `x + a·Δt + b·√Δt·Z`.
#[derive(Debug, Clone)]
pub struct EulerFdm {
    base: SchemeBase,
}

impl EulerFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Euler";

    /// Bind `sde` on a grid of `steps` intervals.
    pub fn new(sde: Arc<dyn Sde>, steps: Size) -> Result<Self> {
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
        })
    }
}

impl Fdm for EulerFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        euler_step(self.base.sde().as_ref(), x, t, dt, z)
    }

    delegate_base!();
}
