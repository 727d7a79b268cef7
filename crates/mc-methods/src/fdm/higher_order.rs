//! Derivative-free and Runge–Kutta type schemes.

use super::{euler_step, Fdm, SchemeBase};
use mc_core::{Real, Result, Size, Time};
use mc_processes::Sde;
use std::sync::Arc;

macro_rules! simple_scheme {
    ($(#[$doc:meta])* $ty:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $ty {
            base: SchemeBase,
        }

        impl $ty {
            /// Scheme name.
            pub const NAME: &'static str = $name;

            /// Bind `sde` on a grid of `steps` intervals.
            pub fn new(sde: Arc<dyn Sde>, steps: Size) -> Result<Self> {
                Ok(Self {
                    base: SchemeBase::new(sde, steps, Self::NAME)?,
                })
            }
        }
    };
}

simple_scheme!(
    /// Platen's explicit strong order 1.0 scheme on the Stratonovich drift
    /// `a_S = a − ½·b·b'`, with supporting value `U = x + a_S·Δt + b·√Δt`.
    Platen01Fdm,
    "Platen 1.0"
);

simple_scheme!(
    /// Heun: trapezoidal average of the coefficients at `x` and at the Euler
    /// predictor, both evaluated at `t_n`. Consistent with the Stratonovich
    /// rather than the Itô interpretation.
    HeunFdm,
    "Heun"
);

simple_scheme!(
    /// Heun on the Stratonovich drift `F = a − ½·b'·b`.
    Heun2Fdm,
    "Heun2"
);

simple_scheme!(
    /// Milstein with `b·b'` replaced by a forward difference at
    /// `U = x + b·√Δt`.
    DerivativeFreeFdm,
    "Derivative-Free"
);

simple_scheme!(
    /// Runge–Kutta type scheme re-evaluating the diffusion once at
    /// `U = x + ½·b·(ΔW − √Δt)`.
    FrkiFdm,
    "FRKI"
);

impl Fdm for Platen01Fdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let s = dt.sqrt();
        let b = sde.diffusion(x, t);
        let strat = sde.drift(x, t) - 0.5 * b * sde.diffusion_derivative(x, t);
        let support = x + strat * dt + b * s;
        x + strat * dt + b * s * z + 0.5 * s * (sde.diffusion(support, t) - b) * z * z
    }

    delegate_base!();
}

impl Fdm for HeunFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let support = euler_step(sde.as_ref(), x, t, dt, z);
        x + 0.5 * (sde.drift(support, t) + sde.drift(x, t)) * dt
            + 0.5 * (sde.diffusion(support, t) + sde.diffusion(x, t)) * dt.sqrt() * z
    }

    delegate_base!();
}

impl Heun2Fdm {
    fn stratonovich_drift(sde: &dyn Sde, x: Real, t: Time) -> Real {
        sde.drift(x, t) - 0.5 * sde.diffusion_derivative(x, t) * sde.diffusion(x, t)
    }
}

impl Fdm for Heun2Fdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde().as_ref();
        let dw = dt.sqrt() * z;
        let f1 = Self::stratonovich_drift(sde, x, t);
        let g1 = sde.diffusion(x, t);
        let support = x + f1 * dt + g1 * dw;
        let f2 = Self::stratonovich_drift(sde, support, t);
        let g2 = sde.diffusion(support, t);
        x + 0.5 * (f1 + f2) * dt + 0.5 * (g1 + g2) * dw
    }

    delegate_base!();
}

impl Fdm for DerivativeFreeFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let s = dt.sqrt();
        let dw = s * z;
        let g1 = sde.diffusion(x, t);
        let g2 = sde.diffusion(x + g1 * s, t);
        x + sde.drift(x, t) * dt + g1 * dw + 0.5 * (g2 - g1) * (dw * dw - dt) / s
    }

    delegate_base!();
}

impl Fdm for FrkiFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let s = dt.sqrt();
        let dw = s * z;
        let g1 = sde.diffusion(x, t);
        let g2 = sde.diffusion(x + 0.5 * g1 * (dw - s), t);
        x + sde.drift(x, t) * dt + g2 * dw + (g2 - g1) * s
    }

    delegate_base!();
}
