use super::{Fdm, SchemeBase};
use mc_core::{Rate, Real, Result, Size, Time, Volatility};
use mc_processes::{GeometricBrownianMotion, Sde};
use std::sync::Arc;

/// How [`ExactFdm`] uses the previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExactMode {
    /// Sample `x_{n+1} | x_n` from the lognormal transition density.
    #[default]
    Conditional,
    /// Sample the marginal at `t_n + Δt` from the initial value, ignoring
    /// `x_n`. Successive points are then independent draws rather than a
    /// continuous path.
    FromOrigin,
}

/// Closed-form solution of geometric Brownian motion.
///
/// ```text
/// Conditional:  x_{n+1} = x_n · exp((μ − q − σ²/2)·Δt + σ·√Δt·Z)
/// FromOrigin:   x_{n+1} = S₀ · exp((μ − q − σ²/2)·τ + σ·√τ·Z),  τ = t_n + Δt
/// ```
///
/// Only defined for the lognormal model, which is why construction takes a
/// [`GeometricBrownianMotion`] rather than an arbitrary [`Sde`].
#[derive(Debug, Clone)]
pub struct ExactFdm {
    base: SchemeBase,
    x0: Real,
    net_rate: Rate,
    sigma: Volatility,
    mode: ExactMode,
}

impl ExactFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Exact";

    /// Bind `model` on a grid of `steps` intervals.
    pub fn new(model: &GeometricBrownianMotion, steps: Size, mode: ExactMode) -> Result<Self> {
        let sde: Arc<dyn Sde> = Arc::new(model.clone());
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
            x0: model.initial_condition(),
            net_rate: model.net_rate(),
            sigma: model.volatility(),
            mode,
        })
    }

    /// Exact transition conditioned on the previous state.
    pub fn conditional(model: &GeometricBrownianMotion, steps: Size) -> Result<Self> {
        Self::new(model, steps, ExactMode::Conditional)
    }

    /// Marginal sampled from the initial value at every step.
    pub fn from_origin(model: &GeometricBrownianMotion, steps: Size) -> Result<Self> {
        Self::new(model, steps, ExactMode::FromOrigin)
    }

    /// The sampling mode.
    pub fn mode(&self) -> ExactMode {
        self.mode
    }
}

impl Fdm for ExactFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let drift = self.net_rate - 0.5 * self.sigma * self.sigma;
        match self.mode {
            ExactMode::Conditional => x * (drift * dt + self.sigma * dt.sqrt() * z).exp(),
            ExactMode::FromOrigin => {
                let tau = t + dt;
                self.x0 * (drift * tau + self.sigma * tau.sqrt() * z).exp()
            }
        }
    }

    delegate_base!();
}
