//! Discretization schemes for scalar SDEs.
//!
//! Every scheme advances the state of `dX = a(X,t) dt + b(X,t) dW` by one
//! time step given a single standard normal draw `Z`:
//!
//! ```text
//! x_{n+1} = advance(x_n, t_n, Δt, Z)
//! ```
//!
//! Schemes hold no mutable state: `advance` is a pure function of its
//! arguments and the bound model. They perform no domain checks, so a state
//! outside the model's domain produces non-finite values that propagate.
//!
//! * [`EulerFdm`] — strong order 0.5
//! * [`MilsteinFdm`], [`DiscreteMilsteinFdm`] — strong order 1.0
//! * [`PredictorCorrectorFdm`] and its modified, midpoint and fitted
//!   midpoint variants
//! * [`ExactFdm`] — closed-form lognormal transition
//! * [`Platen01Fdm`], [`HeunFdm`], [`Heun2Fdm`], [`DerivativeFreeFdm`],
//!   [`FrkiFdm`] — derivative-free and Runge–Kutta type schemes

use crate::grid::TimeGrid;
use mc_core::{Real, Result, Size, Time};
use mc_processes::Sde;
use std::fmt;
use std::sync::Arc;

/// Implements the `grid`, `sde` and `name` methods of [`Fdm`] by delegating
/// to a `base: SchemeBase` field and the inherent `NAME` constant.
macro_rules! delegate_base {
    () => {
        fn grid(&self) -> &$crate::grid::TimeGrid {
            self.base.grid()
        }

        fn sde(&self) -> &std::sync::Arc<dyn mc_processes::Sde> {
            self.base.sde()
        }

        fn name(&self) -> &'static str {
            Self::NAME
        }
    };
}

mod euler;
mod exact;
mod higher_order;
mod milstein;
mod predictor_corrector;

pub use euler::EulerFdm;
pub use exact::{ExactFdm, ExactMode};
pub use higher_order::{DerivativeFreeFdm, FrkiFdm, Heun2Fdm, HeunFdm, Platen01Fdm};
pub use milstein::{DiscreteMilsteinFdm, MilsteinFdm};
pub use predictor_corrector::{
    FittedMidpointPredictorCorrectorFdm, MidpointPredictorCorrectorFdm,
    ModifiedPredictorCorrectorFdm, PredictorCorrectorFdm,
};

/// Default weight for the drift (`A`) and diffusion (`B`) averaging in the
/// predictor-corrector family.
pub const DEFAULT_WEIGHT: Real = 0.5;

/// A one-step discretization of a scalar SDE.
pub trait Fdm: fmt::Debug + Send + Sync {
    /// Advance `x` from `t` to `t + dt` using the standard normal draw `z`.
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real;

    /// The time grid the scheme was built on.
    fn grid(&self) -> &TimeGrid;

    /// The model being discretized.
    fn sde(&self) -> &Arc<dyn Sde>;

    /// Human-readable scheme name.
    fn name(&self) -> &'static str;

    /// Step size `k = T/N` of the grid.
    fn step_size(&self) -> Time {
        self.grid().dt()
    }
}

/// State shared by every scheme: the bound model and its time grid.
#[derive(Debug, Clone)]
pub struct SchemeBase {
    sde: Arc<dyn Sde>,
    grid: TimeGrid,
}

impl SchemeBase {
    /// Bind `sde` and build a grid of `steps` intervals up to its expiry.
    pub fn new(sde: Arc<dyn Sde>, steps: Size, scheme: &'static str) -> Result<Self> {
        let grid = TimeGrid::uniform(sde.expiry(), steps)?;
        tracing::debug!(scheme, steps, dt = grid.dt(), "discretization scheme constructed");
        Ok(Self { sde, grid })
    }

    /// The bound model.
    pub fn sde(&self) -> &Arc<dyn Sde> {
        &self.sde
    }

    /// The time grid.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }
}

/// Identifier of a discretization scheme, used to select one at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemeKind {
    /// Euler–Maruyama.
    #[default]
    Euler,
    /// Milstein with the analytic diffusion derivative.
    Milstein,
    /// Milstein with a finite-difference diffusion derivative.
    DiscreteMilstein,
    /// Trapezoidal predictor-corrector.
    PredictorCorrector,
    /// Predictor-corrector with a corrected drift.
    ModifiedPredictorCorrector,
    /// Predictor-corrector evaluated at the interval midpoint.
    MidpointPredictorCorrector,
    /// Midpoint predictor-corrector with an exponentially fitted predictor.
    FittedMidpointPredictorCorrector,
    /// Closed-form lognormal transition (GBM only).
    Exact,
    /// Platen explicit strong order 1.0.
    Platen01,
    /// Heun.
    Heun,
    /// Heun with a Stratonovich drift.
    Heun2,
    /// Derivative-free Milstein.
    DerivativeFree,
    /// Runge–Kutta type scheme with a single diffusion re-evaluation.
    Frki,
}

impl SchemeKind {
    /// Every scheme, in declaration order.
    pub const ALL: [SchemeKind; 13] = [
        SchemeKind::Euler,
        SchemeKind::Milstein,
        SchemeKind::DiscreteMilstein,
        SchemeKind::PredictorCorrector,
        SchemeKind::ModifiedPredictorCorrector,
        SchemeKind::MidpointPredictorCorrector,
        SchemeKind::FittedMidpointPredictorCorrector,
        SchemeKind::Exact,
        SchemeKind::Platen01,
        SchemeKind::Heun,
        SchemeKind::Heun2,
        SchemeKind::DerivativeFree,
        SchemeKind::Frki,
    ];

    /// Whether the scheme requires a geometric Brownian motion.
    pub fn requires_lognormal(self) -> bool {
        matches!(self, SchemeKind::Exact)
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemeKind::Euler => EulerFdm::NAME,
            SchemeKind::Milstein => MilsteinFdm::NAME,
            SchemeKind::DiscreteMilstein => DiscreteMilsteinFdm::NAME,
            SchemeKind::PredictorCorrector => PredictorCorrectorFdm::NAME,
            SchemeKind::ModifiedPredictorCorrector => ModifiedPredictorCorrectorFdm::NAME,
            SchemeKind::MidpointPredictorCorrector => MidpointPredictorCorrectorFdm::NAME,
            SchemeKind::FittedMidpointPredictorCorrector => {
                FittedMidpointPredictorCorrectorFdm::NAME
            }
            SchemeKind::Exact => ExactFdm::NAME,
            SchemeKind::Platen01 => Platen01Fdm::NAME,
            SchemeKind::Heun => HeunFdm::NAME,
            SchemeKind::Heun2 => Heun2Fdm::NAME,
            SchemeKind::DerivativeFree => DerivativeFreeFdm::NAME,
            SchemeKind::Frki => FrkiFdm::NAME,
        };
        f.write_str(name)
    }
}

/// One Euler–Maruyama step; the predictor of several schemes.
pub(crate) fn euler_step(sde: &dyn Sde, x: Real, t: Time, dt: Time, z: Real) -> Real {
    x + sde.drift(x, t) * dt + sde.diffusion(x, t) * dt.sqrt() * z
}
