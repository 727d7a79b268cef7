//! The `Sde` trait: what every scalar model offers to the schemes.
//!
//! A model `dX = a(X,t) dt + b(X,t) dW` is described by its drift `a`, its
//! diffusion `b`, and the state derivative `∂b/∂x` needed by the
//! higher-order schemes, together with the initial condition and the
//! expiry of the simulation horizon.

use mc_core::{Real, Time};

/// A scalar stochastic differential equation.
///
/// All coefficient functions take the state first and the time second.
/// They perform no domain checks: evaluating a model outside the region
/// reported by [`in_domain`](Sde::in_domain) yields non-finite values.
pub trait Sde: std::fmt::Debug + Send + Sync {
    /// Drift `a(x, t)`.
    fn drift(&self, x: Real, t: Time) -> Real;

    /// Diffusion `b(x, t)`.
    fn diffusion(&self, x: Real, t: Time) -> Real;

    /// State derivative of the diffusion, `∂b/∂x (x, t)`.
    fn diffusion_derivative(&self, x: Real, t: Time) -> Real;

    /// Drift with a Stratonovich-type correction,
    /// `a(x,t) − B · b(x,t) · ∂b/∂x(x,t)`.
    ///
    /// Used by the corrector step of the modified and midpoint
    /// predictor-corrector schemes.
    fn drift_corrected(&self, x: Real, t: Time, b: Real) -> Real {
        self.drift(x, t) - b * self.diffusion(x, t) * self.diffusion_derivative(x, t)
    }

    /// Initial value `X(0)`.
    fn initial_condition(&self) -> Real;

    /// End of the simulation horizon.
    fn expiry(&self) -> Time;

    /// Whether `x` lies where the coefficients are defined.
    fn in_domain(&self, x: Real) -> bool {
        x.is_finite()
    }
}
