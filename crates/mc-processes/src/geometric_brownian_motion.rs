//! Geometric Brownian motion with a continuous dividend yield.
//!
//! ```text
//! dS = (μ − q) S dt + σ S dW
//! ```
//!
//! The lognormal model behind Black–Scholes; the only model for which the
//! closed-form (exact) scheme is valid.

use crate::stochastic_process::Sde;
use mc_core::{ensure, Rate, Real, Result, Time, Volatility};

/// Geometric Brownian motion with constant drift, volatility, and dividend
/// yield.
///
/// Closed-form solution: `S(t) = S₀ exp((μ − q − σ²/2)t + σW(t))`
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricBrownianMotion {
    mu: Rate,
    sigma: Volatility,
    dividend: Rate,
    x0: Real,
    expiry: Time,
}

impl GeometricBrownianMotion {
    /// Create a new GBM model.
    ///
    /// # Arguments
    /// * `mu` — drift coefficient (growth rate)
    /// * `sigma` — volatility (must be ≥ 0)
    /// * `dividend` — continuous dividend yield
    /// * `x0` — initial value (must be > 0)
    /// * `expiry` — simulation horizon (must be > 0)
    pub fn new(mu: Rate, sigma: Volatility, dividend: Rate, x0: Real, expiry: Time) -> Result<Self> {
        ensure!(
            mu.is_finite() && dividend.is_finite(),
            "drift ({mu}) and dividend yield ({dividend}) must be finite"
        );
        ensure!(
            sigma.is_finite() && sigma >= 0.0,
            "volatility must be non-negative, got {sigma}"
        );
        ensure!(x0.is_finite() && x0 > 0.0, "initial value must be positive, got {x0}");
        ensure!(
            expiry.is_finite() && expiry > 0.0,
            "expiry must be positive, got {expiry}"
        );
        Ok(Self {
            mu,
            sigma,
            dividend,
            x0,
            expiry,
        })
    }

    /// Drift coefficient `μ`.
    pub fn rate(&self) -> Rate {
        self.mu
    }

    /// Volatility `σ`.
    pub fn volatility(&self) -> Volatility {
        self.sigma
    }

    /// Dividend yield `q`.
    pub fn dividend_yield(&self) -> Rate {
        self.dividend
    }

    /// Net growth rate `μ − q`.
    pub fn net_rate(&self) -> Rate {
        self.mu - self.dividend
    }

    /// `E[S(t)] = S₀ e^{(μ−q)t}`.
    pub fn expected_value(&self, t: Time) -> Real {
        self.x0 * (self.net_rate() * t).exp()
    }

    /// `Var[S(t)] = S₀² e^{2(μ−q)t} (e^{σ²t} − 1)`.
    pub fn variance(&self, t: Time) -> Real {
        let m = self.expected_value(t);
        m * m * ((self.sigma * self.sigma * t).exp() - 1.0)
    }
}

impl Sde for GeometricBrownianMotion {
    fn drift(&self, x: Real, _t: Time) -> Real {
        (self.mu - self.dividend) * x
    }

    fn diffusion(&self, x: Real, _t: Time) -> Real {
        self.sigma * x
    }

    fn diffusion_derivative(&self, _x: Real, _t: Time) -> Real {
        self.sigma
    }

    fn initial_condition(&self) -> Real {
        self.x0
    }

    fn expiry(&self) -> Time {
        self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gbm() -> GeometricBrownianMotion {
        GeometricBrownianMotion::new(0.08, 0.3, 0.0022, 65.0, 0.25).unwrap()
    }

    #[test]
    fn gbm_drift_proportional() {
        let p = gbm();
        assert_abs_diff_eq!(p.drift(100.0, 0.0), 7.78, epsilon = 1e-12);
        assert_abs_diff_eq!(p.drift(200.0, 0.1), 15.56, epsilon = 1e-12);
    }

    #[test]
    fn gbm_diffusion_proportional() {
        let p = gbm();
        assert_abs_diff_eq!(p.diffusion(100.0, 0.0), 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.diffusion_derivative(123.0, 0.0), 0.3, epsilon = 0.0);
    }

    #[test]
    fn gbm_drift_corrected() {
        let p = gbm();
        // (μ−q)x − B σ² x
        let expected = 0.0778 * 50.0 - 0.5 * 0.09 * 50.0;
        assert_abs_diff_eq!(p.drift_corrected(50.0, 0.0, 0.5), expected, epsilon = 1e-12);
    }

    #[test]
    fn gbm_accessors() {
        let p = gbm();
        assert_eq!(p.initial_condition(), 65.0);
        assert_eq!(p.expiry(), 0.25);
        assert_eq!(p.rate(), 0.08);
        assert_eq!(p.volatility(), 0.3);
        assert_eq!(p.dividend_yield(), 0.0022);
        assert_abs_diff_eq!(p.net_rate(), 0.0778, epsilon = 1e-15);
    }

    #[test]
    fn gbm_moments() {
        let p = gbm();
        assert_abs_diff_eq!(p.expected_value(0.0), 65.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.variance(0.0), 0.0, epsilon = 1e-12);
        let m = 65.0 * (0.0778_f64 * 0.25).exp();
        assert_abs_diff_eq!(p.expected_value(0.25), m, epsilon = 1e-12);
        assert_abs_diff_eq!(
            p.variance(0.25),
            m * m * ((0.09_f64 * 0.25).exp() - 1.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn gbm_rejects_bad_parameters() {
        assert!(GeometricBrownianMotion::new(0.08, 0.3, 0.0, 65.0, 0.0).is_err());
        assert!(GeometricBrownianMotion::new(0.08, 0.3, 0.0, 65.0, -1.0).is_err());
        assert!(GeometricBrownianMotion::new(0.08, -0.3, 0.0, 65.0, 1.0).is_err());
        assert!(GeometricBrownianMotion::new(0.08, 0.3, 0.0, 0.0, 1.0).is_err());
        assert!(GeometricBrownianMotion::new(f64::NAN, 0.3, 0.0, 65.0, 1.0).is_err());
    }
}
