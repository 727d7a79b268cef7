//! Constant elasticity of variance (CEV) process.
//!
//! ```text
//! dS = (μ − q) S dt + σ S^β dW
//! ```
//!
//! `β < 1` produces the downward-sloping volatility skew seen in equity
//! markets; `β = 1` is geometric Brownian motion.

use crate::stochastic_process::Sde;
use mc_core::{ensure, Rate, Real, Result, Time, Volatility};

/// CEV model with constant coefficients.
///
/// The diffusion is `σ·x^β`. For `β < 1` the coefficients are singular at
/// zero and undefined for negative states; schemes do not guard against
/// that, so paths that leave `x > 0` turn non-finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CevProcess {
    mu: Rate,
    sigma: Volatility,
    dividend: Rate,
    x0: Real,
    expiry: Time,
    beta: Real,
}

impl CevProcess {
    /// Create a CEV model whose diffusion is exactly `sigma · x^beta`.
    pub fn new(
        mu: Rate,
        sigma: Volatility,
        dividend: Rate,
        x0: Real,
        expiry: Time,
        beta: Real,
    ) -> Result<Self> {
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
        ensure!(beta.is_finite(), "elasticity must be finite, got {beta}");
        Ok(Self {
            mu,
            sigma,
            dividend,
            x0,
            expiry,
            beta,
        })
    }

    /// Create a CEV model whose local volatility at the initial value equals
    /// `sigma`.
    ///
    /// The diffusion coefficient becomes `sigma · x0^(1−β)`, so
    /// `b(x0)/x0 = sigma` and the model is comparable to a GBM quoted with
    /// the same volatility.
    pub fn calibrated(
        mu: Rate,
        sigma: Volatility,
        dividend: Rate,
        x0: Real,
        expiry: Time,
        beta: Real,
    ) -> Result<Self> {
        let mut model = Self::new(mu, sigma, dividend, x0, expiry, beta)?;
        model.sigma = sigma * x0.powf(1.0 - beta);
        Ok(model)
    }

    /// Elasticity exponent `β`.
    pub fn beta(&self) -> Real {
        self.beta
    }

    /// Diffusion coefficient `σ` in `σ·x^β`.
    pub fn volatility(&self) -> Volatility {
        self.sigma
    }

    /// Drift coefficient `μ`.
    pub fn rate(&self) -> Rate {
        self.mu
    }

    /// Dividend yield `q`.
    pub fn dividend_yield(&self) -> Rate {
        self.dividend
    }
}

impl Sde for CevProcess {
    fn drift(&self, x: Real, _t: Time) -> Real {
        (self.mu - self.dividend) * x
    }

    fn diffusion(&self, x: Real, _t: Time) -> Real {
        self.sigma * x.powf(self.beta)
    }

    fn diffusion_derivative(&self, x: Real, _t: Time) -> Real {
        // Keep the exponent positive so x = 0 is only singular for β < 1.
        if self.beta > 1.0 {
            self.sigma * self.beta * x.powf(self.beta - 1.0)
        } else {
            self.sigma * self.beta / x.powf(1.0 - self.beta)
        }
    }

    fn initial_condition(&self) -> Real {
        self.x0
    }

    fn expiry(&self) -> Time {
        self.expiry
    }

    fn in_domain(&self, x: Real) -> bool {
        if !x.is_finite() {
            false
        } else if self.beta < 1.0 {
            x > 0.0
        } else if self.beta.fract() == 0.0 {
            true
        } else {
            x >= 0.0
        }
    }
}
