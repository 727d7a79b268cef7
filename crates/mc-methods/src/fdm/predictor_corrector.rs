//! Predictor-corrector schemes.
//!
//! All four take an Euler predictor `V` and correct it by averaging the
//! coefficients at `x_n` and `V` with weight `A` for the drift and `B` for
//! the diffusion.

use super::{euler_step, Fdm, SchemeBase};
use mc_core::{ensure, Rate, Real, Result, Size, Time};
use mc_processes::Sde;
use std::sync::Arc;

fn check_weights(a: Real, b: Real) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&a) && (0.0..=1.0).contains(&b),
        "averaging weights must lie in [0, 1], got A = {a}, B = {b}"
    );
    Ok(())
}

/// Trapezoidal predictor-corrector:
///
/// ```text
/// x + [A·a(V, t+Δt) + (1−A)·a(x, t)]·Δt + [B·b(V, t+Δt) + (1−B)·b(x, t)]·√Δt·Z
/// ```
#[derive(Debug, Clone)]
pub struct PredictorCorrectorFdm {
    base: SchemeBase,
    a: Real,
    b: Real,
}

impl PredictorCorrectorFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Predictor-Corrector";

    /// Bind `sde` with drift weight `a` and diffusion weight `b`.
    pub fn new(sde: Arc<dyn Sde>, steps: Size, a: Real, b: Real) -> Result<Self> {
        check_weights(a, b)?;
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
            a,
            b,
        })
    }
}

impl Fdm for PredictorCorrectorFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let v = euler_step(sde.as_ref(), x, t, dt, z);
        let drift = self.a * sde.drift(v, t + dt) + (1.0 - self.a) * sde.drift(x, t);
        let diffusion =
            self.b * sde.diffusion(v, t + dt) + (1.0 - self.b) * sde.diffusion(x, t);
        x + drift * dt + diffusion * dt.sqrt() * z
    }

    delegate_base!();
}

/// Trapezoidal predictor-corrector on the corrected drift `a − B·b·b'`.
#[derive(Debug, Clone)]
pub struct ModifiedPredictorCorrectorFdm {
    base: SchemeBase,
    a: Real,
    b: Real,
}

impl ModifiedPredictorCorrectorFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Modified Predictor-Corrector";

    /// Bind `sde` with drift weight `a` and diffusion weight `b`.
    pub fn new(sde: Arc<dyn Sde>, steps: Size, a: Real, b: Real) -> Result<Self> {
        check_weights(a, b)?;
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
            a,
            b,
        })
    }
}

impl Fdm for ModifiedPredictorCorrectorFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde();
        let v = euler_step(sde.as_ref(), x, t, dt, z);
        let drift = self.a * sde.drift_corrected(v, t + dt, self.b)
            + (1.0 - self.a) * sde.drift_corrected(x, t, self.b);
        let diffusion =
            self.b * sde.diffusion(v, t + dt) + (1.0 - self.b) * sde.diffusion(x, t);
        x + drift * dt + diffusion * dt.sqrt() * z
    }

    delegate_base!();
}

/// Corrector step shared by the two midpoint schemes: coefficients are
/// evaluated once, at weighted states between `x` and the predictor `v` and
/// at the interval midpoint `t + Δt/2`.
fn midpoint_corrector(
    sde: &dyn Sde,
    weights: (Real, Real),
    x: Real,
    v: Real,
    t: Time,
    dt: Time,
    z: Real,
) -> Real {
    let (a, b) = weights;
    let t_mid = t + 0.5 * dt;
    let drift_state = a * v + (1.0 - a) * x;
    let diffusion_state = b * v + (1.0 - b) * x;
    x + sde.drift_corrected(drift_state, t_mid, b) * dt
        + sde.diffusion(diffusion_state, t_mid) * dt.sqrt() * z
}

/// Midpoint predictor-corrector.
#[derive(Debug, Clone)]
pub struct MidpointPredictorCorrectorFdm {
    base: SchemeBase,
    a: Real,
    b: Real,
}

impl MidpointPredictorCorrectorFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Midpoint Predictor-Corrector";

    /// Bind `sde` with drift weight `a` and diffusion weight `b`.
    pub fn new(sde: Arc<dyn Sde>, steps: Size, a: Real, b: Real) -> Result<Self> {
        check_weights(a, b)?;
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
            a,
            b,
        })
    }
}

impl Fdm for MidpointPredictorCorrectorFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde().as_ref();
        let v = euler_step(sde, x, t, dt, z);
        midpoint_corrector(sde, (self.a, self.b), x, v, t, dt, z)
    }

    delegate_base!();
}

/// Midpoint predictor-corrector whose predictor drift is the exponentially
/// fitted coefficient `(e^{r·Δt} − 1)/Δt · x`.
///
/// The fitted predictor reproduces `x·e^{r·Δt}` exactly for the drift part.
/// `r` is normally the model's net growth rate `μ − q`.
#[derive(Debug, Clone)]
pub struct FittedMidpointPredictorCorrectorFdm {
    base: SchemeBase,
    a: Real,
    b: Real,
    rate: Rate,
}

impl FittedMidpointPredictorCorrectorFdm {
    /// Scheme name.
    pub const NAME: &'static str = "Fitted Midpoint Predictor-Corrector";

    /// Bind `sde` with weights `a`, `b` and fitting rate `rate`.
    pub fn new(sde: Arc<dyn Sde>, steps: Size, a: Real, b: Real, rate: Rate) -> Result<Self> {
        check_weights(a, b)?;
        ensure!(rate.is_finite(), "fitting rate must be finite, got {rate}");
        Ok(Self {
            base: SchemeBase::new(sde, steps, Self::NAME)?,
            a,
            b,
            rate,
        })
    }

    /// The fitting rate `r`.
    pub fn rate(&self) -> Rate {
        self.rate
    }
}

impl Fdm for FittedMidpointPredictorCorrectorFdm {
    fn advance(&self, x: Real, t: Time, dt: Time, z: Real) -> Real {
        let sde = self.base.sde().as_ref();
        let fitted = (self.rate * dt).exp_m1() / dt;
        let v = x + fitted * x * dt + sde.diffusion(x, t) * dt.sqrt() * z;
        midpoint_corrector(sde, (self.a, self.b), x, v, t, dt, z)
    }

    delegate_base!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdm::test_support::{gbm, shared};
    use crate::fdm::DEFAULT_WEIGHT as W;
    use approx::assert_abs_diff_eq;

    #[test]
    fn predictor_corrector_step_by_hand() {
        // V = 101.58; drift ½(8.1264 + 8)·0.01; diffusion ½(30.474 + 30)·0.05
        let scheme = PredictorCorrectorFdm::new(shared(gbm(0.08, 0.3)), 10, W, W).unwrap();
        assert_abs_diff_eq!(scheme.advance(100.0, 0.0, 0.01, 0.5), 101.592482, epsilon = 1e-10);
    }

    #[test]
    fn midpoint_step_by_hand() {
        // M = 100.79; corrected drift 0.035·M·0.01; diffusion 0.3·M·0.05
        let scheme =
            MidpointPredictorCorrectorFdm::new(shared(gbm(0.08, 0.3)), 10, W, W).unwrap();
        assert_abs_diff_eq!(
            scheme.advance(100.0, 0.0, 0.01, 0.5),
            101.5471265,
            epsilon = 1e-10
        );
    }

    #[test]
    fn zero_weights_reduce_to_euler() {
        let sde = shared(gbm(0.08, 0.3));
        let pc = PredictorCorrectorFdm::new(Arc::clone(&sde), 10, 0.0, 0.0).unwrap();
        let euler = crate::fdm::EulerFdm::new(sde, 10).unwrap();
        assert_abs_diff_eq!(
            pc.advance(80.0, 0.1, 0.02, -0.7),
            euler.advance(80.0, 0.1, 0.02, -0.7),
            epsilon = 1e-10
        );
    }

    #[test]
    fn fitted_predictor_stays_close_to_midpoint() {
        let sde = shared(gbm(0.08, 0.3));
        let midpoint = MidpointPredictorCorrectorFdm::new(Arc::clone(&sde), 10, W, W).unwrap();
        let fitted = FittedMidpointPredictorCorrectorFdm::new(sde, 10, W, W, 0.08).unwrap();
        assert_eq!(fitted.rate(), 0.08);
        let m = midpoint.advance(100.0, 0.0, 0.01, 0.5);
        let f = fitted.advance(100.0, 0.0, 0.01, 0.5);
        assert!(f != m);
        assert!((f - m).abs() < 1e-5, "{f} vs {m}");
    }

    #[test]
    fn invalid_weights_rejected() {
        let sde = shared(gbm(0.08, 0.3));
        assert!(PredictorCorrectorFdm::new(Arc::clone(&sde), 10, 1.5, 0.5).is_err());
        assert!(MidpointPredictorCorrectorFdm::new(Arc::clone(&sde), 10, 0.5, -0.1).is_err());
        assert!(FittedMidpointPredictorCorrectorFdm::new(sde, 10, 0.5, 0.5, f64::NAN).is_err());
    }
}
