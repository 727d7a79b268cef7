//! Assembly of a model, a scheme and a generator.

use super::{GeneratorKind, ModelData, ModelKind, SimulationConfig};
use crate::fdm::{
    DerivativeFreeFdm, DiscreteMilsteinFdm, EulerFdm, ExactFdm, ExactMode, Fdm,
    FittedMidpointPredictorCorrectorFdm, FrkiFdm, Heun2Fdm, HeunFdm, MidpointPredictorCorrectorFdm,
    MilsteinFdm, ModifiedPredictorCorrectorFdm, Platen01Fdm, PredictorCorrectorFdm, SchemeKind,
    DEFAULT_WEIGHT,
};
use mc_core::{Error, Real, Result};
use mc_math::VariateGenerator;
use mc_processes::{CevProcess, GeometricBrownianMotion, Sde};
use std::fmt;
use std::sync::Arc;

/// The bound parts of one simulation: model, scheme and path generator.
pub struct SimulationParts {
    /// The model. The mediator rejects parts whose scheme is bound to a
    /// model with another initial condition or expiry.
    pub sde: Arc<dyn Sde>,
    /// The scheme, bound to the same model.
    pub scheme: Box<dyn Fdm>,
    /// Source of the per-step variates.
    pub generator: Box<dyn VariateGenerator>,
}

impl SimulationParts {
    /// Bundle already constructed parts.
    pub fn new(
        sde: Arc<dyn Sde>,
        scheme: Box<dyn Fdm>,
        generator: Box<dyn VariateGenerator>,
    ) -> Self {
        Self {
            sde,
            scheme,
            generator,
        }
    }
}

impl fmt::Debug for SimulationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationParts")
            .field("sde", &self.sde)
            .field("scheme", &self.scheme.name())
            .field("generator", &self.generator.name())
            .finish()
    }
}

/// Builds [`SimulationParts`] from parameters and part identifiers.
///
/// Defaults to geometric Brownian motion, the Euler scheme and Box–Muller
/// normals. The path generator is seeded from the configuration's seed, or
/// from entropy when none is set.
///
/// # Examples
///
/// ```
/// use mc_methods::fdm::SchemeKind;
/// use mc_methods::monte_carlo::{McBuilder, ModelData, ModelKind, SimulationConfig};
///
/// let data = ModelData {
///     rate: 0.08,
///     dividend: 0.0,
///     volatility: 0.3,
///     expiry: 0.25,
///     strike: 65.0,
///     spot: 65.0,
///     beta: 0.5,
/// };
/// let config = SimulationConfig::builder().n_paths(100).n_steps(50).build().unwrap();
/// let parts = McBuilder::new(data, &config)
///     .model(ModelKind::CevCalibrated)
///     .scheme(SchemeKind::Milstein)
///     .build()
///     .unwrap();
/// assert_eq!(parts.scheme.name(), "Milstein");
/// ```
#[derive(Debug, Clone)]
pub struct McBuilder {
    data: ModelData,
    config: SimulationConfig,
    model: ModelKind,
    scheme: SchemeKind,
    generator: GeneratorKind,
    weights: (Real, Real),
    exact_mode: ExactMode,
}

impl McBuilder {
    /// Start from the defaults.
    pub fn new(data: ModelData, config: &SimulationConfig) -> Self {
        Self {
            data,
            config: config.clone(),
            model: ModelKind::default(),
            scheme: SchemeKind::default(),
            generator: GeneratorKind::default(),
            weights: (DEFAULT_WEIGHT, DEFAULT_WEIGHT),
            exact_mode: ExactMode::default(),
        }
    }

    /// GBM, Euler and Box–Muller.
    pub fn default_parts(data: ModelData, config: &SimulationConfig) -> Result<SimulationParts> {
        Self::new(data, config).build()
    }

    /// Select the model.
    pub fn model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Select the scheme.
    pub fn scheme(mut self, scheme: SchemeKind) -> Self {
        self.scheme = scheme;
        self
    }

    /// Select the path generator.
    pub fn generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    /// Drift and diffusion weights of the predictor-corrector schemes.
    pub fn weights(mut self, a: Real, b: Real) -> Self {
        self.weights = (a, b);
        self
    }

    /// Sampling mode of the exact scheme.
    pub fn exact_mode(mut self, mode: ExactMode) -> Self {
        self.exact_mode = mode;
        self
    }

    /// Construct the parts.
    ///
    /// # Errors
    ///
    /// `Error::Precondition` for invalid parameters or counts, and
    /// `Error::InvalidArgument` when the exact scheme is paired with a model
    /// other than geometric Brownian motion.
    pub fn build(self) -> Result<SimulationParts> {
        self.config.validate()?;
        self.data.validate()?;
        let d = &self.data;
        let steps = self.config.n_steps();

        let mut gbm = None;
        let sde: Arc<dyn Sde> = match self.model {
            ModelKind::Gbm => {
                let model =
                    GeometricBrownianMotion::new(d.rate, d.volatility, d.dividend, d.spot, d.expiry)?;
                gbm = Some(model.clone());
                Arc::new(model)
            }
            ModelKind::Cev => Arc::new(CevProcess::new(
                d.rate, d.volatility, d.dividend, d.spot, d.expiry, d.beta,
            )?),
            ModelKind::CevCalibrated => Arc::new(CevProcess::calibrated(
                d.rate, d.volatility, d.dividend, d.spot, d.expiry, d.beta,
            )?),
        };

        let (a, b) = self.weights;
        let shared = Arc::clone(&sde);
        let scheme: Box<dyn Fdm> = match self.scheme {
            SchemeKind::Euler => Box::new(EulerFdm::new(shared, steps)?),
            SchemeKind::Milstein => Box::new(MilsteinFdm::new(shared, steps)?),
            SchemeKind::DiscreteMilstein => Box::new(DiscreteMilsteinFdm::new(shared, steps)?),
            SchemeKind::PredictorCorrector => {
                Box::new(PredictorCorrectorFdm::new(shared, steps, a, b)?)
            }
            SchemeKind::ModifiedPredictorCorrector => {
                Box::new(ModifiedPredictorCorrectorFdm::new(shared, steps, a, b)?)
            }
            SchemeKind::MidpointPredictorCorrector => {
                Box::new(MidpointPredictorCorrectorFdm::new(shared, steps, a, b)?)
            }
            SchemeKind::FittedMidpointPredictorCorrector => Box::new(
                FittedMidpointPredictorCorrectorFdm::new(shared, steps, a, b, d.net_rate())?,
            ),
            SchemeKind::Exact => {
                let gbm = gbm.ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "the exact scheme needs geometric Brownian motion, not {}",
                        self.model
                    ))
                })?;
                Box::new(ExactFdm::new(&gbm, steps, self.exact_mode)?)
            }
            SchemeKind::Platen01 => Box::new(Platen01Fdm::new(shared, steps)?),
            SchemeKind::Heun => Box::new(HeunFdm::new(shared, steps)?),
            SchemeKind::Heun2 => Box::new(Heun2Fdm::new(shared, steps)?),
            SchemeKind::DerivativeFree => Box::new(DerivativeFreeFdm::new(shared, steps)?),
            SchemeKind::Frki => Box::new(FrkiFdm::new(shared, steps)?),
        };

        let generator = self.generator.create(self.config.seed());
        tracing::debug!(
            model = %self.model,
            scheme = %self.scheme,
            generator = generator.name(),
            seeded = self.config.seed().is_some(),
            "simulation parts built"
        );

        Ok(SimulationParts {
            sde,
            scheme,
            generator,
        })
    }
}
