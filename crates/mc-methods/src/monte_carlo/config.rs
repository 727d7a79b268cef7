//! Simulation configuration and model parameter bundles.

use mc_core::{ensure, Error, Rate, Real, Result, Size, Time, Volatility};
use mc_instruments::OptionData;
use mc_math::{BoxMuller, MersenneTwisterUniformRng, PolarMarsaglia, VariateGenerator};
use std::fmt;

/// Paths between two progress notifications unless configured otherwise.
pub const DEFAULT_PROGRESS_INTERVAL: Size = 100;

/// Parameters of one Monte Carlo run.
///
/// Use [`SimulationConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use mc_methods::monte_carlo::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_paths(100_000)
///     .n_steps(100)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.n_paths(), 100_000);
/// assert_eq!(config.progress_interval(), 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    n_paths: Size,
    n_steps: Size,
    progress_interval: Size,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of simulated paths `M`.
    #[inline]
    pub fn n_paths(&self) -> Size {
        self.n_paths
    }

    /// Number of time steps `N` per path.
    #[inline]
    pub fn n_steps(&self) -> Size {
        self.n_steps
    }

    /// Paths between two progress notifications.
    #[inline]
    pub fn progress_interval(&self) -> Size {
        self.progress_interval
    }

    /// Seed of the path generator, `None` for an entropy seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Checks that every count is positive.
    ///
    /// Deserialized configurations bypass the builder, so the mediator calls
    /// this again before a run.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_paths > 0, "number of paths must be positive");
        ensure!(self.n_steps > 0, "number of time steps must be positive");
        ensure!(
            self.progress_interval > 0,
            "progress interval must be positive"
        );
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_paths: Option<Size>,
    n_steps: Option<Size>,
    progress_interval: Option<Size>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: Size) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn n_steps(mut self, n_steps: Size) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the number of paths between progress notifications.
    #[inline]
    pub fn progress_interval(mut self, interval: Size) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Sets the seed for reproducible runs.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// `Error::Precondition` if the path or step count is missing or zero, or
    /// the progress interval is zero.
    pub fn build(self) -> Result<SimulationConfig> {
        let (Some(n_paths), Some(n_steps)) = (self.n_paths, self.n_steps) else {
            return Err(Error::Precondition(
                "both the path count and the step count must be set".into(),
            ));
        };
        let config = SimulationConfig {
            n_paths,
            n_steps,
            progress_interval: self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parameters from which the builder constructs a model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelData {
    /// Drift rate `μ`.
    pub rate: Rate,
    /// Continuous dividend yield `q`.
    pub dividend: Rate,
    /// Volatility `σ`.
    pub volatility: Volatility,
    /// Simulation horizon `T`.
    pub expiry: Time,
    /// Strike of the priced option, carried for reporting.
    pub strike: Real,
    /// Initial value `S₀`.
    pub spot: Real,
    /// CEV elasticity `β`; ignored by geometric Brownian motion.
    pub beta: Real,
}

impl ModelData {
    /// Model parameters matching an option's terms, started at `spot`.
    pub fn from_option(option: &OptionData, spot: Real, beta: Real) -> Self {
        Self {
            rate: option.rate,
            dividend: option.dividend,
            volatility: option.volatility,
            expiry: option.expiry,
            strike: option.strike,
            spot,
            beta,
        }
    }

    /// Net growth rate `μ − q`.
    pub fn net_rate(&self) -> Rate {
        self.rate - self.dividend
    }

    /// Checks the parameters that the models do not.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.strike.is_finite() && self.strike >= 0.0,
            "strike must be non-negative, got {}",
            self.strike
        );
        Ok(())
    }
}

/// Which model the builder constructs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    /// Geometric Brownian motion.
    #[default]
    Gbm,
    /// CEV with diffusion `σ·x^β`.
    Cev,
    /// CEV whose local volatility at the spot equals `σ`.
    CevCalibrated,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelKind::Gbm => "GBM",
            ModelKind::Cev => "CEV",
            ModelKind::CevCalibrated => "CEV (calibrated)",
        })
    }
}

/// Which variate generator drives the paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeneratorKind {
    /// Polar Marsaglia normals.
    PolarMarsaglia,
    /// Box–Muller normals.
    #[default]
    BoxMuller,
    /// Uniform deviates in `[0, 1)`.
    MersenneTwister,
}

impl GeneratorKind {
    /// Create a generator, seeded when `seed` is given.
    pub fn create(self, seed: Option<u64>) -> Box<dyn VariateGenerator> {
        match (self, seed) {
            (GeneratorKind::PolarMarsaglia, Some(s)) => Box::new(PolarMarsaglia::new(s)),
            (GeneratorKind::PolarMarsaglia, None) => Box::new(PolarMarsaglia::from_entropy()),
            (GeneratorKind::BoxMuller, Some(s)) => Box::new(BoxMuller::new(s)),
            (GeneratorKind::BoxMuller, None) => Box::new(BoxMuller::from_entropy()),
            (GeneratorKind::MersenneTwister, Some(s)) => {
                Box::new(MersenneTwisterUniformRng::new(s))
            }
            (GeneratorKind::MersenneTwister, None) => {
                Box::new(MersenneTwisterUniformRng::from_entropy())
            }
        }
    }
}
