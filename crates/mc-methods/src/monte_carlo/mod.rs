//! Monte Carlo simulation framework.
//!
//! # Overview
//!
//! * [`McMediator`] — drives path generation and fans every finished path
//!   out to its subscribers
//! * [`PathPricer`] — trait for payoff accumulators fed by the mediator
//! * [`McBuilder`] — assembles a model, a scheme and a generator into
//!   [`SimulationParts`]
//! * [`Path`] — one realisation of the state on the scheme's time grid
//!
//! The shortest route from parameters to a price is [`mc_price`]:
//!
//! ```
//! use mc_instruments::{OptionData, OptionType};
//! use mc_methods::monte_carlo::{mc_price, EuropeanPricer, McBuilder, ModelData, SimulationConfig};
//!
//! let option = OptionData::new(65.0, 0.25, 0.08, 0.3, 0.0, OptionType::Call).unwrap();
//! let config = SimulationConfig::builder()
//!     .n_paths(2_000)
//!     .n_steps(50)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let parts = McBuilder::default_parts(ModelData::from_option(&option, 65.0, 1.0), &config).unwrap();
//! let pricer = EuropeanPricer::new(option.payoff(), option.discounter());
//! let result = mc_price(parts, &config, pricer).unwrap();
//! assert!(result.price > 2.0 && result.price < 6.0);
//! ```

mod builder;
mod config;
mod mediator;
mod pricers;

pub use builder::{McBuilder, SimulationParts};
pub use config::{
    GeneratorKind, ModelData, ModelKind, SimulationConfig, SimulationConfigBuilder,
    DEFAULT_PROGRESS_INTERVAL,
};
pub use mediator::{McMediator, Phase, RunSummary};
pub use pricers::{
    AsianPricer, BarrierPricer, BrownianBridgePricer, EuropeanPricer, PathPricer,
};

use mc_core::{ensure, Error, Price, Real, Result, Size};
use std::cell::RefCell;
use std::rc::Rc;

// ─── Path ─────────────────────────────────────────────────────────────────────

/// A single sample path: the state at every point of the time grid.
///
/// Entry 0 is the model's initial condition and entry `n` the state at
/// `t_n`; a path always holds at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    values: Vec<Real>,
}

impl Path {
    /// Wrap the values of an already simulated path.
    pub fn new(values: Vec<Real>) -> Result<Self> {
        ensure!(
            values.len() >= 2,
            "a path needs at least two points, got {}",
            values.len()
        );
        Ok(Self { values })
    }

    /// A path of `steps + 1` points all equal to `x0`.
    pub(crate) fn flat(x0: Real, steps: Size) -> Self {
        Self {
            values: vec![x0; steps + 1],
        }
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Real] {
        &mut self.values
    }

    /// All state values.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Number of time steps (= len − 1).
    pub fn steps(&self) -> Size {
        self.values.len() - 1
    }

    /// Number of points including the initial one.
    pub fn len(&self) -> Size {
        self.values.len()
    }

    /// Always `false`: a path holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The initial value.
    pub fn front(&self) -> Real {
        self.values[0]
    }

    /// The terminal value.
    pub fn back(&self) -> Real {
        self.values[self.values.len() - 1]
    }

    /// Arithmetic mean over every point, the initial one included.
    pub fn mean(&self) -> Real {
        self.values.iter().sum::<Real>() / self.values.len() as Real
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

// ─── Convenience ──────────────────────────────────────────────────────────────

/// Outcome of [`mc_price`].
#[derive(Debug, Clone, PartialEq)]
pub struct McResult {
    /// Discounted price estimate.
    pub price: Price,
    /// Discounted standard error, `None` with fewer than two paths.
    pub standard_error: Option<Real>,
    /// Run statistics reported by the mediator.
    pub summary: RunSummary,
}

/// Run one simulation feeding a single pricer and return its price.
pub fn mc_price<P>(parts: SimulationParts, config: &SimulationConfig, pricer: P) -> Result<McResult>
where
    P: PathPricer + 'static,
{
    let pricer = Rc::new(RefCell::new(pricer));
    let mut mediator = McMediator::new(parts, config)?;
    mediator.connect_pricer(&pricer);
    let summary = mediator.start()?;

    let pricer = pricer.borrow();
    let price = pricer
        .price()
        .ok_or_else(|| Error::Postcondition(format!("{} was not finalized", pricer.name())))?;
    Ok(McResult {
        price,
        standard_error: pricer.standard_error(),
        summary,
    })
}
