//! # mc-methods
//!
//! Numerical methods for the Monte Carlo SDE engine: one-step
//! discretization schemes and the path-generation framework that feeds
//! payoff accumulators.
//!
//! # Modules
//!
//! * [`grid`] — uniform time grid shared by schemes and the mediator
//! * [`fdm`] — Euler, Milstein, predictor-corrector, exact and
//!   Runge–Kutta type schemes behind the [`Fdm`] trait
//! * [`monte_carlo`] — paths, pricers, mediator, configuration and builder

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Uniform time grid.
pub mod grid;

/// Discretization schemes.
pub mod fdm;

/// Monte Carlo simulation: paths, pricers, mediator.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use fdm::{Fdm, SchemeKind};
pub use grid::TimeGrid;
pub use monte_carlo::{
    mc_price, AsianPricer, BarrierPricer, BrownianBridgePricer, EuropeanPricer, GeneratorKind,
    McBuilder, McMediator, McResult, ModelData, ModelKind, Path, PathPricer, RunSummary,
    SimulationConfig, SimulationParts,
};
