//! # mcsde
//!
//! Monte Carlo pricing of European, Asian and knock-out options under
//! one-factor SDEs, with a choice of thirteen discretization schemes.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `mc-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use mcsde::instruments::{OptionData, OptionType};
//! use mcsde::methods::monte_carlo::{
//!     mc_price, EuropeanPricer, McBuilder, ModelData, SimulationConfig,
//! };
//! use mcsde::methods::SchemeKind;
//!
//! let option = OptionData::new(65.0, 0.25, 0.08, 0.3, 0.0, OptionType::Put).unwrap();
//! let config = SimulationConfig::builder()
//!     .n_paths(5_000)
//!     .n_steps(25)
//!     .seed(11)
//!     .build()
//!     .unwrap();
//! let parts = McBuilder::new(ModelData::from_option(&option, 65.0, 1.0), &config)
//!     .scheme(SchemeKind::Milstein)
//!     .build()
//!     .unwrap();
//! let pricer = EuropeanPricer::new(option.payoff(), option.discounter());
//! let result = mc_price(parts, &config, pricer).unwrap();
//! assert!(result.price > 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, the error type and the signal primitive.
pub use mc_core as core;

/// Normal distribution, variate generators and running statistics.
pub use mc_math as math;

/// The SDE trait and the GBM and CEV models.
pub use mc_processes as processes;

/// Option data, payoffs and barrier conventions.
pub use mc_instruments as instruments;

/// Discretization schemes and the Monte Carlo framework.
pub use mc_methods as methods;

/// Closed-form benchmark prices.
pub use mc_pricingengines as pricingengines;

pub use mc_core::{Error, Result};
pub use mc_methods::monte_carlo::{mc_price, McBuilder, McMediator, SimulationConfig};
