//! # mc-pricingengines
//!
//! Closed-form prices used to check what the simulation produces.
//!
//! ## Engines
//!
//! - [`black_scholes_merton`] — European call or put under geometric Brownian motion
//! - [`analytic_knock_out_price`] — continuously monitored single knock-out barrier
//!   (Reiner–Rubinstein)

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_barrier_engine;
pub mod analytic_european_engine;

pub use analytic_barrier_engine::analytic_knock_out_price;
pub use analytic_european_engine::black_scholes_merton;
