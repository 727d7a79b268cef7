//! # mc-processes
//!
//! Scalar stochastic differential equations `dX = a(X,t) dt + b(X,t) dW`
//! consumed by the discretization schemes of `mc-methods`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cev_process;
pub mod geometric_brownian_motion;
pub mod stochastic_process;

pub use cev_process::CevProcess;
pub use geometric_brownian_motion::GeometricBrownianMotion;
pub use stochastic_process::Sde;
