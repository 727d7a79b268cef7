//! # mc-math
//!
//! Mathematical utilities: variate generators (backed by `rand_mt`),
//! normal distribution functions, and statistics accumulators.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Random variate generators.
pub mod random_numbers;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf};
pub use random_numbers::{BoxMuller, MersenneTwisterUniformRng, PolarMarsaglia, VariateGenerator};
pub use statistics::Statistics;
