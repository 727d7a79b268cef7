//! # mc-instruments
//!
//! Option contract data: the payoff functional applied to a simulated
//! state, the discount factor applied to the averaged payoff, and the
//! knock-out barrier conventions used by the barrier pricers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod option;
pub mod payoff;

pub use option::{BarrierType, OptionData};
pub use payoff::{OptionType, Payoff, PlainVanillaPayoff};
