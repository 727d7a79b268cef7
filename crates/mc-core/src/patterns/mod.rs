//! Patterns sub-module: signal/slot event fan-out.

pub mod signal;
