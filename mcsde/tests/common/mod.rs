#![allow(dead_code)]

use mcsde::instruments::{OptionData, OptionType};
use mcsde::methods::monte_carlo::{ModelData, SimulationConfig};
use tracing_subscriber::EnvFilter;

pub const SPOT: f64 = 65.0;
pub const STRIKE: f64 = 65.0;
pub const RATE: f64 = 0.08;
pub const DIVIDEND: f64 = 0.0022;
pub const VOL: f64 = 0.3;
pub const EXPIRY: f64 = 0.25;

/// Route engine logs through the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn option(option_type: OptionType) -> OptionData {
    OptionData::new(STRIKE, EXPIRY, RATE, VOL, DIVIDEND, option_type).unwrap()
}

pub fn model_data() -> ModelData {
    ModelData::from_option(&option(OptionType::Call), SPOT, 1.0)
}

pub fn config(n_paths: usize, n_steps: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .n_paths(n_paths)
        .n_steps(n_steps)
        .progress_interval(n_paths)
        .seed(seed)
        .build()
        .unwrap()
}
