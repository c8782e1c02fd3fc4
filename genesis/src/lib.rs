pub use config::{
    ConfigurationError, DEFAULT_BASE_FEE_DENOMINATOR, DEFAULT_GAS_TARGET,
    DEFAULT_LOWER_BOUND_BASE_FEE, DEFAULT_MAX_BLOCK_GAS_USED_FOR_BASE_FEE,
    DEFAULT_UPPER_BOUND_BASE_FEE, Kip71Config, Kip71Parameters,
};

pub mod config;
