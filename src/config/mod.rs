pub mod algorithm_config;

pub use algorithm_config::{AlgorithmConfig, ConfigError, SignalParams};
