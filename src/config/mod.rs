pub mod toml_config;

pub use toml_config::{LoggingConfig, PlanDefaults, PlannerConfig};
