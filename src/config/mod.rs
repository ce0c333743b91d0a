//! Configuration module for xdl-resolver.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Locating the default configuration file
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{default_config_path, Config, NetworkConfig, OptionsConfig};
pub use validation::validate_config;
