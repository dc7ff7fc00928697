//! Configuration file loading for cloudops
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CLOUDOPS_*` environment variables (e.g. `CLOUDOPS_AWS__DEFAULT_REGION`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./cloudops.toml` or `./.cloudops.toml`
//! 4. Global config: `$XDG_CONFIG_HOME/cloudops/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_REGION, FileAwsConfig, FileComplianceConfig, FileConfig,
    FileDispatchConfig, FileOutputConfig,
};
pub use loader::ConfigLoader;
