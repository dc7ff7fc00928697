//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod aws;
mod compliance;
mod dispatch;
mod output;

pub use aws::{DEFAULT_REGION, FileAwsConfig};
pub use compliance::FileComplianceConfig;
pub use dispatch::FileDispatchConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("aws.default_region cannot be empty")]
    EmptyRegion,

    #[error("compliance.required_tag cannot be empty")]
    EmptyRequiredTag,

    #[error("compliance.max_items cannot be 0")]
    ZeroMaxItems,

    #[error("compliance.chunk_size cannot be 0")]
    ZeroChunkSize,

    #[error("compliance.concurrency cannot be 0")]
    ZeroConcurrency,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Credentials fallback settings
    pub aws: FileAwsConfig,
    /// Dispatch settings
    pub dispatch: FileDispatchConfig,
    /// Compliance scan and remediation settings
    pub compliance: FileComplianceConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.aws.default_region.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyRegion);
        }
        if self.compliance.required_tag.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyRequiredTag);
        }
        if self.compliance.max_items == 0 {
            issues.push(ConfigValidationError::ZeroMaxItems);
        }
        if self.compliance.chunk_size == 0 {
            issues.push(ConfigValidationError::ZeroChunkSize);
        }
        if self.compliance.concurrency == 0 {
            issues.push(ConfigValidationError::ZeroConcurrency);
        }

        issues
    }

    /// Reset every field named by `issues` to its default.
    pub fn with_defaults_for(mut self, issues: &[ConfigValidationError]) -> Self {
        let defaults = FileConfig::default();
        for issue in issues {
            match issue {
                ConfigValidationError::EmptyRegion => {
                    self.aws.default_region = defaults.aws.default_region.clone();
                }
                ConfigValidationError::EmptyRequiredTag => {
                    self.compliance.required_tag = defaults.compliance.required_tag.clone();
                }
                ConfigValidationError::ZeroMaxItems => {
                    self.compliance.max_items = defaults.compliance.max_items;
                }
                ConfigValidationError::ZeroChunkSize => {
                    self.compliance.chunk_size = defaults.compliance.chunk_size;
                }
                ConfigValidationError::ZeroConcurrency => {
                    self.compliance.concurrency = defaults.compliance.concurrency;
                }
            }
        }
        self
    }
}
