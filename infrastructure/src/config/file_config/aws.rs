//! AWS configuration from TOML (`[aws]` section)

use serde::{Deserialize, Serialize};

/// Region used when neither the request nor the environment names one
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAwsConfig {
    /// Fallback region (default: "us-east-1")
    pub default_region: String,
}

impl Default for FileAwsConfig {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
        }
    }
}
