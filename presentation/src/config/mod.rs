//! Presentation-level configuration
//!
//! The resolved output settings for one run: CLI flags take precedence over
//! the `[output]` section of the config file.

use crate::output::console::DEFAULT_MAX_LISTED_IDS;
use cloudops_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Ids printed per list before the rest are summarized
    pub max_listed_ids: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            color: true,
            max_listed_ids: DEFAULT_MAX_LISTED_IDS,
        }
    }
}

impl OutputConfig {
    /// Merge the CLI flag over the configured format.
    pub fn resolve(
        flag: Option<crate::cli::commands::OutputFormat>,
        configured: Option<OutputFormat>,
    ) -> Self {
        Self {
            format: flag.map(Into::into).or(configured).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_max_listed_ids(mut self, max: usize) -> Self {
        self.max_listed_ids = max;
        self
    }

    /// Apply the color setting process-wide.
    ///
    /// JSON output is never colored.
    pub fn apply(&self) {
        if !self.color || self.format.is_json() {
            colored::control::set_override(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormat as FlagFormat;

    #[test]
    fn test_flag_wins_over_config() {
        let config = OutputConfig::resolve(Some(FlagFormat::Json), Some(OutputFormat::Pretty));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_then_default() {
        assert_eq!(
            OutputConfig::resolve(None, Some(OutputFormat::Json)).format,
            OutputFormat::Json
        );
        assert_eq!(
            OutputConfig::resolve(None, None)
                .with_color(false)
                .with_max_listed_ids(5),
            OutputConfig {
                format: OutputFormat::Pretty,
                color: false,
                max_listed_ids: 5,
            }
        );
    }
}
