//! Output formatter trait

use super::{ConsoleFormatter, JsonFormatter};
use crate::config::OutputConfig;
use cloudops_domain::{
    BatchResult, ComplianceResult, OutputFormat, ResponseEnvelope, ToolDescriptor,
};

/// Trait for rendering command results
pub trait OutputFormatter {
    /// Format the envelope of a single dispatch
    fn format_envelope(&self, envelope: &ResponseEnvelope) -> String;

    /// Format a catalog listing (already filtered and sorted)
    fn format_tools(&self, tools: &[&ToolDescriptor]) -> String;

    /// Format a compliance scan for `tag`
    fn format_compliance(&self, tag: &str, result: &ComplianceResult) -> String;

    /// Format the aggregate of a remediation
    fn format_batch(&self, label: &str, result: &BatchResult) -> String;
}

/// Formatter for the resolved output settings
pub fn formatter_for(config: &OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Pretty => {
            Box::new(ConsoleFormatter::new().with_max_listed_ids(config.max_listed_ids))
        }
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
