//! JSON output formatter

use super::formatter::OutputFormatter;
use cloudops_domain::{BatchResult, ComplianceResult, ResponseEnvelope, ToolDescriptor};
use serde::Serialize;
use serde_json::json;

/// Formats results as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_envelope(&self, envelope: &ResponseEnvelope) -> String {
        Self::render(envelope)
    }

    fn format_tools(&self, tools: &[&ToolDescriptor]) -> String {
        let definitions: Vec<_> = tools.iter().map(|t| t.definition()).collect();
        Self::render(&definitions)
    }

    fn format_compliance(&self, tag: &str, result: &ComplianceResult) -> String {
        Self::render(&json!({ "required_tag": tag, "result": result }))
    }

    fn format_batch(&self, label: &str, result: &BatchResult) -> String {
        Self::render(&json!({
            "operation": label,
            "result": result,
            "envelope": result.to_envelope(),
        }))
    }
}
