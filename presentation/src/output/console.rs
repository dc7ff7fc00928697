//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use cloudops_domain::{
    BatchResult, ComplianceResult, ErrorKind, ResponseEnvelope, RiskLevel, ToolDescriptor,
};

/// Ids listed before the rest are summarized, unless configured otherwise
pub const DEFAULT_MAX_LISTED_IDS: usize = 50;

/// Formats results for console display
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    max_listed_ids: usize,
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self {
            max_listed_ids: DEFAULT_MAX_LISTED_IDS,
        }
    }

    /// Cap on ids printed per list (0 prints counts only)
    pub fn with_max_listed_ids(mut self, max: usize) -> Self {
        self.max_listed_ids = max;
        self
    }

    /// Format a dispatch envelope
    pub fn format_envelope(envelope: &ResponseEnvelope) -> String {
        match envelope {
            ResponseEnvelope::Success { data } => {
                let body = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
                format!("{}\n{}\n", "v success".green().bold(), body)
            }
            ResponseEnvelope::Failure {
                error_kind,
                message,
                code,
                partial,
            } => {
                let mut output = format!(
                    "{} {}\n  {}\n",
                    "x".red().bold(),
                    Self::kind_label(*error_kind),
                    message
                );
                if let Some(code) = code {
                    output.push_str(&format!("  {} {}\n", "code:".dimmed(), code));
                }
                if let Some(items) = partial {
                    output.push_str(&format!("\n{}\n", "Per-item outcome:".cyan().bold()));
                    for item in items {
                        let mark = if item.succeeded { "v".green() } else { "x".red() };
                        match &item.error {
                            Some(err) => output.push_str(&format!("  {} {} ({})\n", mark, item.id, err)),
                            None => output.push_str(&format!("  {} {}\n", mark, item.id)),
                        }
                    }
                }
                output
            }
        }
    }

    /// Format the tool catalog, grouped by domain
    pub fn format_tools(tools: &[&ToolDescriptor]) -> String {
        if tools.is_empty() {
            return format!("{}\n", "No tools match.".dimmed());
        }

        let mut output = Self::header("Tool Catalog");
        output.push('\n');

        let mut current_domain: Option<&str> = None;
        for tool in tools {
            if current_domain != Some(tool.domain()) {
                current_domain = Some(tool.domain());
                output.push_str(&Self::section_header(tool.domain()));
            }
            let def = tool.definition();
            let risk = match def.risk_level {
                RiskLevel::Low => def.risk_level.as_str().green(),
                RiskLevel::High => def.risk_level.as_str().red(),
            };
            output.push_str(&format!(
                "  {:<28} {:<5} {}\n",
                def.name.bold(),
                risk,
                def.description
            ));

            let required: Vec<&str> = def
                .schema
                .required_fields()
                .map(|f| f.name.as_str())
                .collect();
            if !required.is_empty() {
                output.push_str(&format!(
                    "  {:<28} {} {}\n",
                    "",
                    "requires:".dimmed(),
                    required.join(", ")
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a compliance scan result
    pub fn format_compliance(&self, tag: &str, result: &ComplianceResult) -> String {
        let mut output = Self::header("Compliance Scan");
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Required tag:".cyan().bold(), tag));
        output.push_str(&format!(
            "{} {} scanned, {} matching\n",
            "Inventory:".cyan().bold(),
            result.scanned_total,
            result.matching_total
        ));

        if result.truncated {
            output.push_str(&format!(
                "{}\n",
                "! A pass hit its item cap; the result may be incomplete."
                    .yellow()
                    .bold()
            ));
        }

        if result.is_compliant() {
            output.push_str(&format!("\n{}\n", "All resources are compliant.".green().bold()));
        } else {
            output.push_str(&Self::section_header(&format!(
                "Non-conforming ({})",
                result.non_conforming_count()
            )));
            output.push_str(&self.id_list(&result.sorted_ids()));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format a remediation result
    pub fn format_batch(&self, label: &str, result: &BatchResult) -> String {
        let mut output = Self::header(&format!("Remediation: {}", label));
        output.push('\n');

        output.push_str(&format!(
            "{} {} succeeded, {} failed ({} chunk(s))\n",
            "Items:".cyan().bold(),
            result.items_succeeded.to_string().green(),
            if result.items_failed > 0 {
                result.items_failed.to_string().red()
            } else {
                result.items_failed.to_string().normal()
            },
            result.outcomes.len()
        ));

        let failed: Vec<_> = result.failed_chunks().collect();
        if !failed.is_empty() {
            output.push_str(&Self::section_header("Failed chunks"));
            for chunk in failed {
                let reason = chunk
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown error".to_string());
                output.push_str(&format!(
                    "\n{} {}\n",
                    format!("── chunk {} ──", chunk.index).red().bold(),
                    reason
                ));
                output.push_str(&self.id_list(&chunk.ids));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn kind_label(kind: ErrorKind) -> colored::ColoredString {
        if kind.is_caller_error() {
            kind.as_str().yellow().bold()
        } else {
            kind.as_str().red().bold()
        }
    }

    fn id_list(&self, ids: &[String]) -> String {
        let mut output = String::new();
        for id in ids.iter().take(self.max_listed_ids) {
            output.push_str(&format!("  * {}\n", id));
        }
        if ids.len() > self.max_listed_ids {
            output.push_str(&format!(
                "  {}\n",
                format!("... and {} more", ids.len() - self.max_listed_ids).dimmed()
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_envelope(&self, envelope: &ResponseEnvelope) -> String {
        Self::format_envelope(envelope)
    }

    fn format_tools(&self, tools: &[&ToolDescriptor]) -> String {
        Self::format_tools(tools)
    }

    fn format_compliance(&self, tag: &str, result: &ComplianceResult) -> String {
        ConsoleFormatter::format_compliance(self, tag, result)
    }

    fn format_batch(&self, label: &str, result: &BatchResult) -> String {
        ConsoleFormatter::format_batch(self, label, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudops_domain::{ChunkOutcome, ErrorInfo, InventorySnapshot, ItemOutcome};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_failure_envelope_shows_code_and_partial() {
        plain();
        let envelope = ResponseEnvelope::Failure {
            error_kind: ErrorKind::PartialBatchFailure,
            message: "1 of 2 chunks failed".to_string(),
            code: Some("InvalidID".to_string()),
            partial: Some(vec![
                ItemOutcome {
                    id: "i-1".to_string(),
                    succeeded: true,
                    error: None,
                },
                ItemOutcome {
                    id: "i-2".to_string(),
                    succeeded: false,
                    error: Some("bad id".to_string()),
                },
            ]),
        };

        let out = ConsoleFormatter::format_envelope(&envelope);

        assert!(out.contains("PartialBatchFailure"));
        assert!(out.contains("code: InvalidID"));
        assert!(out.contains("x i-2 (bad id)"));
    }

    #[test]
    fn test_compliance_lists_ids_and_warns_on_truncation() {
        plain();
        let mut all = InventorySnapshot::with_capacity_limit(2);
        all.offer("i-1");
        all.offer("i-2");
        all.offer("i-3");
        let matching = InventorySnapshot::with_capacity_limit(10);

        let out = ConsoleFormatter::new()
            .format_compliance("Environment", &ComplianceResult::diff(&all, &matching));

        assert!(out.contains("Non-conforming (2)"));
        assert!(out.contains("* i-1"));
        assert!(out.contains("item cap"));
    }

    #[test]
    fn test_long_id_lists_are_summarized() {
        let ids: Vec<String> = (0..60).map(|i| format!("i-{}", i)).collect();
        let out = ConsoleFormatter::new().id_list(&ids);
        assert!(out.contains("and 10 more"));
        assert!(!out.contains("i-55"));
    }

    #[test]
    fn test_zero_cap_prints_count_only() {
        plain();
        let ids: Vec<String> = (0..3).map(|i| format!("i-{}", i)).collect();
        let out = ConsoleFormatter::new().with_max_listed_ids(0).id_list(&ids);
        assert!(!out.contains("* i-0"));
        assert!(out.contains("and 3 more"));
    }

    #[test]
    fn test_batch_shows_failed_chunk() {
        plain();
        let result = BatchResult::from_outcomes(vec![
            ChunkOutcome::success(0, vec!["i-1".to_string()]),
            ChunkOutcome::failure(
                1,
                vec!["i-2".to_string()],
                ErrorInfo::new(ErrorKind::RemoteCallError, "throttled"),
            ),
        ]);

        let out = ConsoleFormatter::new().format_batch("ec2_create_tags", &result);

        assert!(out.contains("chunk 1"));
        assert!(out.contains("throttled"));
        assert!(out.contains("* i-2"));
    }
}
