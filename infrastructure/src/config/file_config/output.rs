//! `[output]` section: how results are rendered on the terminal

use cloudops_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Ids listed in console reports before the remainder is summarized
pub const DEFAULT_MAX_LISTED_IDS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `pretty` or `json`; the `--output` flag overrides it
    pub format: Option<OutputFormat>,
    pub color: bool,
    /// 0 prints counts only
    pub max_listed_ids: usize,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            max_listed_ids: DEFAULT_MAX_LISTED_IDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;
    use super::*;

    #[test]
    fn test_partial_output_section_keeps_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.output.color);
        assert_eq!(config.output.max_listed_ids, DEFAULT_MAX_LISTED_IDS);
    }

    #[test]
    fn test_list_cap_can_be_zero() {
        let config: FileConfig = toml::from_str("[output]\nmax_listed_ids = 0\ncolor = false\n").unwrap();
        assert_eq!(config.output.max_listed_ids, 0);
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }
}
