//! Presentation layer for cloudops
//!
//! This crate contains CLI definitions, output formatters and progress
//! reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    CallArgs, Cli, Command, ComplianceCommand, OutputFormat, RemediateArgs, RemediationAction,
    ScanArgs, ToolsArgs,
};
pub use config::OutputConfig;
pub use output::{ConsoleFormatter, JsonFormatter, OutputFormatter, formatter_for};
pub use progress::{ScanProgressReporter, SimpleScanProgress};
