//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable output
    Pretty,
    /// Machine-readable JSON
    Json,
}

impl From<OutputFormat> for cloudops_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => cloudops_domain::OutputFormat::Pretty,
            OutputFormat::Json => cloudops_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for cloudops
#[derive(Parser, Debug)]
#[command(name = "cloudops")]
#[command(author, version, about = "Schema-validated tool dispatch and tag compliance for cloud APIs")]
#[command(long_about = r#"
cloudops exposes cloud control-plane operations as a catalog of named tools.
Every call is validated against the tool's schema before anything is sent,
and every result comes back as a uniform success/failure envelope.

Credentials come from AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY /
AWS_SESSION_TOKEN, the region from --region, AWS_DEFAULT_REGION or the
[aws] section of the config file.

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./cloudops.toml        Project-level config
3. ~/.config/cloudops/config.toml   Global config

Example:
  cloudops tools --domain compute
  cloudops call ec2_list_instances --params '{"state": "running"}'
  cloudops compliance scan --tag Environment
  cloudops compliance remediate --tag Environment --tag-value unassigned --dry-run
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to [output].format, then pretty)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tool catalog
    Tools(ToolsArgs),

    /// Dispatch one tool and print its envelope
    Call(CallArgs),

    /// Find (and fix) resources missing a required tag
    #[command(subcommand)]
    Compliance(ComplianceCommand),
}

#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Only tools of this domain (e.g. compute, database)
    #[arg(long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Emit JSON Schema for every tool instead of a table
    #[arg(long)]
    pub json: bool,

    /// Only read-only tools
    #[arg(long)]
    pub read_only: bool,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name (see `cloudops tools`)
    pub tool: String,

    /// Parameters as a JSON object
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    pub params: String,

    /// Region override for this call
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ComplianceCommand {
    /// Report resources missing the required tag
    Scan(ScanArgs),

    /// Scan, then tag or terminate every non-conforming resource
    Remediate(RemediateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Required tag key (defaults to [compliance].required_tag)
    #[arg(long, value_name = "KEY")]
    pub tag: Option<String>,

    /// Region to scan
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Stop collecting after this many ids per pass
    #[arg(long, value_name = "N")]
    pub max_items: Option<usize>,
}

/// What to do with a non-conforming resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RemediationAction {
    /// Set the missing tag (non-destructive)
    Tag,
    /// Terminate the resource
    Terminate,
}

#[derive(Args, Debug, Clone)]
pub struct RemediateArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    #[arg(long, value_enum, default_value = "tag")]
    pub action: RemediationAction,

    /// Value written by `--action tag`
    #[arg(long, value_name = "VALUE", default_value = "unassigned")]
    pub tag_value: String,

    /// Print what would be changed without changing it
    #[arg(long)]
    pub dry_run: bool,

    /// Remediate even if a scan pass hit its item cap
    #[arg(long)]
    pub allow_truncated: bool,

    /// Chunks in flight at once (defaults to [compliance].concurrency)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
}
