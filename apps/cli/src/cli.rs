//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{LogFormat, ReportFormat};

/// Validate form submissions against declarative rule plans.
#[derive(Parser, Debug)]
#[command(
    name = "formcheck",
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to a configuration file (defaults to ./formcheck.toml when present)
    #[arg(short, long, global = true, env = "FORMCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `formcheck_validator=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a JSON submission against a rule plan
    Check(CheckArgs),

    /// Print the effective message catalog
    Messages(MessagesArgs),
}

/// Arguments for `formcheck check`
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON object with the submitted fields, or `-` for stdin
    #[arg(short, long, value_name = "FORM")]
    pub input: PathBuf,

    /// Rule plan (TOML, YAML or JSON, picked by extension)
    #[arg(short, long, value_name = "PLAN")]
    pub rules: PathBuf,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Separator between the messages of one field in text reports
    #[arg(short, long)]
    pub joiner: Option<String>,
}

/// Arguments for `formcheck messages`
#[derive(Args, Debug)]
pub struct MessagesArgs {
    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}
