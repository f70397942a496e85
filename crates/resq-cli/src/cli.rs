//! CLI argument definitions for the registry export flattener.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "resq-flatten",
    version,
    about = "Flatten a RES-Q registry ODM export into one row per subject",
    long_about = "Flatten a RES-Q registry ODM export into one wide CSV table.\n\n\
                  Each subject becomes one row. When a subject was entered on several\n\
                  questionnaire revisions the newest preferred one wins, and rows filled\n\
                  on the v1.2 form are recoded to the current coding scheme."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -vvv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Flatten an export into a CSV table.
    Flatten(FlattenArgs),

    /// List the active studies of an export with their subject counts.
    Studies(StudiesArgs),

    /// Print the v1.2 recode table.
    RecodeRules,
}

#[derive(Parser)]
pub struct FlattenArgs {
    /// Path to the ODM XML export.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV path (default: <INPUT> with a .csv extension).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of parallel workers (default: available cores, at most the configured maximum).
    #[arg(long = "jobs", short = 'j', value_name = "K")]
    pub jobs: Option<usize>,

    /// TOML file overriding the compiled-in registry configuration.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write a codebook CSV describing every canonical column.
    #[arg(long = "codebook", value_name = "PATH")]
    pub codebook: Option<PathBuf>,

    /// Do not draw progress bars.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Allow subject identifiers in trace logs.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

#[derive(Parser)]
pub struct StudiesArgs {
    /// Path to the ODM XML export.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML file overriding the compiled-in registry configuration.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
