//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use datalens_model::DatasetFormat;

#[derive(Parser)]
#[command(
    name = "datalens",
    version,
    about = "Type and summarize tabular datasets from an S3-compatible bucket",
    long_about = "Type and summarize tabular datasets from an S3-compatible bucket.\n\n\
                  Reads CSV (any common encoding and delimiter) and Parquet, infers\n\
                  column types, derives duration seconds and weekly cadence columns,\n\
                  and prints per-column statistics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Fetch a dataset from the bucket and summarize it.
    Summarize(SummarizeArgs),

    /// Summarize a local file with the same readers.
    Inspect(InspectArgs),

    /// Resolve the dataset behind dashboard charts.
    Resolve(ResolveArgs),
}

#[derive(Parser)]
pub struct SummarizeArgs {
    /// Object key inside the configured bucket.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Settings file (TOML). Without it, defaults plus DATALENS_S3_* variables.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Format, when the key has no recognizable extension.
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Local CSV or Parquet file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Settings file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Format, when the file has no recognizable extension.
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Encoding label; skips detection.
    #[arg(long = "encoding", value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Field delimiter; skips sniffing.
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Read at most this many data rows.
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Print the summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Dashboard id.
    #[arg(value_name = "DASHBOARD")]
    pub dashboard: String,

    /// Chart ids; all must read the same dataset.
    #[arg(value_name = "CHART", required = true)]
    pub charts: Vec<String>,

    /// Registry file (TOML).
    #[arg(long = "registry", value_name = "PATH")]
    pub registry: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for DatasetFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => Self::Csv,
            FormatArg::Parquet => Self::Parquet,
        }
    }
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
