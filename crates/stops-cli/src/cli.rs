//! Command-line arguments for `stops`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use stops_ingest::DEFAULT_CHUNK_SIZE;
use stops_model::MissingStatePolicy;

#[derive(Parser)]
#[command(
    name = "stops",
    version,
    about = "Normalize traffic-stop records for analysis",
    long_about = "Normalize traffic-stop records for analysis.\n\n\
                  Drops rows without a county or driver race, lowercases race labels,\n\
                  builds a state-qualified officer key and removes redundant columns."
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

    /// Log output format.
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

    /// Allow raw values such as officer keys in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a stop file and report row accounting.
    Normalize(NormalizeArgs),

    /// List the columns normalization reads, drops or creates.
    Columns,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Stop file (CSV with a header row).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Rows per chunk when streaming.
    #[arg(long = "chunk-size", value_name = "N", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Read and normalize the input in chunks of --chunk-size rows.
    #[arg(long = "stream")]
    pub stream: bool,

    /// Auxiliary dataset carried alongside the stops (for example census data).
    #[arg(long = "reference", value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Write the normalized stops to this CSV file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// What to do with rows that have an officer id but no state.
    #[arg(long = "missing-state", value_enum, default_value = "leave-empty")]
    pub missing_state: MissingStateArg,

    /// Print the run report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingStateArg {
    /// Keep the row with an empty officer key.
    LeaveEmpty,
    /// Remove the row.
    DropRow,
}

impl From<MissingStateArg> for MissingStatePolicy {
    fn from(arg: MissingStateArg) -> Self {
        match arg {
            MissingStateArg::LeaveEmpty => MissingStatePolicy::LeaveEmpty,
            MissingStateArg::DropRow => MissingStatePolicy::DropRow,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
