//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use gametrack_core::DateFormat;

#[derive(Parser)]
#[command(name = "gametrack-data")]
#[command(about = "Export a GameTrack library as a CSV dataset and Prometheus metrics", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run (defaults to `export`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Export the GameTrack database to CSV, metrics and/or GitHub
    Export(ExportArgs),

    /// Generate metrics from a previously exported CSV
    Metrics(MetricsArgs),

    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ExportArgs {
    /// GameTrack SQLite database (defaults to the app's container)
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Output CSV filename
    #[arg(long, value_name = "FILENAME")]
    pub output_filename: Option<PathBuf>,

    /// Prometheus metrics filename (`-` for stdout)
    #[arg(long, value_name = "FILENAME")]
    pub metrics_filename: Option<PathBuf>,

    /// GitHub repository to publish to, as OWNER/NAME [env: GITHUB_REPOSITORY]
    #[arg(long, value_name = "GITHUB_REPOSITORY")]
    pub gh_repo: Option<String>,

    /// GitHub token [env: GITHUB_TOKEN]
    #[arg(long, value_name = "GITHUB_TOKEN")]
    pub gh_token: Option<String>,

    /// Branch that holds the dataset [default: data]
    #[arg(long)]
    pub branch: Option<String>,

    /// Path of the dataset file on the branch [default: games.csv]
    #[arg(long)]
    pub path: Option<String>,

    /// Commit message [default: "Update data"]
    #[arg(long)]
    pub message: Option<String>,

    /// How dates are written to the CSV (iso or date)
    #[arg(long, default_value = "iso")]
    pub date_format: DateFormat,
}

#[derive(Args, Clone, Debug)]
pub(crate) struct MetricsArgs {
    /// Input CSV filename
    #[arg(long, value_name = "FILENAME")]
    pub input_filename: PathBuf,

    /// Prometheus metrics filename (`-` for stdout)
    #[arg(long, value_name = "FILENAME", default_value = "-")]
    pub metrics_filename: PathBuf,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and their sources
    Show,

    /// Print the config file path
    Path,
}
