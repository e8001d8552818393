//! gametrack-data CLI
//!
//! Exports a GameTrack library as a CSV dataset, Prometheus metrics, and a
//! commit on a GitHub branch.

mod cli_types;
mod commands;
mod config;
mod error;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use cli_types::{Cli, Commands, ConfigAction, ExportArgs};
use error::CliError;

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{level}: {}", record.args()),
        });
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => commands::export::run_export(&ExportArgs::default()),
        Some(Commands::Export(args)) => commands::export::run_export(&args),
        Some(Commands::Metrics(args)) => commands::metrics::run_metrics(&args),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
