use std::io;
use std::path::Path;

use gametrack_core::GameRecord;

use crate::cli_types::MetricsArgs;
use crate::error::CliError;

use super::export::is_stdout;

/// Regenerate metrics from a previously exported CSV.
pub(crate) fn run_metrics(args: &MetricsArgs) -> Result<(), CliError> {
    let games = gametrack_dataset::read_games_csv(&args.input_filename)?;
    log::debug!(
        "Read {} games from {}",
        games.len(),
        args.input_filename.display()
    );
    write_metrics_to(&args.metrics_filename, &games)
}

/// Write metrics to `path`, or to stdout when `path` is `-`.
pub(crate) fn write_metrics_to(path: &Path, games: &[GameRecord]) -> Result<(), CliError> {
    if is_stdout(path) {
        gametrack_dataset::write_metrics(io::stdout().lock(), games)?;
    } else {
        let series = gametrack_dataset::write_metrics_file(path, games)?;
        log::info!("Wrote {series} metric series to {}", path.display());
    }
    Ok(())
}
