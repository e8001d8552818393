use std::path::Path;

use gametrack_core::{DateFormat, GameRecord};
use gametrack_db::Connection;
use gametrack_github::{GitDatabase, GitHubClient, PublishOutcome, PublishTarget};
use gametrack_wikidata::{SparqlEndpoint, WikidataClient};

use crate::cli_types::ExportArgs;
use crate::config::Settings;
use crate::error::CliError;

/// Export the GameTrack library to every requested destination.
pub(crate) fn run_export(args: &ExportArgs) -> Result<(), CliError> {
    let settings = Settings::load(args)?;
    let github = settings.github_credentials();

    if args.output_filename.is_none() && args.metrics_filename.is_none() && github.is_none() {
        return Err(CliError::NothingToDo);
    }

    let database = settings
        .database
        .value
        .as_deref()
        .ok_or_else(|| CliError::config("No GameTrack database path; pass --database"))?;
    log::info!("Reading {}", database.display());
    let conn = gametrack_db::open_read_only(database)?;

    let wikidata = WikidataClient::new(
        settings.wikidata_endpoint.value.as_deref().unwrap_or(gametrack_wikidata::DEFAULT_ENDPOINT),
        settings.user_agent.value.as_deref().unwrap_or(gametrack_wikidata::DEFAULT_USER_AGENT),
    )?;
    let games = load_games(&conn, &wikidata)?;

    if let Some(path) = &args.output_filename {
        let count = gametrack_dataset::write_games_csv(path, &games, args.date_format)?;
        log::info!("Wrote {count} rows to {}", path.display());
    }

    if let Some(path) = &args.metrics_filename {
        super::metrics::write_metrics_to(path, &games)?;
    }

    if let Some((repo, token)) = github {
        let client = GitHubClient::new(repo, token)?;
        log::info!("Uploading {} games to {repo}", games.len());
        let outcome = publish_games(&client, settings.publish_target(), &games, args.date_format)?;
        println!("{}", outcome.commit());
    }

    Ok(())
}

/// Reconcile every stored IGDB id with Wikidata, then extract all records.
pub(crate) fn load_games(
    conn: &Connection,
    wikidata: &dyn SparqlEndpoint,
) -> Result<Vec<GameRecord>, CliError> {
    let ids = gametrack_db::game_ids(conn)?;
    let reconciliation = gametrack_wikidata::reconcile(wikidata, &ids)?;
    if !reconciliation.conflicts().is_empty() {
        log::warn!(
            "{} IGDB ids matched more than one Wikidata item",
            reconciliation.conflicts().len()
        );
    }
    let games = gametrack_db::extract_games(conn, reconciliation.qids())?;
    log::info!("Loaded {} games", games.len());
    Ok(games)
}

/// Serialize `games` and publish them as the target branch's only file.
pub(crate) fn publish_games(
    git: &dyn GitDatabase,
    target: PublishTarget,
    games: &[GameRecord],
    dates: DateFormat,
) -> Result<PublishOutcome, CliError> {
    let bytes = gametrack_dataset::games_to_csv_bytes(games, dates)?;
    let content = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let outcome = gametrack_github::publish(git, target, &content)?;
    match &outcome {
        PublishOutcome::Unchanged { commit } => {
            log::info!("Dataset unchanged at {}", commit.short());
        }
        PublishOutcome::Committed { commit, parent } => {
            log::info!("Committed {} on top of {}", commit.short(), parent.short());
        }
    }
    Ok(outcome)
}

/// `-` means standard output.
pub(crate) fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}
