use thiserror::Error;

use gametrack_dataset::DatasetError;
use gametrack_db::{ExtractError, StoreError};
use gametrack_github::GitHubError;
use gametrack_wikidata::WikidataError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Opening or querying the GameTrack store failed
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("Wikidata: {0}")]
    Wikidata(#[from] WikidataError),

    #[error("GitHub: {0}")]
    GitHub(#[from] GitHubError),

    /// Writing or re-reading the dataset failed
    #[error("{0}")]
    Dataset(#[from] DatasetError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// `export` was run with no output requested
    #[error(
        "Nothing to do: pass --output-filename, --metrics-filename, or configure a GitHub repository and token"
    )]
    NothingToDo,
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
