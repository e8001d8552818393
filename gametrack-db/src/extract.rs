//! Conversion of raw `ZGAME` rows into canonical [`GameRecord`]s.

use std::collections::HashMap;

use gametrack_core::{
    GameRecord, GameStatus, TimestampError, decode_store_timestamp, resolve_release_year,
    string_array_or_empty,
};
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::store::{self, GameRow, StoreError};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The row has a status code with no known mapping. This is a new
    /// categorical value, not a broken row.
    #[error("Game {igdb_id} has {source}")]
    UnmappedStatus {
        igdb_id: i64,
        source: gametrack_core::StatusCodeError,
    },

    #[error("Game {igdb_id} is malformed: {reason}")]
    MalformedRow { igdb_id: i64, reason: String },
}

impl ExtractError {
    fn malformed(igdb_id: i64, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            igdb_id,
            reason: reason.into(),
        }
    }
}

/// Read and convert every game in the store, ascending by IGDB id.
///
/// `qids` maps IGDB ids to Wikidata item ids; games without an entry get an
/// empty `wikidata_qid`. Any row error aborts the whole extraction.
pub fn extract_games(
    conn: &Connection,
    qids: &HashMap<i64, String>,
) -> Result<Vec<GameRecord>, ExtractError> {
    let rows = store::game_rows(conn)?;
    let records = rows
        .into_iter()
        .map(|row| to_record(row, qids))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Extracted {} games", records.len());
    Ok(records)
}

/// Convert one stored row.
pub fn to_record(row: GameRow, qids: &HashMap<i64, String>) -> Result<GameRecord, ExtractError> {
    let igdb_id = row.game_id;

    let title = row
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ExtractError::malformed(igdb_id, "missing title"))?;

    let status = GameStatus::from_code(row.game_state)
        .map_err(|source| ExtractError::UnmappedStatus { igdb_id, source })?;

    let timestamp = |field: &str, stored: Option<f64>| {
        decode_store_timestamp(stored).map_err(|e: TimestampError| {
            ExtractError::malformed(igdb_id, format!("{field}: {e}"))
        })
    };
    let release_date = timestamp("release date", row.release_date)?;
    let start_date = timestamp("start date", row.start_date)?;
    let finish_date = timestamp("finish date", row.finish_date)?;
    let added_date = timestamp("added date", row.added_date)?;

    Ok(GameRecord {
        uuid: blob_to_uuid(row.id.as_deref()),
        igdb_id,
        wikidata_qid: qids.get(&igdb_id).cloned().unwrap_or_default(),
        title,
        summary: row.summary.unwrap_or_default(),
        developer: row.developer.unwrap_or_default(),
        publisher: row.publisher.unwrap_or_default(),
        poster_url: row.poster_url.unwrap_or_default(),
        banner_url: row.banner_url.unwrap_or_default(),
        release_year: resolve_release_year(row.release_year, release_date.as_ref()),
        release_date,
        platforms: string_array_or_empty(row.platforms.as_deref()),
        owned_platform: row.owned_platform.unwrap_or_default(),
        additional_platforms: string_array_or_empty(row.additional_platforms.as_deref()),
        status,
        game_state: status.code(),
        completion_state: row.completion_state.unwrap_or(0),
        completion: row.completion.unwrap_or(0),
        priority: row.priority.unwrap_or(0),
        format: row.format.unwrap_or(0),
        user_rating: row.user_rating.unwrap_or(0),
        critic_rating: row.critic_rating.unwrap_or(0),
        hours_played: row.hours_played.unwrap_or(0.0),
        additional_playtime: row.additional_playtime.unwrap_or(0.0),
        start_date,
        finish_date,
        added_date,
        notes: row.notes.unwrap_or_default(),
        review: row.review.unwrap_or_default(),
        review_spoilers: row.review_spoilers.is_some_and(|v| v != 0),
        time_to_beat_story: row.time_to_beat_story.unwrap_or(0.0),
        time_to_beat_extras: row.time_to_beat_extras.unwrap_or(0.0),
        time_to_beat_complete: row.time_to_beat_complete.unwrap_or(0.0),
        time_to_beat_type: row.time_to_beat_type.unwrap_or(0),
        steam_deck_status: row.steam_deck_status.unwrap_or(0),
        genres: string_array_or_empty(row.genres.as_deref()),
    })
}

/// Format the 16-byte `ZID` blob as an uppercase UUID. Anything else is empty.
pub fn blob_to_uuid(blob: Option<&[u8]>) -> String {
    blob.and_then(|b| Uuid::from_slice(b).ok())
        .map(|u| u.hyphenated().to_string().to_uppercase())
        .unwrap_or_default()
}
