//! `games.csv` serialization.
//!
//! One header row naming every column in [`GAME_FIELDS`] order, then one row
//! per game. Lines end in CRLF and floats keep a trailing `.0`, matching the
//! dataset history already published, so unchanged libraries re-serialize to
//! byte-identical files.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use gametrack_core::{
    DateFormat, GameRecord, GameStatus, join_list, parse_dataset_timestamp,
    resolve_release_year, split_list,
};
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Dataset columns, in output order.
pub const GAME_FIELDS: [&str; 36] = [
    "uuid",
    "igdb_id",
    "wikidata_qid",
    "title",
    "summary",
    "developer",
    "publisher",
    "poster_url",
    "banner_url",
    "release_date",
    "release_year",
    "platforms",
    "owned_platform",
    "additional_platforms",
    "status",
    "game_state",
    "completion_state",
    "completion",
    "priority",
    "format",
    "user_rating",
    "critic_rating",
    "hours_played",
    "additional_playtime",
    "start_date",
    "finish_date",
    "added_date",
    "notes",
    "review",
    "review_spoilers",
    "time_to_beat_story",
    "time_to_beat_extras",
    "time_to_beat_complete",
    "time_to_beat_type",
    "steam_deck_status",
    "genres",
];

/// One CSV line. Field order must match [`GAME_FIELDS`].
///
/// Every column defaults when absent so older dataset revisions (which lack
/// some columns, notably `release_year`) still load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CsvRow {
    uuid: String,
    igdb_id: String,
    wikidata_qid: String,
    title: String,
    summary: String,
    developer: String,
    publisher: String,
    poster_url: String,
    banner_url: String,
    release_date: String,
    release_year: Option<String>,
    platforms: String,
    owned_platform: String,
    additional_platforms: String,
    status: String,
    game_state: String,
    completion_state: String,
    completion: String,
    priority: String,
    format: String,
    user_rating: String,
    critic_rating: String,
    hours_played: String,
    additional_playtime: String,
    start_date: String,
    finish_date: String,
    added_date: String,
    notes: String,
    review: String,
    review_spoilers: String,
    time_to_beat_story: String,
    time_to_beat_extras: String,
    time_to_beat_complete: String,
    time_to_beat_type: String,
    steam_deck_status: String,
    genres: String,
}

impl CsvRow {
    fn from_record(game: &GameRecord, dates: DateFormat) -> Self {
        Self {
            uuid: game.uuid.clone(),
            igdb_id: game.igdb_id.to_string(),
            wikidata_qid: game.wikidata_qid.clone(),
            title: game.title.clone(),
            summary: game.summary.clone(),
            developer: game.developer.clone(),
            publisher: game.publisher.clone(),
            poster_url: game.poster_url.clone(),
            banner_url: game.banner_url.clone(),
            release_date: dates.render_opt(game.release_date.as_ref()),
            release_year: Some(game.release_year.to_string()),
            platforms: join_list(&game.platforms),
            owned_platform: game.owned_platform.clone(),
            additional_platforms: join_list(&game.additional_platforms),
            status: game.status.label().to_string(),
            game_state: game.game_state.to_string(),
            completion_state: game.completion_state.to_string(),
            completion: game.completion.to_string(),
            priority: game.priority.to_string(),
            format: game.format.to_string(),
            user_rating: game.user_rating.to_string(),
            critic_rating: game.critic_rating.to_string(),
            hours_played: format_float(game.hours_played),
            additional_playtime: format_float(game.additional_playtime),
            start_date: dates.render_opt(game.start_date.as_ref()),
            finish_date: dates.render_opt(game.finish_date.as_ref()),
            added_date: dates.render_opt(game.added_date.as_ref()),
            notes: game.notes.clone(),
            review: game.review.clone(),
            review_spoilers: game.review_spoilers.to_string(),
            time_to_beat_story: format_float(game.time_to_beat_story),
            time_to_beat_extras: format_float(game.time_to_beat_extras),
            time_to_beat_complete: format_float(game.time_to_beat_complete),
            time_to_beat_type: game.time_to_beat_type.to_string(),
            steam_deck_status: game.steam_deck_status.to_string(),
            genres: join_list(&game.genres),
        }
    }

    fn into_record(self, line: u64) -> Result<GameRecord, DatasetError> {
        let igdb_id = self
            .igdb_id
            .trim()
            .parse::<i64>()
            .map_err(|e| DatasetError::invalid_field(line, "igdb_id", e.to_string()))?;
        if self.title.is_empty() {
            return Err(DatasetError::invalid_field(line, "title", "empty title"));
        }
        let status: GameStatus = self
            .status
            .parse()
            .map_err(|e: gametrack_core::StatusParseError| {
                DatasetError::invalid_field(line, "status", e.to_string())
            })?;

        let date = |field: &'static str, value: &str| {
            parse_dataset_timestamp(value)
                .map_err(|e| DatasetError::invalid_field(line, field, e.to_string()))
        };
        let release_date = date("release_date", &self.release_date)?;

        let stored_year = match self.release_year.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(year) => Some(parse_int(line, "release_year", year)?),
        };

        Ok(GameRecord {
            uuid: self.uuid,
            igdb_id,
            wikidata_qid: self.wikidata_qid,
            title: self.title,
            summary: self.summary,
            developer: self.developer,
            publisher: self.publisher,
            poster_url: self.poster_url,
            banner_url: self.banner_url,
            release_year: resolve_release_year(stored_year, release_date.as_ref()),
            release_date,
            platforms: split_list(&self.platforms),
            owned_platform: self.owned_platform,
            additional_platforms: split_list(&self.additional_platforms),
            status,
            game_state: parse_int(line, "game_state", &self.game_state)?,
            completion_state: parse_int(line, "completion_state", &self.completion_state)?,
            completion: parse_int(line, "completion", &self.completion)?,
            priority: parse_int(line, "priority", &self.priority)?,
            format: parse_int(line, "format", &self.format)?,
            user_rating: parse_int(line, "user_rating", &self.user_rating)?,
            critic_rating: parse_int(line, "critic_rating", &self.critic_rating)?,
            hours_played: parse_float(line, "hours_played", &self.hours_played)?,
            additional_playtime: parse_float(line, "additional_playtime", &self.additional_playtime)?,
            start_date: date("start_date", &self.start_date)?,
            finish_date: date("finish_date", &self.finish_date)?,
            added_date: date("added_date", &self.added_date)?,
            notes: self.notes,
            review: self.review,
            review_spoilers: parse_bool(line, "review_spoilers", &self.review_spoilers)?,
            time_to_beat_story: parse_float(line, "time_to_beat_story", &self.time_to_beat_story)?,
            time_to_beat_extras: parse_float(line, "time_to_beat_extras", &self.time_to_beat_extras)?,
            time_to_beat_complete: parse_float(
                line,
                "time_to_beat_complete",
                &self.time_to_beat_complete,
            )?,
            time_to_beat_type: parse_int(line, "time_to_beat_type", &self.time_to_beat_type)?,
            steam_deck_status: parse_int(line, "steam_deck_status", &self.steam_deck_status)?,
            genres: split_list(&self.genres),
        })
    }
}

/// Render a float the way the published dataset always has: integral values
/// keep one decimal (`12.0`), others use the shortest round-trip form.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn parse_int(line: u64, field: &'static str, value: &str) -> Result<i64, DatasetError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .map_err(|e| DatasetError::invalid_field(line, field, format!("'{value}': {e}")))
}

fn parse_float(line: u64, field: &'static str, value: &str) -> Result<f64, DatasetError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .map_err(|e| DatasetError::invalid_field(line, field, format!("'{value}': {e}")))
}

fn parse_bool(line: u64, field: &'static str, value: &str) -> Result<bool, DatasetError> {
    match value.trim() {
        "" | "false" | "False" => Ok(false),
        "true" | "True" => Ok(true),
        other => Err(DatasetError::invalid_field(
            line,
            field,
            format!("'{other}' is not a boolean"),
        )),
    }
}

/// Write the dataset to any writer. Returns the number of game rows written.
pub fn write_games<W: Write>(
    writer: W,
    games: &[GameRecord],
    dates: DateFormat,
) -> Result<usize, DatasetError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv_writer.write_record(GAME_FIELDS)?;
    for game in games {
        csv_writer.serialize(CsvRow::from_record(game, dates))?;
    }
    csv_writer.flush()?;
    Ok(games.len())
}

/// Serialize the dataset into an in-memory buffer.
pub fn games_to_csv_bytes(games: &[GameRecord], dates: DateFormat) -> Result<Vec<u8>, DatasetError> {
    let mut buf = Vec::new();
    write_games(&mut buf, games, dates)?;
    Ok(buf)
}

/// Write the dataset to a file, replacing it.
pub fn write_games_csv(
    path: &Path,
    games: &[GameRecord],
    dates: DateFormat,
) -> Result<usize, DatasetError> {
    let file = File::create(path)?;
    write_games(file, games, dates)
}

/// Re-read a dataset produced by [`write_games`] (or an older revision).
pub fn read_games<R: Read>(reader: R) -> Result<Vec<GameRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut games = Vec::new();
    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        games.push(row.into_record(index as u64 + 2)?);
    }
    Ok(games)
}

/// Re-read a dataset file.
pub fn read_games_csv(path: &Path) -> Result<Vec<GameRecord>, DatasetError> {
    let file = File::open(path)?;
    read_games(file)
}
