use chrono::{DateTime, Datelike, Utc};

use crate::status::GameStatus;

/// Separator used when a list field is flattened into one dataset cell.
pub const LIST_SEPARATOR: &str = "|";

/// Namespace prefix every Wikidata item id starts with.
pub const QID_PREFIX: char = 'Q';

/// One game of the canonical dataset.
///
/// Built once per extraction pass and never mutated afterwards. Numeric
/// measures use zero both for "measured zero" and for "not measured".
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Uppercase hyphenated UUID, empty when the store has none.
    pub uuid: String,
    pub igdb_id: i64,
    /// Wikidata item id, empty when unresolved.
    pub wikidata_qid: String,
    pub title: String,
    pub summary: String,
    pub developer: String,
    pub publisher: String,
    pub poster_url: String,
    pub banner_url: String,
    pub release_date: Option<DateTime<Utc>>,
    pub release_year: i32,
    pub platforms: Vec<String>,
    pub owned_platform: String,
    pub additional_platforms: Vec<String>,
    pub status: GameStatus,
    pub game_state: i64,
    pub completion_state: i64,
    pub completion: i64,
    pub priority: i64,
    pub format: i64,
    pub user_rating: i64,
    pub critic_rating: i64,
    pub hours_played: f64,
    pub additional_playtime: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub finish_date: Option<DateTime<Utc>>,
    pub added_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub review: String,
    pub review_spoilers: bool,
    pub time_to_beat_story: f64,
    pub time_to_beat_extras: f64,
    pub time_to_beat_complete: f64,
    pub time_to_beat_type: i64,
    pub steam_deck_status: i64,
    pub genres: Vec<String>,
}

impl GameRecord {
    /// A record with only the required fields set and every other field at
    /// its default.
    pub fn new(igdb_id: i64, title: impl Into<String>, status: GameStatus) -> Self {
        Self {
            uuid: String::new(),
            igdb_id,
            wikidata_qid: String::new(),
            title: title.into(),
            summary: String::new(),
            developer: String::new(),
            publisher: String::new(),
            poster_url: String::new(),
            banner_url: String::new(),
            release_date: None,
            release_year: 0,
            platforms: Vec::new(),
            owned_platform: String::new(),
            additional_platforms: Vec::new(),
            status,
            game_state: status.code(),
            completion_state: 0,
            completion: 0,
            priority: 0,
            format: 0,
            user_rating: 0,
            critic_rating: 0,
            hours_played: 0.0,
            additional_playtime: 0.0,
            start_date: None,
            finish_date: None,
            added_date: None,
            notes: String::new(),
            review: String::new(),
            review_spoilers: false,
            time_to_beat_story: 0.0,
            time_to_beat_extras: 0.0,
            time_to_beat_complete: 0.0,
            time_to_beat_type: 0,
            steam_deck_status: 0,
            genres: Vec::new(),
        }
    }

    /// Whether the game has a Wikidata match.
    pub fn is_reconciled(&self) -> bool {
        !self.wikidata_qid.is_empty()
    }
}

/// Pick the release year: the stored year when set, otherwise the year of the
/// release date, otherwise zero.
pub fn resolve_release_year(stored_year: Option<i64>, release_date: Option<&DateTime<Utc>>) -> i32 {
    match stored_year.and_then(|y| i32::try_from(y).ok()) {
        Some(year) if year != 0 => year,
        _ => release_date.map(|d| d.year()).unwrap_or(0),
    }
}

/// Flatten a list field into one dataset cell.
pub fn join_list(values: &[String]) -> String {
    values.join(LIST_SEPARATOR)
}

/// Split a dataset cell back into a list. An empty cell is an empty list.
pub fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split(LIST_SEPARATOR).map(str::to_string).collect()
    }
}
