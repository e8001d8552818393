//! Read-only access to the GameTrack Core Data store.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("GameTrack database not found at {0}")]
    NotFound(PathBuf),
    #[error("Column {column} has unexpected type {found}")]
    ColumnType { column: String, found: String },
}

/// Location of the GameTrack store inside its macOS app container.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join("Library")
            .join("Containers")
            .join("com.joekw.gametrack")
            .join("Data")
            .join("Library")
            .join("Application Support")
            .join("GameTrack")
            .join("GameData.sqlite")
    })
}

/// Open the store read-only. The file is never written to.
pub fn open_read_only(path: &Path) -> Result<Connection, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// A `ZGAME` row as stored, before any decoding.
#[derive(Debug, Clone, Default)]
pub struct GameRow {
    pub id: Option<Vec<u8>>,
    pub game_id: i64,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub poster_url: Option<String>,
    pub banner_url: Option<String>,
    pub release_date: Option<f64>,
    pub release_year: Option<i64>,
    pub platforms: Option<Vec<u8>>,
    pub owned_platform: Option<String>,
    pub additional_platforms: Option<Vec<u8>>,
    pub game_state: Option<i64>,
    pub completion_state: Option<i64>,
    pub completion: Option<i64>,
    pub priority: Option<i64>,
    pub format: Option<i64>,
    pub user_rating: Option<i64>,
    pub critic_rating: Option<i64>,
    pub hours_played: Option<f64>,
    pub additional_playtime: Option<f64>,
    pub start_date: Option<f64>,
    pub finish_date: Option<f64>,
    pub added_date: Option<f64>,
    pub notes: Option<String>,
    pub review: Option<String>,
    pub review_spoilers: Option<i64>,
    pub time_to_beat_story: Option<f64>,
    pub time_to_beat_extras: Option<f64>,
    pub time_to_beat_complete: Option<f64>,
    pub time_to_beat_type: Option<i64>,
    pub steam_deck_status: Option<i64>,
    pub genres: Option<Vec<u8>>,
}

const GAME_ROWS_SQL: &str = "
    SELECT
        ZID,
        ZGAMEID,
        ZTITLE,
        ZSUMMARY,
        ZDEVELOPER,
        ZPUBLISHER,
        ZPOSTERURL,
        ZBANNERURL,
        ZRELEASEDATE,
        ZRELEASEYEAR,
        ZPLATFORMS,
        ZOWNEDPLATFORM,
        ZADDITIONALPLATFORMS,
        ZGAMESTATE,
        ZCOMPLETIONSTATE,
        ZCOMPLETION,
        ZPRIORITY,
        ZFORMAT,
        ZUSERRATING,
        ZCRITICRATING,
        ZHOURSPLAYED,
        ZADDITIONALPLAYTIME,
        ZSTARTDATE,
        ZFINISHDATE,
        ZADDEDDATE,
        ZNOTES,
        ZREVIEW,
        ZREVIEWSPOILERS,
        ZTIMETOBEATSTORY,
        ZTIMETOBEATEXTRAS,
        ZTIMETOBEATCOMPLETE,
        ZTIMETOBEATTYPE,
        ZSTEAMDECKSTATUS,
        ZGENRES
    FROM ZGAME
    ORDER BY ZGAMEID ASC";

/// All IGDB ids in the store, ascending.
pub fn game_ids(conn: &Connection) -> Result<Vec<i64>, StoreError> {
    let mut stmt = conn.prepare("SELECT ZGAMEID FROM ZGAME ORDER BY ZGAMEID ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(column_error)
}

/// All game rows, ascending by IGDB id.
pub fn game_rows(conn: &Connection) -> Result<Vec<GameRow>, StoreError> {
    let mut stmt = conn.prepare(GAME_ROWS_SQL)?;
    let rows = stmt.query_map([], row_to_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(column_error)
}

fn row_to_game(row: &Row) -> rusqlite::Result<GameRow> {
    Ok(GameRow {
        id: row.get("ZID")?,
        game_id: row.get("ZGAMEID")?,
        title: row.get("ZTITLE")?,
        summary: row.get("ZSUMMARY")?,
        developer: row.get("ZDEVELOPER")?,
        publisher: row.get("ZPUBLISHER")?,
        poster_url: row.get("ZPOSTERURL")?,
        banner_url: row.get("ZBANNERURL")?,
        release_date: row.get("ZRELEASEDATE")?,
        release_year: row.get("ZRELEASEYEAR")?,
        platforms: row.get("ZPLATFORMS")?,
        owned_platform: row.get("ZOWNEDPLATFORM")?,
        additional_platforms: row.get("ZADDITIONALPLATFORMS")?,
        game_state: row.get("ZGAMESTATE")?,
        completion_state: row.get("ZCOMPLETIONSTATE")?,
        completion: row.get("ZCOMPLETION")?,
        priority: row.get("ZPRIORITY")?,
        format: row.get("ZFORMAT")?,
        user_rating: row.get("ZUSERRATING")?,
        critic_rating: row.get("ZCRITICRATING")?,
        hours_played: row.get("ZHOURSPLAYED")?,
        additional_playtime: row.get("ZADDITIONALPLAYTIME")?,
        start_date: row.get("ZSTARTDATE")?,
        finish_date: row.get("ZFINISHDATE")?,
        added_date: row.get("ZADDEDDATE")?,
        notes: row.get("ZNOTES")?,
        review: row.get("ZREVIEW")?,
        review_spoilers: row.get("ZREVIEWSPOILERS")?,
        time_to_beat_story: row.get("ZTIMETOBEATSTORY")?,
        time_to_beat_extras: row.get("ZTIMETOBEATEXTRAS")?,
        time_to_beat_complete: row.get("ZTIMETOBEATCOMPLETE")?,
        time_to_beat_type: row.get("ZTIMETOBEATTYPE")?,
        steam_deck_status: row.get("ZSTEAMDECKSTATUS")?,
        genres: row.get("ZGENRES")?,
    })
}

fn column_error(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::InvalidColumnType(_, column, found) => StoreError::ColumnType {
            column,
            found: found.to_string(),
        },
        other => StoreError::Sqlite(other),
    }
}
