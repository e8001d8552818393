//! Read-only access to the GameTrack store and canonical record extraction.
//!
//! The store is a Core Data SQLite file owned by the GameTrack app. It is
//! opened read-only (via rusqlite with the bundled feature) and never written.

pub mod extract;
pub mod store;

pub use rusqlite::Connection;

pub use extract::{ExtractError, blob_to_uuid, extract_games, to_record};
pub use store::{GameRow, StoreError, default_database_path, game_ids, game_rows, open_read_only};
