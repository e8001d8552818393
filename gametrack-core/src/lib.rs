//! Canonical game record and the GameTrack store's value encodings.

pub mod archive;
pub mod record;
pub mod status;
pub mod timestamp;

pub use archive::{ArchiveError, decode_string_array, string_array_or_empty};
pub use record::{GameRecord, LIST_SEPARATOR, QID_PREFIX, join_list, resolve_release_year, split_list};
pub use status::{GameStatus, StatusCodeError, StatusParseError};
pub use timestamp::{
    CORE_DATA_EPOCH_OFFSET, DateFormat, TimestampError, decode_store_timestamp,
    format_calendar_date, format_iso_millis, from_store_seconds, parse_dataset_timestamp,
    to_store_seconds,
};
