//! Core Data timestamp conversion.
//!
//! GameTrack stores dates as seconds (integer or float) since
//! 2001-01-01T00:00:00Z. A stored value of zero, or a NULL column, means the
//! date is not set.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Seconds between the Unix epoch and the Core Data reference date.
pub const CORE_DATA_EPOCH_OFFSET: i64 = 978_307_200;

const MICROS_PER_SECOND: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampError {
    #[error("stored timestamp {0} is out of range")]
    OutOfRange(f64),

    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

/// Convert a stored Core Data value into an absolute UTC instant.
///
/// Fractional seconds are kept to microsecond precision.
pub fn from_store_seconds(stored: f64) -> Result<DateTime<Utc>, TimestampError> {
    if !stored.is_finite() {
        return Err(TimestampError::OutOfRange(stored));
    }
    let micros = (stored * MICROS_PER_SECOND as f64).round();
    if micros.abs() >= i64::MAX as f64 / 2.0 {
        return Err(TimestampError::OutOfRange(stored));
    }
    (micros as i64)
        .checked_add(CORE_DATA_EPOCH_OFFSET * MICROS_PER_SECOND)
        .and_then(DateTime::from_timestamp_micros)
        .ok_or(TimestampError::OutOfRange(stored))
}

/// Decode a nullable stored column. `None` and `0` both mean "unset".
pub fn decode_store_timestamp(
    stored: Option<f64>,
) -> Result<Option<DateTime<Utc>>, TimestampError> {
    match stored {
        None => Ok(None),
        Some(v) if v == 0.0 => Ok(None),
        Some(v) => from_store_seconds(v).map(Some),
    }
}

/// Inverse of [`from_store_seconds`].
pub fn to_store_seconds(instant: &DateTime<Utc>) -> f64 {
    let micros = instant.timestamp_micros() - CORE_DATA_EPOCH_OFFSET * MICROS_PER_SECOND;
    micros as f64 / MICROS_PER_SECOND as f64
}

/// How timestamps are rendered in the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// `2020-05-01T12:00:00.000Z`
    #[default]
    Iso,
    /// `2020-05-01`
    Date,
}

impl DateFormat {
    pub fn render(&self, instant: &DateTime<Utc>) -> String {
        match self {
            Self::Iso => format_iso_millis(instant),
            Self::Date => format_calendar_date(instant),
        }
    }

    /// Render an optional timestamp, with unset rendered as an empty string.
    pub fn render_opt(&self, instant: Option<&DateTime<Utc>>) -> String {
        instant.map(|i| self.render(i)).unwrap_or_default()
    }
}

impl std::str::FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iso" => Ok(Self::Iso),
            "date" => Ok(Self::Date),
            other => Err(format!("unknown date format '{other}' (expected iso or date)")),
        }
    }
}

/// ISO-8601 with millisecond precision and a literal `Z` suffix.
pub fn format_iso_millis(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Plain calendar date (`YYYY-MM-DD`) in UTC.
pub fn format_calendar_date(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Parse either dataset rendering back into an instant. Empty means unset.
pub fn parse_dataset_timestamp(s: &str) -> Result<Option<DateTime<Utc>>, TimestampError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| TimestampError::InvalidDate(s.to_string()))
}
