/// Library status of a game, as stored in `ZGAMESTATE`.
///
/// The mapping from the stored integer code is exhaustive. A code that is not
/// listed here means GameTrack introduced a new state; extend this enum rather
/// than defaulting, so extraction keeps failing loudly on unknown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameStatus {
    InProgress,
    Queued,
    Collection,
    Completed,
    Abandoned,
    Wanted,
}

/// All statuses in code order.
const ALL_STATUSES: &[GameStatus] = &[
    GameStatus::InProgress,
    GameStatus::Queued,
    GameStatus::Collection,
    GameStatus::Completed,
    GameStatus::Abandoned,
    GameStatus::Wanted,
];

impl GameStatus {
    /// Integer code used by the GameTrack store.
    pub fn code(&self) -> i64 {
        match self {
            Self::InProgress => 1,
            Self::Queued => 2,
            Self::Collection => 3,
            Self::Completed => 4,
            Self::Abandoned => 5,
            Self::Wanted => 6,
        }
    }

    /// Literal written to the dataset and to metric labels.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Queued => "Queued",
            Self::Collection => "Collection",
            Self::Completed => "Completed",
            Self::Abandoned => "Abandoned",
            Self::Wanted => "Wanted",
        }
    }

    /// Resolve a stored code. `None` (a NULL column) is never a valid status.
    pub fn from_code(code: Option<i64>) -> Result<Self, StatusCodeError> {
        match code {
            Some(1) => Ok(Self::InProgress),
            Some(2) => Ok(Self::Queued),
            Some(3) => Ok(Self::Collection),
            Some(4) => Ok(Self::Completed),
            Some(5) => Ok(Self::Abandoned),
            Some(6) => Ok(Self::Wanted),
            other => Err(StatusCodeError(other)),
        }
    }

    /// All six statuses in code order.
    pub fn all() -> &'static [GameStatus] {
        ALL_STATUSES
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned when a stored status code has no mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeError(pub Option<i64>);

impl std::fmt::Display for StatusCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(code) => write!(f, "unmapped game status code {code}"),
            None => write!(f, "missing game status code"),
        }
    }
}

impl std::error::Error for StatusCodeError {}

/// Error returned when a dataset literal is not a known status.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown game status: '{0}'")]
pub struct StatusParseError(pub String);

impl std::str::FromStr for GameStatus {
    type Err = StatusParseError;

    /// Parse the exact literal produced by [`GameStatus::label`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.label() == s)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}
