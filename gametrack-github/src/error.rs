/// Errors that can occur while talking to the Git Data API.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub rejected the token (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Branch '{branch}' moved while publishing; not overwriting")]
    ConcurrentModification { branch: String },

    #[error("GitHub API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid object id '{0}'")]
    InvalidObjectId(String),

    #[error("Expected {expected} object, found {found}")]
    UnexpectedObjectType { expected: String, found: String },

    #[error("Uploaded blob has id {remote}, expected {local}")]
    BlobMismatch { local: String, remote: String },

    #[error("Invalid repository '{0}', expected OWNER/NAME")]
    InvalidRepository(String),
}

impl GitHubError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn conflict(branch: impl Into<String>) -> Self {
        Self::ConcurrentModification {
            branch: branch.into(),
        }
    }
}
