/// Errors that can occur while querying Wikidata.
///
/// Every variant is fatal for the run: a half-reconciled dataset is never
/// published.
#[derive(Debug, thiserror::Error)]
pub enum WikidataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Wikidata query service error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Malformed SPARQL response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WikidataError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
