use std::time::Duration;

use crate::error::WikidataError;
use crate::types::SparqlResponse;

pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_USER_AGENT: &str = "gametrack-data (https://github.com/josh/gametrack-data)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Something that can answer a SPARQL SELECT query.
pub trait SparqlEndpoint {
    fn select(&self, query: &str) -> Result<SparqlResponse, WikidataError>;
}

/// Blocking client for the Wikidata Query Service.
pub struct WikidataClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl WikidataClient {
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self, WikidataError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Client for the public endpoint with the default user agent.
    pub fn public() -> Result<Self, WikidataError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_USER_AGENT)
    }
}

impl SparqlEndpoint for WikidataClient {
    fn select(&self, query: &str) -> Result<SparqlResponse, WikidataError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("query", query)])
            .send()?;

        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(WikidataError::Status {
                status: status.as_u16(),
                message: snippet(&text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| WikidataError::malformed(format!("{e}. Response: {}", snippet(&text))))
    }
}

/// First 200 characters of a response body, for error messages.
fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}
