//! Wikidata reconciliation of IGDB game ids.
//!
//! All ids are looked up in one SPARQL query against the Wikidata Query
//! Service; the transport sits behind [`SparqlEndpoint`].

pub mod client;
pub mod error;
pub mod reconcile;
pub mod types;

pub use client::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, SparqlEndpoint, WikidataClient};
pub use error::WikidataError;
pub use reconcile::{QidConflict, Reconciliation, build_query, reconcile};
pub use types::{IgdbBinding, SparqlResponse, SparqlResults, Term};
