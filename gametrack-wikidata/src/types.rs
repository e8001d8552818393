use serde::Deserialize;

/// SPARQL 1.1 JSON results, reduced to the two variables the reconciliation
/// query selects.
#[derive(Debug, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<IgdbBinding>,
}

/// One `(?item, ?igdb_id)` solution.
#[derive(Debug, Deserialize, Clone)]
pub struct IgdbBinding {
    pub item: Term,
    pub igdb_id: Term,
}

/// An RDF term as rendered by the query service.
#[derive(Debug, Deserialize, Clone)]
pub struct Term {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: String,
}
