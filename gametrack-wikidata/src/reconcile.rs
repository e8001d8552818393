use std::collections::HashMap;
use std::fmt::Write as _;

use crate::client::SparqlEndpoint;
use crate::error::WikidataError;
use crate::types::IgdbBinding;

/// Two different items claimed the same IGDB id. `kept` is the later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QidConflict {
    pub igdb_id: i64,
    pub replaced: String,
    pub kept: String,
}

/// IGDB id -> QID mapping, plus any conflicts seen while building it.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    qids: HashMap<i64, String>,
    conflicts: Vec<QidConflict>,
}

impl Reconciliation {
    pub fn qids(&self) -> &HashMap<i64, String> {
        &self.qids
    }

    pub fn into_qids(self) -> HashMap<i64, String> {
        self.qids
    }

    pub fn qid_for(&self, igdb_id: i64) -> Option<&str> {
        self.qids.get(&igdb_id).map(String::as_str)
    }

    pub fn conflicts(&self) -> &[QidConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.qids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qids.is_empty()
    }

    fn insert(&mut self, igdb_id: i64, qid: String) {
        if let Some(previous) = self.qids.get(&igdb_id) {
            if *previous == qid {
                return;
            }
            log::warn!("IGDB id {igdb_id} maps to both {previous} and {qid}; using {qid}");
            self.conflicts.push(QidConflict {
                igdb_id,
                replaced: previous.clone(),
                kept: qid.clone(),
            });
        }
        self.qids.insert(igdb_id, qid);
    }
}

/// Build the batched lookup query for `ids`.
///
/// Only best-rank IGDB statements count, so deprecated values don't match.
pub fn build_query(ids: &[i64]) -> String {
    let mut values = String::new();
    for id in ids {
        if !values.is_empty() {
            values.push(' ');
        }
        let _ = write!(values, "\"{id}\"");
    }
    format!(
        "SELECT ?item ?igdb_id WHERE {{\n  \
         VALUES ?igdb_id {{ {values} }}\n  \
         ?item p:P5794 [ pq:P9043 ?igdb_id; rdf:type wikibase:BestRank ].\n\
         }}\n"
    )
}

/// Look up the Wikidata items for every id in a single query.
///
/// Ids with no matching item are simply absent from the result.
pub fn reconcile(
    endpoint: &dyn SparqlEndpoint,
    ids: &[i64],
) -> Result<Reconciliation, WikidataError> {
    let mut reconciliation = Reconciliation::default();
    if ids.is_empty() {
        log::debug!("No games to reconcile; skipping Wikidata query");
        return Ok(reconciliation);
    }

    log::info!("Querying Wikidata for {} IGDB ids", ids.len());
    let response = endpoint.select(&build_query(ids))?;

    for binding in &response.results.bindings {
        let (igdb_id, qid) = parse_binding(binding)?;
        reconciliation.insert(igdb_id, qid);
    }

    log::info!(
        "Matched {} of {} games to Wikidata items",
        reconciliation.len(),
        ids.len()
    );
    Ok(reconciliation)
}

fn parse_binding(binding: &IgdbBinding) -> Result<(i64, String), WikidataError> {
    let uri = binding.item.value.as_str();
    let qid = uri.rsplit('/').next().unwrap_or(uri);
    if !is_qid(qid) {
        return Err(WikidataError::malformed(format!(
            "item '{uri}' is not a Wikidata entity"
        )));
    }

    let raw_id = binding.igdb_id.value.trim();
    let igdb_id = raw_id.parse::<i64>().map_err(|e| {
        WikidataError::malformed(format!("IGDB id '{raw_id}' for {qid}: {e}"))
    })?;

    Ok((igdb_id, qid.to_string()))
}

fn is_qid(s: &str) -> bool {
    s.strip_prefix('Q')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
