use std::cell::RefCell;

use gametrack_wikidata::*;

/// Endpoint that answers every query with a canned JSON body.
struct FakeEndpoint {
    body: String,
    queries: RefCell<Vec<String>>,
}

impl FakeEndpoint {
    fn new(bindings: &[(&str, &str)]) -> Self {
        let bindings: Vec<String> = bindings
            .iter()
            .map(|(item, id)| {
                format!(
                    r#"{{"item":{{"type":"uri","value":"{item}"}},"igdb_id":{{"type":"literal","value":"{id}"}}}}"#
                )
            })
            .collect();
        Self {
            body: format!(
                r#"{{"head":{{"vars":["item","igdb_id"]}},"results":{{"bindings":[{}]}}}}"#,
                bindings.join(",")
            ),
            queries: RefCell::new(Vec::new()),
        }
    }

    fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl SparqlEndpoint for FakeEndpoint {
    fn select(&self, query: &str) -> Result<SparqlResponse, WikidataError> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(serde_json::from_str(&self.body)?)
    }
}

struct FailingEndpoint;

impl SparqlEndpoint for FailingEndpoint {
    fn select(&self, _query: &str) -> Result<SparqlResponse, WikidataError> {
        Err(WikidataError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    }
}

#[test]
fn maps_ids_to_qids() {
    let endpoint = FakeEndpoint::new(&[
        ("http://www.wikidata.org/entity/Q11835640", "1942"),
        ("http://www.wikidata.org/entity/Q7222", "2000"),
    ]);
    let result = reconcile(&endpoint, &[1942, 2000, 3000]).unwrap();

    assert_eq!(endpoint.query_count(), 1);
    assert_eq!(result.len(), 2);
    assert_eq!(result.qid_for(1942), Some("Q11835640"));
    assert_eq!(result.qid_for(2000), Some("Q7222"));
    assert_eq!(result.qid_for(3000), None);
    assert!(result.conflicts().is_empty());

    let query = &endpoint.queries.borrow()[0];
    assert!(query.contains(r#"VALUES ?igdb_id { "1942" "2000" "3000" }"#));
}

#[test]
fn duplicate_qids_last_seen_wins() {
    let endpoint = FakeEndpoint::new(&[
        ("http://www.wikidata.org/entity/Q1", "100"),
        ("http://www.wikidata.org/entity/Q2", "100"),
    ]);
    let result = reconcile(&endpoint, &[100]).unwrap();

    assert_eq!(result.qid_for(100), Some("Q2"));
    assert_eq!(
        result.conflicts(),
        &[QidConflict {
            igdb_id: 100,
            replaced: "Q1".to_string(),
            kept: "Q2".to_string(),
        }]
    );
}

#[test]
fn empty_id_set_skips_remote_call() {
    let endpoint = FakeEndpoint::new(&[]);
    let result = reconcile(&endpoint, &[]).unwrap();
    assert!(result.is_empty());
    assert_eq!(endpoint.query_count(), 0);
}

#[test]
fn no_bindings_is_an_empty_mapping() {
    let endpoint = FakeEndpoint::new(&[]);
    let result = reconcile(&endpoint, &[1, 2]).unwrap();
    assert!(result.is_empty());
    assert_eq!(endpoint.query_count(), 1);
}

#[test]
fn non_entity_item_is_malformed() {
    let endpoint = FakeEndpoint::new(&[("http://www.wikidata.org/prop/P5794", "1")]);
    let err = reconcile(&endpoint, &[1]).unwrap_err();
    assert!(matches!(err, WikidataError::MalformedResponse(_)), "{err}");
}

#[test]
fn non_integer_id_is_malformed() {
    let endpoint = FakeEndpoint::new(&[("http://www.wikidata.org/entity/Q1", "one")]);
    let err = reconcile(&endpoint, &[1]).unwrap_err();
    assert!(matches!(err, WikidataError::MalformedResponse(_)), "{err}");
}

#[test]
fn endpoint_failure_is_fatal() {
    let err = reconcile(&FailingEndpoint, &[1]).unwrap_err();
    assert!(matches!(err, WikidataError::Status { status: 503, .. }));
}
