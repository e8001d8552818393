use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;

/// `GET /git/ref/...` and `PATCH /git/refs/...` responses.
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub object: RefTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefTarget {
    pub sha: ObjectId,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The subset of a commit object the publisher needs.
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub sha: ObjectId,
    pub tree: ObjectRef,
    #[serde(default)]
    pub parents: Vec<ObjectRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub sha: ObjectId,
}

/// Response to any object-creating call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    pub sha: ObjectId,
}

/// One entry of a tree to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: ObjectId,
}

impl TreeEntry {
    /// A regular, non-executable file.
    pub fn file(path: impl Into<String>, blob: ObjectId) -> Self {
        Self {
            path: path.into(),
            mode: "100644".to_string(),
            kind: "blob".to_string(),
            sha: blob,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBlob<'a> {
    pub content: &'a str,
    pub encoding: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateTree<'a> {
    pub tree: &'a [TreeEntry],
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateCommit<'a> {
    pub message: &'a str,
    pub tree: &'a ObjectId,
    pub parents: &'a [ObjectId],
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRef<'a> {
    pub sha: &'a ObjectId,
    pub force: bool,
}

/// Error body returned by the API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub message: String,
}
