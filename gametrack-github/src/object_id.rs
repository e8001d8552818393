use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::error::GitHubError;

/// A git object name: 40 lowercase hex digits (SHA-1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id git assigns to a blob holding `content`.
    pub fn for_blob(content: &[u8]) -> Self {
        let mut sha = Sha1::new();
        sha.update(format!("blob {}\0", content.len()).as_bytes());
        sha.update(content);
        Self(format!("{:x}", sha.finalize()))
    }

    /// Abbreviated form for log messages.
    pub fn short(&self) -> &str {
        &self.0[..7]
    }
}

impl FromStr for ObjectId {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 40 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(GitHubError::InvalidObjectId(s.to_string()))
        }
    }
}

impl TryFrom<String> for ObjectId {
    type Error = GitHubError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
