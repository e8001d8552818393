//! Publishing the dataset through the GitHub Git Data API.
//!
//! [`GitDatabase`] is the seam between the publish state machine and the
//! HTTP client, so the machine can be driven by an in-memory repository.

pub mod client;
pub mod error;
pub mod object_id;
pub mod publish;
pub mod types;

pub use client::{DEFAULT_API_BASE, GitDatabase, GitHubClient};
pub use error::GitHubError;
pub use object_id::ObjectId;
pub use publish::{
    BranchTip, DEFAULT_BRANCH, DEFAULT_MESSAGE, DEFAULT_PATH, PublishOutcome, PublishTarget,
    Publisher, publish,
};
pub use types::{CreatedObject, GitCommit, GitRef, ObjectRef, RefTarget, TreeEntry};
