//! Publishing a single file as the whole content of a branch.
//!
//! The publisher walks an explicit state machine:
//!
//! ```text
//! ReadRef -> BuildTree -> CreateCommit -> UpdateRef -> Done(Committed)
//!                    \-> Done(Unchanged)
//! ```
//!
//! If the new tree equals the tip's tree nothing is committed. The final ref
//! update never forces, so a branch that moved since `ReadRef` is reported as
//! [`GitHubError::ConcurrentModification`] instead of being overwritten.

use crate::client::GitDatabase;
use crate::error::GitHubError;
use crate::object_id::ObjectId;
use crate::types::TreeEntry;

pub const DEFAULT_BRANCH: &str = "data";
pub const DEFAULT_PATH: &str = "games.csv";
pub const DEFAULT_MESSAGE: &str = "Update data";

/// Commit and tree the branch pointed at when publishing started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTip {
    pub commit: ObjectId,
    pub tree: ObjectId,
}

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The branch already held identical content.
    Unchanged { commit: ObjectId },
    /// A new commit was created and the branch fast-forwarded to it.
    Committed { commit: ObjectId, parent: ObjectId },
}

impl PublishOutcome {
    /// The commit the branch points at after publishing.
    pub fn commit(&self) -> &ObjectId {
        match self {
            Self::Unchanged { commit } | Self::Committed { commit, .. } => commit,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

#[derive(Debug)]
enum PublishState {
    ReadRef,
    BuildTree { tip: BranchTip },
    CreateCommit { tip: BranchTip, tree: ObjectId },
    UpdateRef { tip: BranchTip, commit: ObjectId },
    Done(PublishOutcome),
}

/// Where and how to publish.
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub branch: String,
    pub path: String,
    pub message: String,
}

impl Default for PublishTarget {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            path: DEFAULT_PATH.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

pub struct Publisher<'a, G: GitDatabase + ?Sized> {
    git: &'a G,
    target: PublishTarget,
}

impl<'a, G: GitDatabase + ?Sized> Publisher<'a, G> {
    pub fn new(git: &'a G, target: PublishTarget) -> Self {
        Self { git, target }
    }

    /// Make `content` the sole file of the target branch.
    pub fn publish(&self, content: &str) -> Result<PublishOutcome, GitHubError> {
        let mut state = PublishState::ReadRef;
        loop {
            log::trace!("publish state: {state:?}");
            state = match state {
                PublishState::ReadRef => self.read_ref()?,
                PublishState::BuildTree { tip } => self.build_tree(tip, content)?,
                PublishState::CreateCommit { tip, tree } => self.create_commit(tip, tree)?,
                PublishState::UpdateRef { tip, commit } => self.update_ref(tip, commit)?,
                PublishState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn read_ref(&self) -> Result<PublishState, GitHubError> {
        let branch = &self.target.branch;
        let git_ref = self.git.get_ref(branch)?;
        if git_ref.object.kind != "commit" {
            return Err(GitHubError::UnexpectedObjectType {
                expected: "commit".to_string(),
                found: git_ref.object.kind,
            });
        }

        let commit = self.git.get_commit(&git_ref.object.sha)?;
        log::info!(
            "Branch '{branch}' is at {} (tree {})",
            commit.sha.short(),
            commit.tree.sha.short()
        );
        Ok(PublishState::BuildTree {
            tip: BranchTip {
                commit: git_ref.object.sha,
                tree: commit.tree.sha,
            },
        })
    }

    fn build_tree(&self, tip: BranchTip, content: &str) -> Result<PublishState, GitHubError> {
        let local = ObjectId::for_blob(content.as_bytes());
        let remote = self.git.create_blob(content)?;
        if remote != local {
            return Err(GitHubError::BlobMismatch {
                local: local.to_string(),
                remote: remote.to_string(),
            });
        }
        log::debug!("Uploaded {} as blob {}", self.target.path, remote.short());

        let tree = self
            .git
            .create_tree(&[TreeEntry::file(self.target.path.as_str(), remote)])?;

        if tree == tip.tree {
            log::info!("No changes to {}; branch left at {}", self.target.path, tip.commit.short());
            return Ok(PublishState::Done(PublishOutcome::Unchanged { commit: tip.commit }));
        }
        Ok(PublishState::CreateCommit { tip, tree })
    }

    fn create_commit(&self, tip: BranchTip, tree: ObjectId) -> Result<PublishState, GitHubError> {
        let commit = self.git.create_commit(
            &self.target.message,
            &tree,
            std::slice::from_ref(&tip.commit),
        )?;
        log::debug!("Created commit {} on {}", commit.short(), tip.commit.short());
        Ok(PublishState::UpdateRef { tip, commit })
    }

    fn update_ref(&self, tip: BranchTip, commit: ObjectId) -> Result<PublishState, GitHubError> {
        let branch = &self.target.branch;
        let updated = self.git.update_ref(branch, &commit, false)?;
        if updated.object.sha != commit {
            return Err(GitHubError::conflict(branch.as_str()));
        }
        log::info!("Updated '{branch}' {} -> {}", tip.commit.short(), commit.short());
        Ok(PublishState::Done(PublishOutcome::Committed {
            commit,
            parent: tip.commit,
        }))
    }
}

/// Publish `content` to `target` on `git`.
pub fn publish<G: GitDatabase + ?Sized>(
    git: &G,
    target: PublishTarget,
    content: &str,
) -> Result<PublishOutcome, GitHubError> {
    Publisher::new(git, target).publish(content)
}
