use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use gametrack_github::*;
use sha1::{Digest, Sha1};

fn hash(bytes: &[u8]) -> ObjectId {
    format!("{:x}", Sha1::digest(bytes)).parse().unwrap()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Calls {
    get_ref: usize,
    get_commit: usize,
    create_blob: usize,
    create_tree: usize,
    create_commit: usize,
    update_ref: usize,
}

#[derive(Default)]
struct Objects {
    refs: HashMap<String, ObjectId>,
    trees: HashMap<ObjectId, Vec<TreeEntry>>,
    commits: HashMap<ObjectId, (ObjectId, Vec<ObjectId>)>,
    commit_counter: usize,
}

/// In-memory repository with GitHub's fast-forward rule on ref updates.
#[derive(Default)]
struct MemoryRepo {
    objects: RefCell<Objects>,
    calls: Cell<Calls>,
    /// Another writer advances the branch right after we create our commit.
    interloper: Cell<bool>,
    /// Return this id from `create_blob` instead of the real one.
    blob_override: RefCell<Option<ObjectId>>,
}

impl MemoryRepo {
    fn with_branch(branch: &str, content: &str) -> Self {
        let repo = Self::default();
        let blob = ObjectId::for_blob(content.as_bytes());
        let tree = repo.store_tree(&[TreeEntry::file(DEFAULT_PATH, blob)]);
        let commit = repo.store_commit(&tree, &[]);
        repo.objects
            .borrow_mut()
            .refs
            .insert(branch.to_string(), commit);
        repo
    }

    fn store_tree(&self, entries: &[TreeEntry]) -> ObjectId {
        let mut listing = String::from("tree\n");
        for e in entries {
            listing.push_str(&format!("{} {} {} {}\n", e.mode, e.kind, e.sha, e.path));
        }
        let id = hash(listing.as_bytes());
        self.objects
            .borrow_mut()
            .trees
            .insert(id.clone(), entries.to_vec());
        id
    }

    fn store_commit(&self, tree: &ObjectId, parents: &[ObjectId]) -> ObjectId {
        let mut objects = self.objects.borrow_mut();
        objects.commit_counter += 1;
        let id = hash(format!("commit {} {tree} {parents:?}", objects.commit_counter).as_bytes());
        objects
            .commits
            .insert(id.clone(), (tree.clone(), parents.to_vec()));
        id
    }

    fn head(&self, branch: &str) -> ObjectId {
        self.objects.borrow().refs[branch].clone()
    }

    fn tree_of(&self, commit: &ObjectId) -> Vec<TreeEntry> {
        let objects = self.objects.borrow();
        let tree = &objects.commits[commit].0;
        objects.trees[tree].clone()
    }

    fn is_ancestor(&self, ancestor: &ObjectId, of: &ObjectId) -> bool {
        if ancestor == of {
            return true;
        }
        let parents = self.objects.borrow().commits[of].1.clone();
        parents.iter().any(|p| self.is_ancestor(ancestor, p))
    }

    fn count(&self, f: impl FnOnce(&mut Calls)) {
        let mut calls = self.calls.get();
        f(&mut calls);
        self.calls.set(calls);
    }
}

impl GitDatabase for MemoryRepo {
    fn get_ref(&self, branch: &str) -> Result<GitRef, GitHubError> {
        self.count(|c| c.get_ref += 1);
        let sha = self
            .objects
            .borrow()
            .refs
            .get(branch)
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(format!("ref heads/{branch}")))?;
        Ok(GitRef {
            name: format!("refs/heads/{branch}"),
            object: RefTarget {
                sha,
                kind: "commit".to_string(),
            },
        })
    }

    fn get_commit(&self, sha: &ObjectId) -> Result<GitCommit, GitHubError> {
        self.count(|c| c.get_commit += 1);
        let objects = self.objects.borrow();
        let (tree, parents) = objects
            .commits
            .get(sha)
            .ok_or_else(|| GitHubError::NotFound(format!("commit {sha}")))?;
        Ok(GitCommit {
            sha: sha.clone(),
            tree: ObjectRef { sha: tree.clone() },
            parents: parents
                .iter()
                .map(|p| ObjectRef { sha: p.clone() })
                .collect(),
        })
    }

    fn create_blob(&self, content: &str) -> Result<ObjectId, GitHubError> {
        self.count(|c| c.create_blob += 1);
        Ok(self
            .blob_override
            .borrow()
            .clone()
            .unwrap_or_else(|| ObjectId::for_blob(content.as_bytes())))
    }

    fn create_tree(&self, entries: &[TreeEntry]) -> Result<ObjectId, GitHubError> {
        self.count(|c| c.create_tree += 1);
        Ok(self.store_tree(entries))
    }

    fn create_commit(
        &self,
        _message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> Result<ObjectId, GitHubError> {
        self.count(|c| c.create_commit += 1);
        let commit = self.store_commit(tree, parents);

        if self.interloper.get() {
            let (branch, current) = {
                let objects = self.objects.borrow();
                let (branch, current) = objects.refs.iter().next().unwrap();
                (branch.clone(), current.clone())
            };
            let other_tree = self.store_tree(&[]);
            let other = self.store_commit(&other_tree, &[current]);
            self.objects.borrow_mut().refs.insert(branch, other);
        }
        Ok(commit)
    }

    fn update_ref(
        &self,
        branch: &str,
        sha: &ObjectId,
        force: bool,
    ) -> Result<GitRef, GitHubError> {
        self.count(|c| c.update_ref += 1);
        let current = self.head(branch);
        if !force && !self.is_ancestor(&current, sha) {
            return Err(GitHubError::conflict(branch));
        }
        self.objects
            .borrow_mut()
            .refs
            .insert(branch.to_string(), sha.clone());
        Ok(GitRef {
            name: format!("refs/heads/{branch}"),
            object: RefTarget {
                sha: sha.clone(),
                kind: "commit".to_string(),
            },
        })
    }
}

const OLD: &str = "igdb_id,title\r\n1,Tetris\r\n";
const NEW: &str = "igdb_id,title\r\n1,Tetris\r\n2,Doom\r\n";

#[test]
fn publishes_new_content_as_fast_forward() {
    let repo = MemoryRepo::with_branch("data", OLD);
    let before = repo.head("data");

    let outcome = publish(&repo, PublishTarget::default(), NEW).unwrap();

    let PublishOutcome::Committed { commit, parent } = &outcome else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert_eq!(parent, &before);
    assert_eq!(&repo.head("data"), commit);
    assert_eq!(outcome.commit(), commit);
    assert!(outcome.is_changed());

    let tree = repo.tree_of(commit);
    assert_eq!(tree, vec![TreeEntry::file("games.csv", ObjectId::for_blob(NEW.as_bytes()))]);
    assert_eq!(tree[0].mode, "100644");

    let calls = repo.calls.get();
    assert_eq!(calls.create_commit, 1);
    assert_eq!(calls.update_ref, 1);
}

#[test]
fn unchanged_content_creates_no_commit() {
    let repo = MemoryRepo::with_branch("data", OLD);
    let before = repo.head("data");

    let outcome = publish(&repo, PublishTarget::default(), OLD).unwrap();

    assert_eq!(outcome, PublishOutcome::Unchanged { commit: before.clone() });
    assert_eq!(repo.head("data"), before);
    let calls = repo.calls.get();
    assert_eq!(calls.create_tree, 1);
    assert_eq!(calls.create_commit, 0);
    assert_eq!(calls.update_ref, 0);
}

#[test]
fn publishing_twice_is_idempotent() {
    let repo = MemoryRepo::with_branch("data", OLD);

    let first = publish(&repo, PublishTarget::default(), NEW).unwrap();
    let after_first = repo.calls.get();
    let second = publish(&repo, PublishTarget::default(), NEW).unwrap();
    let after_second = repo.calls.get();

    assert!(first.is_changed());
    assert_eq!(
        second,
        PublishOutcome::Unchanged {
            commit: first.commit().clone()
        }
    );
    assert_eq!(after_second.create_commit, after_first.create_commit);
    assert_eq!(after_second.update_ref, after_first.update_ref);
}

#[test]
fn concurrent_writer_is_not_overwritten() {
    let repo = MemoryRepo::with_branch("data", OLD);
    repo.interloper.set(true);

    let err = publish(&repo, PublishTarget::default(), NEW).unwrap_err();

    assert!(
        matches!(&err, GitHubError::ConcurrentModification { branch } if branch == "data"),
        "{err}"
    );
    // The other writer's commit is still the tip, with its own (empty) tree.
    assert!(repo.tree_of(&repo.head("data")).is_empty());
    // No retry.
    assert_eq!(repo.calls.get().update_ref, 1);
    assert_eq!(repo.calls.get().get_ref, 1);
}

#[test]
fn blob_id_mismatch_is_fatal() {
    let repo = MemoryRepo::with_branch("data", OLD);
    *repo.blob_override.borrow_mut() = Some(ObjectId::for_blob(b"something else"));
    let before = repo.head("data");

    let err = publish(&repo, PublishTarget::default(), NEW).unwrap_err();

    match err {
        GitHubError::BlobMismatch { local, remote } => {
            assert_eq!(local, ObjectId::for_blob(NEW.as_bytes()).to_string());
            assert_eq!(remote, ObjectId::for_blob(b"something else").to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.head("data"), before);
    assert_eq!(repo.calls.get().create_tree, 0);
}

#[test]
fn missing_branch_is_not_found() {
    let repo = MemoryRepo::with_branch("main", OLD);
    let err = publish(&repo, PublishTarget::default(), NEW).unwrap_err();
    assert!(matches!(err, GitHubError::NotFound(_)), "{err}");
}

#[test]
fn custom_target_path_and_branch() {
    let repo = MemoryRepo::with_branch("exports", OLD);
    let target = PublishTarget {
        branch: "exports".to_string(),
        path: "library.csv".to_string(),
        message: "Nightly export".to_string(),
    };

    let outcome = publish(&repo, target, OLD).unwrap();

    // Same bytes under a different path is a different tree.
    assert!(outcome.is_changed());
    assert_eq!(repo.tree_of(outcome.commit())[0].path, "library.csv");
}
