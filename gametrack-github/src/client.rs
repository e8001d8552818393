use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::GitHubError;
use crate::object_id::ObjectId;
use crate::types::{
    ApiMessage, CreateBlob, CreateCommit, CreateTree, CreatedObject, GitCommit, GitRef,
    TreeEntry, UpdateRef,
};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gametrack-data/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The low-level git object operations the publisher is built from.
pub trait GitDatabase {
    /// Read `refs/heads/{branch}`.
    fn get_ref(&self, branch: &str) -> Result<GitRef, GitHubError>;

    fn get_commit(&self, sha: &ObjectId) -> Result<GitCommit, GitHubError>;

    /// Upload a UTF-8 blob and return the id the server assigned.
    fn create_blob(&self, content: &str) -> Result<ObjectId, GitHubError>;

    /// Create a tree from scratch (no base tree).
    fn create_tree(&self, entries: &[TreeEntry]) -> Result<ObjectId, GitHubError>;

    fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> Result<ObjectId, GitHubError>;

    /// Point `refs/heads/{branch}` at `sha`. Without `force` the server
    /// only accepts a fast-forward; anything else is
    /// [`GitHubError::ConcurrentModification`].
    fn update_ref(
        &self,
        branch: &str,
        sha: &ObjectId,
        force: bool,
    ) -> Result<GitRef, GitHubError>;
}

/// Blocking client for the GitHub Git Data API of one repository.
pub struct GitHubClient {
    http: Client,
    api_base: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// `repo` is `OWNER/NAME`.
    pub fn new(repo: &str, token: &str) -> Result<Self, GitHubError> {
        Self::with_api_base(DEFAULT_API_BASE, repo, token)
    }

    pub fn with_api_base(api_base: &str, repo: &str, token: &str) -> Result<Self, GitHubError> {
        validate_repo(repo)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        })
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/git/{}", self.api_base, self.repo, path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(&self.token)
    }

    /// Send a request and decode a successful JSON response.
    fn send<T: DeserializeOwned>(&self, what: &str, builder: RequestBuilder) -> Result<T, GitHubError> {
        let resp = self.request(builder).send()?;
        let status = resp.status();
        let text = resp.text()?;
        log::debug!("{what}: HTTP {}", status.as_u16());

        if !status.is_success() {
            return Err(status_error(what, status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl GitDatabase for GitHubClient {
    fn get_ref(&self, branch: &str) -> Result<GitRef, GitHubError> {
        let what = format!("ref heads/{branch}");
        self.send(&what, self.http.get(self.url(&format!("ref/heads/{branch}"))))
    }

    fn get_commit(&self, sha: &ObjectId) -> Result<GitCommit, GitHubError> {
        let what = format!("commit {sha}");
        self.send(&what, self.http.get(self.url(&format!("commits/{sha}"))))
    }

    fn create_blob(&self, content: &str) -> Result<ObjectId, GitHubError> {
        let body = CreateBlob {
            content,
            encoding: "utf-8",
        };
        let created: CreatedObject = self.send("create blob", self.http.post(self.url("blobs")).json(&body))?;
        Ok(created.sha)
    }

    fn create_tree(&self, entries: &[TreeEntry]) -> Result<ObjectId, GitHubError> {
        let body = CreateTree { tree: entries };
        let created: CreatedObject = self.send("create tree", self.http.post(self.url("trees")).json(&body))?;
        Ok(created.sha)
    }

    fn create_commit(
        &self,
        message: &str,
        tree: &ObjectId,
        parents: &[ObjectId],
    ) -> Result<ObjectId, GitHubError> {
        let body = CreateCommit {
            message,
            tree,
            parents,
        };
        let created: CreatedObject =
            self.send("create commit", self.http.post(self.url("commits")).json(&body))?;
        Ok(created.sha)
    }

    fn update_ref(
        &self,
        branch: &str,
        sha: &ObjectId,
        force: bool,
    ) -> Result<GitRef, GitHubError> {
        let body = UpdateRef { sha, force };
        let builder = self
            .http
            .patch(self.url(&format!("refs/heads/{branch}")))
            .json(&body);
        match self.send(&format!("update heads/{branch}"), builder) {
            Err(GitHubError::Status { status: 409 | 422, message }) => {
                log::debug!("Ref update rejected: {message}");
                Err(GitHubError::conflict(branch))
            }
            other => other,
        }
    }
}

fn status_error(what: &str, status: StatusCode, body: &str) -> GitHubError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GitHubError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => GitHubError::NotFound(what.to_string()),
        _ => GitHubError::status(status.as_u16(), message),
    }
}

fn validate_repo(repo: &str) -> Result<(), GitHubError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => Err(GitHubError::InvalidRepository(repo.to_string())),
    }
}
