//! A client scoped to one repository.

use crate::error::{GhError, Result};
use crate::github::GitHubClient;
use crate::github::types::Repository;

/// A GitHub client bound to a single `owner/repo`.
///
/// All repository operations ([`MergedPrOps`](crate::github::MergedPrOps),
/// [`BranchOps`](crate::github::BranchOps),
/// [`PullRequestOps`](crate::github::PullRequestOps),
/// [`ReleaseOps`](crate::github::ReleaseOps)) target this repository. Owner
/// and repository name are fixed for the lifetime of the client.
#[derive(Clone, Debug)]
pub struct RepoClient {
    owner: String,
    repo: String,
    pub(crate) client: GitHubClient,
}

impl RepoClient {
    /// Scope `client` to `owner/repo`.
    ///
    /// Both names must be non-empty.
    pub fn new(
        client: GitHubClient,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if owner.trim().is_empty() {
            return Err(GhError::InvalidConfig("repository owner is empty".into()));
        }
        if repo.trim().is_empty() {
            return Err(GhError::InvalidConfig("repository name is empty".into()));
        }
        Ok(Self {
            owner,
            repo,
            client,
        })
    }

    /// Parse an `owner/repo` slug.
    pub fn from_slug(client: GitHubClient, slug: &str) -> Result<Self> {
        match slug.split_once('/') {
            Some((owner, repo)) if !repo.contains('/') => Self::new(client, owner, repo),
            _ => Err(GhError::InvalidConfig(format!(
                "expected owner/repo, got '{}'",
                slug
            ))),
        }
    }

    /// The owner this client was built with.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name this client was built with.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Build a `/repos/{owner}/{repo}{path}` endpoint.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            path
        )
    }

    /// Fetch repository metadata.
    pub fn repository(&self) -> Result<Repository> {
        self.client.get(&self.endpoint(""))
    }

    /// Name of the repository's default branch.
    pub fn default_branch(&self) -> Result<String> {
        Ok(self.repository()?.default_branch)
    }
}

/// Percent-encode each segment of a slash-separated name (e.g. a branch).
pub(crate) fn encode_path(name: &str) -> String {
    name.split('/')
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
