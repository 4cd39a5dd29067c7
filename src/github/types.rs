//! GitHub resource models.
//!
//! Only the fields the client reads are modelled; everything else in the
//! API payloads is ignored by serde.

use serde::{Deserialize, Serialize};

/// An issue or pull request as returned by the issues API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub html_url: String,
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub pull_request: Option<PullRequestLinks>,
}

impl Issue {
    /// Whether this issue is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Whether this issue is a pull request that has been merged.
    pub fn is_merged_pr(&self) -> bool {
        self.pull_request
            .as_ref()
            .is_some_and(|pr| pr.merged_at.is_some())
    }

    /// Whether the issue carries a label with the given name.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Whether the issue carries every label in `names`.
    pub fn has_all_labels<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.has_label(n.as_ref()))
    }

    /// The title of the milestone this issue belongs to, if any.
    pub fn milestone_title(&self) -> Option<&str> {
        self.milestone.as_ref().map(|m| m.title.as_str())
    }
}

/// The pull request block embedded in an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestLinks {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html_url: String,
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
}

/// A pull request as returned by the pulls API.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub merged: bool,
    pub merge_commit_sha: Option<String>,
}

/// A git reference such as `refs/heads/main`.
#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: GitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEmail {
    pub email: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub default_branch: String,
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
    pub maintainer_can_modify: bool,
}

/// Request body for creating a release.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
}

/// Request body for creating a git reference.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReference {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}
