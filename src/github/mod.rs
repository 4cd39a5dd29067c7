//! GitHub API integration for release automation.
//!
//! [`GitHubClient`] is the authenticated transport. [`RepoClient`] scopes it
//! to one repository and carries the release helpers:
//! - Collect merged pull requests by milestone or label
//! - Resolve the merge commit of a pull request
//! - Create a branch from the default branch head
//! - Open pull requests and draft releases
//! - Look up the authenticated account and organization members
//!
//! # Example
//!
//! ```rust,no_run
//! use ghclient::github::{GitHubClient, MergedPrOps, RepoClient};
//!
//! let client = GitHubClient::new("ghp_your_token_here")?;
//! let repo = RepoClient::new(client, "grpc", "grpc-go")?;
//!
//! for pr in repo.merged_prs_for_milestone("1.60 Release")? {
//!     println!("#{}: {}", pr.number, pr.title);
//! }
//! # Ok::<(), ghclient::error::GhError>(())
//! ```

mod client;
mod issues;
mod orgs;
mod pulls;
mod refs;
mod releases;
mod repo;
pub mod types;
mod users;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use issues::{MergedPrOps, filter_labels, filter_milestone};
pub use orgs::OrgOps;
pub use pulls::{PullRequestOps, head_ref};
pub use refs::BranchOps;
pub use releases::ReleaseOps;
pub use repo::RepoClient;
pub use types::{Issue, Label, Milestone, PullRequest, Reference, Release, User, UserEmail};
pub use users::UserOps;
