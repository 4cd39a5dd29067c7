//! # ghclient
//!
//! Repository-scoped helpers over the GitHub REST API for release tooling.
//!
//! Every call is a blocking request/response against the API; the crate keeps
//! no state beyond the owner, repository name and authenticated transport.
//! Progress is reported through `tracing` events, so callers decide where the
//! logs go by installing a subscriber.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ghclient::prelude::*;
//!
//! let repo = RepoClient::new(GitHubClient::from_env()?, "grpc", "grpc-go")?;
//!
//! repo.new_branch_from_head("release-1.60")?;
//! let url = repo.new_draft_release("v1.60.0", "release-1.60", "Release 1.60.0", "notes")?;
//! println!("draft: {}", url);
//! # Ok::<(), ghclient::error::GhError>(())
//! ```

pub mod error;
pub mod github;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{GhError, Result};
    pub use crate::github::{
        BranchOps, GitHubClient, Issue, MergedPrOps, OrgOps, PullRequestOps, ReleaseOps,
        RepoClient, UserOps,
    };
}

pub use prelude::*;
