//! Pull request creation.

use crate::error::{GhError, Result};
use crate::github::RepoClient;
use crate::github::types::{CreatePullRequest, PullRequest};

/// Pull request operations.
pub trait PullRequestOps {
    /// Open a pull request from `head_user:head_branch` into `base`.
    ///
    /// Returns the HTML URL of the new pull request.
    fn new_pull_request(
        &self,
        head_user: &str,
        head_branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String>;
}

impl PullRequestOps for RepoClient {
    fn new_pull_request(
        &self,
        head_user: &str,
        head_branch: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<String> {
        if title.is_empty() {
            return Err(GhError::InvalidConfig(
                "Pull request title is required".into(),
            ));
        }

        let request = CreatePullRequest {
            title: title.to_string(),
            head: head_ref(head_user, head_branch),
            base: base.to_string(),
            body: body.to_string(),
            maintainer_can_modify: true,
        };

        let pr: PullRequest = self
            .client
            .post(&self.endpoint("/pulls"), &request)
            .map_err(|e| match e {
                GhError::Api { status: 422, message } => GhError::PullRequest {
                    message: format!(
                        "branch may not exist or PR already exists for {}: {}",
                        request.head, message
                    ),
                },
                other => other,
            })?;

        tracing::info!(number = pr.number, url = %pr.html_url, "PR created");
        Ok(pr.html_url)
    }
}

/// The `user:branch` form the pulls API expects for cross-fork heads.
pub fn head_ref(head_user: &str, head_branch: &str) -> String {
    format!("{}:{}", head_user, head_branch)
}
