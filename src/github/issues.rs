//! Merged pull request queries used to assemble release notes.

use crate::error::{GhError, Result};
use crate::github::RepoClient;
use crate::github::types::{Issue, Milestone, PullRequest};

/// Queries over merged pull requests.
pub trait MergedPrOps {
    /// Merged pull requests in the milestone titled `milestone`.
    fn merged_prs_for_milestone(&self, milestone: &str) -> Result<Vec<Issue>>;

    /// Merged pull requests carrying every label in `labels`.
    fn merged_prs_for_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<Issue>>;

    /// The merge commit of `pr`, or `None` if it is not a merged pull request.
    fn commit_id_for_merged_pr(&self, pr: &Issue) -> Result<Option<String>>;
}

impl MergedPrOps for RepoClient {
    fn merged_prs_for_milestone(&self, milestone: &str) -> Result<Vec<Issue>> {
        let found = self.find_milestone(milestone)?;
        let endpoint = self.endpoint(&format!("/issues?milestone={}&state=closed", found.number));
        let issues: Vec<Issue> = self.client.get_paginated(&endpoint)?;

        let merged = filter_milestone(issues, milestone);
        tracing::info!(
            repo = %self.full_name(),
            milestone,
            count = merged.len(),
            "found merged PRs for milestone"
        );
        Ok(merged)
    }

    fn merged_prs_for_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<Issue>> {
        let mut endpoint = self.endpoint("/issues?state=closed");
        // The API splits `labels=` on commas; labels containing one are
        // matched by `filter_labels` only.
        let server_side: Vec<&str> = labels
            .iter()
            .map(|l| l.as_ref())
            .filter(|l| !l.contains(','))
            .collect();
        if !server_side.is_empty() {
            endpoint.push_str("&labels=");
            endpoint.push_str(&urlencoding::encode(&server_side.join(",")));
        }
        let issues: Vec<Issue> = self.client.get_paginated(&endpoint)?;

        let merged = filter_labels(issues, labels);
        tracing::info!(
            repo = %self.full_name(),
            labels = labels.len(),
            count = merged.len(),
            "found merged PRs for labels"
        );
        Ok(merged)
    }

    fn commit_id_for_merged_pr(&self, pr: &Issue) -> Result<Option<String>> {
        if !pr.is_pull_request() {
            return Ok(None);
        }
        let full: PullRequest = self
            .client
            .get(&self.endpoint(&format!("/pulls/{}", pr.number)))?;
        if !full.merged {
            tracing::debug!(number = pr.number, "pull request is not merged");
            return Ok(None);
        }
        Ok(full.merge_commit_sha)
    }
}

impl RepoClient {
    /// Fetch a single issue or pull request by number.
    pub fn issue(&self, number: u64) -> Result<Issue> {
        self.client.get(&self.endpoint(&format!("/issues/{}", number)))
    }

    /// Look up a milestone by title, in any state.
    pub fn find_milestone(&self, title: &str) -> Result<Milestone> {
        let milestones: Vec<Milestone> = self
            .client
            .get_paginated(&self.endpoint("/milestones?state=all"))?;
        milestones
            .into_iter()
            .find(|m| m.title == title)
            .ok_or_else(|| GhError::NotFound {
                resource: format!("milestone '{}' in {}", title, self.full_name()),
            })
    }
}

/// Keep merged pull requests whose milestone is titled `milestone`.
pub fn filter_milestone(issues: Vec<Issue>, milestone: &str) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|i| i.is_merged_pr() && i.milestone_title() == Some(milestone))
        .collect()
}

/// Keep merged pull requests that carry every label in `labels`.
pub fn filter_labels<S: AsRef<str>>(issues: Vec<Issue>, labels: &[S]) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|i| i.is_merged_pr() && i.has_all_labels(labels))
        .collect()
}
