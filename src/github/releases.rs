//! Release creation.

use crate::error::{GhError, Result};
use crate::github::RepoClient;
use crate::github::types::{CreateRelease, Release};

/// Release operations.
pub trait ReleaseOps {
    /// Create a draft release tagged `tag` on `target_branch`.
    ///
    /// Returns the HTML URL of the draft.
    fn new_draft_release(
        &self,
        tag: &str,
        target_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<String>;
}

impl ReleaseOps for RepoClient {
    fn new_draft_release(
        &self,
        tag: &str,
        target_branch: &str,
        title: &str,
        body: &str,
    ) -> Result<String> {
        if tag.is_empty() {
            return Err(GhError::InvalidConfig("release tag is required".into()));
        }

        let request = CreateRelease {
            tag_name: tag.to_string(),
            target_commitish: target_branch.to_string(),
            name: title.to_string(),
            body: body.to_string(),
            draft: true,
        };

        let release: Release = self
            .client
            .post(&self.endpoint("/releases"), &request)
            .map_err(|e| GhError::Release {
                message: format!("{} on {}: {}", tag, target_branch, e),
            })?;

        tracing::info!(
            id = release.id,
            tag = %release.tag_name,
            url = %release.html_url,
            "draft release created"
        );
        Ok(release.html_url)
    }
}
