//! Branch creation through the git refs API.

use crate::error::{GhError, Result};
use crate::github::RepoClient;
use crate::github::repo::encode_path;
use crate::github::types::{CreateReference, Reference};

/// Branch operations.
pub trait BranchOps {
    /// Look up `refs/heads/{branch}`, returning `None` if it does not exist.
    fn branch_ref(&self, branch: &str) -> Result<Option<Reference>>;

    /// Create `branch` at the current head of the default branch.
    ///
    /// Does nothing if the branch already exists.
    fn new_branch_from_head(&self, branch: &str) -> Result<()>;
}

impl BranchOps for RepoClient {
    fn branch_ref(&self, branch: &str) -> Result<Option<Reference>> {
        self.client
            .get_optional(&self.endpoint(&format!("/git/ref/heads/{}", encode_path(branch))))
    }

    fn new_branch_from_head(&self, branch: &str) -> Result<()> {
        if branch.trim().is_empty() {
            return Err(GhError::InvalidConfig("branch name is empty".into()));
        }
        tracing::info!(owner = self.owner(), repo = self.repo(), branch, "creating branch");

        if let Some(existing) = self.branch_ref(branch)? {
            tracing::info!(
                branch,
                sha = %existing.object.sha,
                "ref already exists"
            );
            return Ok(());
        }

        let base = self.default_branch().map_err(|e| GhError::Branch {
            message: format!("failed to get default branch head: {}", e),
        })?;
        let head = self
            .branch_ref(&base)
            .and_then(|r| {
                r.ok_or_else(|| GhError::NotFound {
                    resource: format!("refs/heads/{}", base),
                })
            })
            .map_err(|e| GhError::Branch {
                message: format!("failed to get {} head: {}", base, e),
            })?;
        tracing::info!(base = %base, sha = %head.object.sha, "hash for HEAD");

        let created: Result<Reference> = self.client.post(
            &self.endpoint("/git/refs"),
            &CreateReference {
                ref_name: format!("refs/heads/{}", branch),
                sha: head.object.sha,
            },
        );

        match created {
            Ok(created) => {
                tracing::info!(
                    ref_name = %created.ref_name,
                    sha = %created.object.sha,
                    "new ref created"
                );
                Ok(())
            }
            // Created by someone else since the existence check.
            Err(GhError::Api { status: 422, message }) if message.contains("already exists") => {
                tracing::info!(branch, "ref already exists");
                Ok(())
            }
            Err(e) => Err(GhError::Branch {
                message: format!("failed to create ref: {}", e),
            }),
        }
    }
}
