//! Organization lookups.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::Result;
use crate::github::{GitHubClient, RepoClient};

/// Organization operations.
pub trait OrgOps {
    /// Logins of every member of `org` visible to the token.
    fn org_members(&self, org: &str) -> Result<HashSet<String>>;
}

impl OrgOps for GitHubClient {
    fn org_members(&self, org: &str) -> Result<HashSet<String>> {
        #[derive(Deserialize)]
        struct Member {
            login: String,
        }

        let endpoint = format!("/orgs/{}/members", urlencoding::encode(org));
        let members: Vec<Member> = self.get_paginated(&endpoint)?;
        tracing::debug!(org, count = members.len(), "fetched org members");

        Ok(members.into_iter().map(|m| m.login).collect())
    }
}

impl OrgOps for RepoClient {
    fn org_members(&self, org: &str) -> Result<HashSet<String>> {
        self.client.org_members(org)
    }
}
