//! Operations on the account that owns the token.

use crate::error::{GhError, Result};
use crate::github::types::{User, UserEmail};
use crate::github::{GitHubClient, RepoClient};

/// Authenticated-account lookups.
pub trait UserOps {
    /// Fetch the account the token belongs to (`GET /user`).
    fn authenticated_user(&self) -> Result<User>;

    /// List the email addresses of the authenticated account.
    fn emails(&self) -> Result<Vec<UserEmail>>;

    /// Login name of the authenticated account.
    fn login(&self) -> Result<String> {
        Ok(self.authenticated_user()?.login)
    }

    /// The primary email of the authenticated account.
    ///
    /// Fails with [`GhError::NoEmail`] when the account has no addresses and
    /// with [`GhError::NoPrimaryEmail`] when none is marked primary.
    fn primary_email(&self) -> Result<String> {
        select_primary(self.emails()?)
    }
}

impl UserOps for GitHubClient {
    fn authenticated_user(&self) -> Result<User> {
        self.get("/user")
    }

    fn emails(&self) -> Result<Vec<UserEmail>> {
        self.get_paginated("/user/emails")
    }
}

impl UserOps for RepoClient {
    fn authenticated_user(&self) -> Result<User> {
        self.client.authenticated_user()
    }

    fn emails(&self) -> Result<Vec<UserEmail>> {
        self.client.emails()
    }
}

fn select_primary(emails: Vec<UserEmail>) -> Result<String> {
    if emails.is_empty() {
        return Err(GhError::NoEmail);
    }
    let count = emails.len();
    match emails.into_iter().find(|e| e.primary) {
        Some(e) => Ok(e.email),
        None => {
            tracing::warn!(count, "no email address is marked primary");
            Err(GhError::NoPrimaryEmail { count })
        }
    }
}
