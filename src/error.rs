//! Error types for the GitHub client.

use thiserror::Error;

/// The main error type for GitHub operations.
#[derive(Error, Debug)]
pub enum GhError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GITHUB_TOKEN environment variable not set")]
    MissingToken,

    #[error("Branch operation failed: {message}")]
    Branch { message: String },

    #[error("Pull request creation failed: {message}")]
    PullRequest { message: String },

    #[error("Release creation failed: {message}")]
    Release { message: String },

    #[error("No email address found for the authenticated account")]
    NoEmail,

    #[error("None of the {count} email addresses is marked primary")]
    NoPrimaryEmail { count: usize },

    #[error("Listing {endpoint} still had more results after {pages} pages")]
    Truncated { endpoint: String, pages: usize },
}

impl GhError {
    /// Returns true if the API answered 404.
    pub fn is_not_found(&self) -> bool {
        match self {
            GhError::NotFound { .. } => true,
            GhError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}

/// A specialized Result type for GitHub operations.
pub type Result<T> = std::result::Result<T, GhError>;
