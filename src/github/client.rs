//! GitHub API client.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GhError, Result};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 100;

/// Authenticated transport for the GitHub REST API.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    pub(crate) base_url: String,
    pub(crate) client: Client,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Create a client for GitHub Enterprise (or any compatible server) with a
    /// custom base URL.
    pub fn with_base_url(token: impl AsRef<str>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(token.as_ref())?)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::from_http_client(client, base_url))
    }

    /// Wrap a transport the caller already configured (auth, proxies, TLS).
    pub fn from_http_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            base_url: url,
            client,
        }
    }

    /// Create a client from `GITHUB_TOKEN` and, when set, `GITHUB_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("GITHUB_TOKEN").ok(),
            std::env::var("GITHUB_API_URL").ok(),
        )
    }

    fn from_vars(token: Option<String>, base_url: Option<String>) -> Result<Self> {
        let token = token.ok_or(GhError::MissingToken)?;
        Self::with_base_url(token, base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make a GET request to the GitHub API.
    pub(crate) fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send()?;
        parse_json(check(response)?)
    }

    /// Make a GET request, mapping a 404 to `None`.
    pub(crate) fn get_optional<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_json(check(response)?).map(Some)
    }

    /// GET every page of a list endpoint.
    ///
    /// Stops at the first page shorter than `per_page`. A listing that is
    /// still full after `MAX_PAGES` pages fails with [`GhError::Truncated`].
    pub(crate) fn get_paginated<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        let mut all = Vec::new();

        for page in 1..=MAX_PAGES {
            let items: Vec<T> =
                self.get(&format!("{endpoint}{sep}per_page={PER_PAGE}&page={page}"))?;
            let len = items.len();
            all.extend(items);
            if len < PER_PAGE {
                return Ok(all);
            }
        }

        tracing::warn!(endpoint, pages = MAX_PAGES, "page limit reached");
        Err(GhError::Truncated {
            endpoint: endpoint.to_string(),
            pages: MAX_PAGES,
        })
    }

    /// Make a POST request to the GitHub API.
    pub(crate) fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send()?;
        parse_json(check(response)?)
    }
}

/// Headers every request carries.
fn default_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| GhError::InvalidConfig("token contains invalid header characters".into()))?;
    headers.insert(AUTHORIZATION, auth);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("ghclient/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static("2022-11-28"),
    );
    Ok(headers)
}

/// Turn a non-success response into `GhError::Api`.
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(GhError::Api {
        status: status.as_u16(),
        message: api_message(&body),
    })
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes()?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// raw text.
fn api_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) => e.message,
        Err(_) => body.trim().to_string(),
    }
}
