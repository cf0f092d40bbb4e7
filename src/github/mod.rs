//! GitHub pull request publishing
//!
//! Creates pull requests against the GitHub REST API. Defined as a
//! capability trait so the pipeline can be tested without network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback base branch when the CI ref is unavailable
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Default GitHub REST endpoint; overridable for GHES via GITHUB_API_URL
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const REF_HEADS_PREFIX: &str = "refs/heads/";

/// Error from pull request publishing
#[derive(Debug, Error)]
pub enum PublishError {
    /// No authorization token was available; the API call is never attempted
    #[error("GITHUB_TOKEN is required to create a pull request")]
    MissingToken,

    /// GITHUB_REPOSITORY was missing or not an `owner/repo` pair
    #[error("Invalid repository slug: {0}")]
    InvalidRepository(String),

    /// Transport-level failure talking to the API
    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// An `owner/repo` pair parsed from GITHUB_REPOSITORY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    /// Parse an `owner/repo` slug.
    pub fn parse(slug: &str) -> Result<Self, PublishError> {
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok(RepoSlug {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(PublishError::InvalidRepository(slug.to_string())),
        }
    }
}

/// Parameters for creating a pull request.
///
/// Serializes directly into the `POST /repos/{owner}/{repo}/pulls` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    /// Head branch carrying the changes
    pub head: String,
    /// Base branch the PR targets
    pub base: String,
}

/// Identifiers of a created pull request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequestRecord {
    /// Browser URL of the PR
    #[serde(rename = "html_url")]
    pub url: String,

    /// PR number
    pub number: u64,
}

/// Capability interface for creating pull requests.
#[async_trait]
pub trait PullRequestPublisher: Send + Sync {
    async fn create_pull_request(
        &self,
        repo: &RepoSlug,
        request: &NewPullRequest,
    ) -> Result<PullRequestRecord, PublishError>;
}

/// Publisher backed by the GitHub REST API.
pub struct GithubPublisher {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl GithubPublisher {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        GithubPublisher {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl PullRequestPublisher for GithubPublisher {
    async fn create_pull_request(
        &self,
        repo: &RepoSlug,
        request: &NewPullRequest,
    ) -> Result<PullRequestRecord, PublishError> {
        if self.token.is_empty() {
            return Err(PublishError::MissingToken);
        }

        let url = format!("{}/repos/{}/{}/pulls", self.api_base, repo.owner, repo.repo);
        tracing::debug!(url = %url, head = %request.head, base = %request.base, "Creating pull request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "gt-sync")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PublishError::Api {
                status: status.as_u16(),
                message: truncate_message(&message),
            });
        }

        Ok(response.json::<PullRequestRecord>().await?)
    }
}

/// Resolve the PR base branch from the CI-provided ref.
///
/// Strips the `refs/heads/` prefix when present, otherwise falls back to
/// `main`. Best-effort: the fallback is not verified against the repository's
/// actual default branch, so runs outside the expected CI ref context may
/// target the wrong base.
pub fn resolve_base_branch(github_ref: Option<&str>) -> String {
    match github_ref {
        Some(r) if !r.is_empty() => r.strip_prefix(REF_HEADS_PREFIX).unwrap_or(r).to_string(),
        _ => DEFAULT_BASE_BRANCH.to_string(),
    }
}

fn truncate_message(message: &str) -> String {
    const MAX_LEN: usize = 512;
    let trimmed = message.trim();
    if trimmed.len() <= MAX_LEN {
        trimmed.to_string()
    } else {
        let mut end = MAX_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}
