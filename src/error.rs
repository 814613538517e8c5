//! Error types for github-changelog modules using thiserror.

use thiserror::Error;

/// Errors from GitHub API operations.
///
/// Every variant is terminal: a single failed call aborts changelog generation.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub returned {status} for {url}: {body}")]
    NotFound {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Commit range {base}...{head} not found: {detail}")]
    RangeNotFound {
        base: String,
        head: String,
        detail: String,
    },

    #[error("No release tags found in {owner}/{repo}")]
    NoReleaseFound { owner: String, repo: String },

    #[error("Tag '{tag}' points to an unsupported object type '{object_type}'")]
    UnexpectedObjectType { tag: String, object_type: String },

    #[error("Failed to parse GitHub response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GitHub request failed: {0}")]
    Request(#[source] Box<octocrab::Error>),

    #[error("Invalid request header '{0}'")]
    InvalidHeader(String),
}

/// Errors from pull request extraction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PullRequestError {
    #[error("Commit message does not reference a pull request: {subject}")]
    NotAPullRequest { subject: String },
}
