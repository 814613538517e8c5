//! GitHub API access.

pub mod auth;
pub mod client;
pub mod config;

pub use auth::resolve_token;
pub use client::{
    ApiResponse, Commit, GitHubClient, GitHubTransport, OctocrabTransport, PullRequestDetails, Tag,
};
pub use config::{GitHubConfig, PUBLIC_GITHUB_API_URL, PUBLIC_GITHUB_URL};

#[cfg(test)]
pub use client::MockGitHubTransport;
