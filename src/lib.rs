//! github-changelog - Generate a changelog from the pull requests merged since the last release.
//!
//! # Overview
//!
//! The newest tag of a GitHub repository is compared against the head of a
//! branch. Commits in that range that came from merged or squash-merged pull
//! requests become changelog lines, optionally rewritten by a `CHANGELOG:` line
//! in the pull request body. A `breaking` label marks the release as major.
//! Everything is read from the GitHub API; no local clone is needed.

pub mod changelog;
pub mod commit;
pub mod error;
pub mod github;

// Re-export commonly used types
pub use changelog::{ChangelogOptions, ExtendedPullRequest, ReleaseType, generate_changelog};
pub use commit::PullRequest;
pub use error::{GitHubError, PullRequestError};
pub use github::{GitHubConfig, PullRequestDetails};
