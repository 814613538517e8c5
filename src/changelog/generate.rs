//! Changelog assembly: find the pull requests merged since the last release.
//!
//! Pipeline:
//! 1. Resolve the newest tag (or `--previous-tag`) to its commit
//! 2. Fetch the branch history; its first commit is the head
//! 3. Fetch the compare range between the tag commit and the head
//! 4. Classify range commits as pull requests, oldest first, one entry per number
//! 5. Optionally fetch each pull request's body and labels
//!
//! Calls are made one at a time and the first failure aborts the run.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::commit::{PullRequest, extract_pr};
use crate::error::GitHubError;
use crate::github::client::head_sha;
use crate::github::{Commit, GitHubClient, GitHubConfig};

use super::format::{ExtendedPullRequest, ReleaseType, format_changes, render_changelog};

/// Options for a changelog run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct ChangelogOptions {
    /// Branch to release from; `None` uses the repository's default branch.
    pub branch: Option<String>,
    /// Tag to diff against instead of the newest tag.
    pub previous_tag: Option<String>,
    pub markdown: bool,
    /// Fetch PR bodies and labels for custom descriptions and breaking detection.
    pub fetch_details: bool,
}

impl Default for ChangelogOptions {
    fn default() -> Self {
        Self {
            branch: None,
            previous_tag: None,
            markdown: false,
            fetch_details: true,
        }
    }
}

/// Generate a changelog for `owner/repo` using the octocrab transport.
pub async fn generate_changelog(
    config: &GitHubConfig,
    owner: &str,
    repo: &str,
    options: &ChangelogOptions,
) -> Result<String, GitHubError> {
    let client = GitHubClient::new(config.clone())?;
    generate_changelog_with_client(&client, owner, repo, options).await
}

/// Generate a changelog using a pre-configured client.
///
/// This allows dependency injection for testing with mock servers.
pub async fn generate_changelog_with_client(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    options: &ChangelogOptions,
) -> Result<String, GitHubError> {
    let prs = collect_pull_requests(client, owner, repo, options).await?;
    let release = ReleaseType::from_prs(&prs);
    let lines = format_changes(client.config(), owner, repo, &prs, options.markdown);

    info!(%release, count = lines.len(), "Changelog assembled");
    Ok(render_changelog(release, &lines))
}

/// Pull requests merged since the previous release, oldest first.
pub async fn collect_pull_requests(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    options: &ChangelogOptions,
) -> Result<Vec<ExtendedPullRequest>, GitHubError> {
    let branch = options.branch.as_deref();

    let tag = match &options.previous_tag {
        Some(tag) => tag.clone(),
        None => latest_tag(client, owner, repo).await?,
    };
    let base = client.get_commit_for_tag(owner, repo, &tag).await?;

    let history = client.list_branch_commits(owner, repo, branch).await?;
    let head = head_sha(client.config(), owner, repo, branch, &history)?;
    info!(tag = %tag, base = %base, head = %head, "Resolved release range");

    let range = client.get_commits_between(owner, repo, &base, &head).await?;
    let prs = prs_in_range(&history, &range);
    info!(
        commits = range.len(),
        pull_requests = prs.len(),
        "Classified commits"
    );

    let mut extended = Vec::with_capacity(prs.len());
    for pr in prs {
        let details = if options.fetch_details {
            Some(client.get_pr_details(owner, repo, &pr.number).await?)
        } else {
            None
        };
        extended.push(ExtendedPullRequest::new(pr, details));
    }

    Ok(extended)
}

/// Name of the newest tag in the repository.
async fn latest_tag(client: &GitHubClient, owner: &str, repo: &str) -> Result<String, GitHubError> {
    let tags = client.list_tags(owner, repo).await?;
    let newest = tags.into_iter().next().ok_or_else(|| GitHubError::NoReleaseFound {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })?;

    debug!(tag = %newest.name, sha = %newest.commit.sha, "Newest tag");
    Ok(newest.name)
}

/// Pull requests referenced by the range commits, oldest first.
///
/// The range decides membership and supplies the messages; the order comes
/// from the branch history, which lists commits newest first. Range commits
/// missing from the history predate it and are placed first, in range order.
/// Only the first occurrence of each PR number is kept. A range commit whose
/// message is not recognised is retried with the message the branch history
/// has for the same sha.
pub fn prs_in_range(history: &[Commit], range: &[Commit]) -> Vec<PullRequest> {
    let positions: HashMap<&str, (usize, &str)> = history
        .iter()
        .enumerate()
        .map(|(index, c)| (c.sha.as_str(), (index, c.message.as_str())))
        .collect();

    let (mut known, unknown): (Vec<&Commit>, Vec<&Commit>) = range
        .iter()
        .partition(|c| positions.contains_key(c.sha.as_str()));
    if !unknown.is_empty() {
        debug!(count = unknown.len(), "Range commits missing from branch history");
    }
    known.sort_by_key(|c| std::cmp::Reverse(positions[c.sha.as_str()].0));

    let mut seen = HashSet::new();
    unknown
        .into_iter()
        .chain(known)
        .filter_map(|commit| {
            extract_pr(&commit.message).ok().or_else(|| {
                positions
                    .get(commit.sha.as_str())
                    .and_then(|(_, message)| extract_pr(message).ok())
            })
        })
        .filter(|pr| {
            let first = seen.insert(pr.number.clone());
            if !first {
                debug!(number = %pr.number, "Skipping duplicate pull request");
            }
            first
        })
        .collect()
}
