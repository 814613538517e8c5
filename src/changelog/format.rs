//! Changelog line rendering and release classification.

use crate::commit::PullRequest;
use crate::github::{GitHubConfig, PullRequestDetails};

/// Body line prefix that overrides the commit-derived title.
pub const CHANGELOG_MARKER: &str = "CHANGELOG:";

/// Release classification shown as the changelog banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Patch,
}

impl ReleaseType {
    /// Classify a release from its pull requests' labels.
    ///
    /// Only breaking labels are recognised; everything else is a patch.
    pub fn from_prs(prs: &[ExtendedPullRequest]) -> Self {
        if prs.iter().any(ExtendedPullRequest::is_breaking) {
            Self::Major
        } else {
            Self::Patch
        }
    }

    /// Banner line for the changelog.
    pub fn banner(&self) -> &'static str {
        match self {
            Self::Major => "MAJOR RELEASE",
            Self::Patch => "PATCH RELEASE",
        }
    }
}

impl std::fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.banner())
    }
}

/// A pull request plus whatever details were fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPullRequest {
    pub pr: PullRequest,
    pub details: Option<PullRequestDetails>,
}

impl ExtendedPullRequest {
    pub fn new(pr: PullRequest, details: Option<PullRequestDetails>) -> Self {
        Self { pr, details }
    }

    /// Title to show: the body's `CHANGELOG:` line if present, else the commit title.
    pub fn display_title(&self) -> &str {
        self.details
            .as_ref()
            .and_then(|d| d.body.as_deref())
            .and_then(custom_description)
            .unwrap_or(self.pr.title.as_str())
    }

    /// Whether any label marks this PR as breaking.
    pub fn is_breaking(&self) -> bool {
        self.details.as_ref().is_some_and(|d| {
            d.labels
                .iter()
                .any(|label| label.to_lowercase().contains("breaking"))
        })
    }
}

/// Find a custom description in a PR body.
///
/// Returns the rest of the first line starting with `CHANGELOG:` (leading
/// whitespace allowed). Empty descriptions are ignored.
pub fn custom_description(body: &str) -> Option<&str> {
    body.lines()
        .filter_map(|line| line.trim_start().strip_prefix(CHANGELOG_MARKER))
        .map(str::trim)
        .find(|description| !description.is_empty())
}

/// Render one line per pull request, in the given order.
///
/// Markdown lines link to the pull request on the configured GitHub host.
pub fn format_changes(
    config: &GitHubConfig,
    owner: &str,
    repo: &str,
    prs: &[ExtendedPullRequest],
    markdown: bool,
) -> Vec<String> {
    prs.iter()
        .map(|entry| {
            let number = &entry.pr.number;
            let title = entry.display_title();
            if markdown {
                format!(
                    "- {} [#{}]({})",
                    title,
                    number,
                    config.pull_request_url(owner, repo, number)
                )
            } else {
                format!("- {} #{}", title, number)
            }
        })
        .collect()
}

/// Join the banner and formatted lines into the final changelog text.
pub fn render_changelog(release: ReleaseType, lines: &[String]) -> String {
    std::iter::once(release.banner().to_string())
        .chain(lines.iter().cloned())
        .collect::<Vec<_>>()
        .join("\n")
}
