//! Pull request detection from commit messages.
//!
//! Two message shapes are recognised, tried in order:
//! 1. Merge commits: `Merge pull request #123 from user/branch`, title on the third line
//! 2. Squash merges: `Some title (#123)`
//!
//! Only the first line decides the classification.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::PullRequestError;

static MERGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(\d+) from .*$").expect("Invalid merge commit regex")
});

static SQUASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) \(#(\d+)\)$").expect("Invalid squash commit regex"));

/// A pull request referenced by a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Decimal PR number exactly as written in the commit message.
    pub number: String,
    pub title: String,
}

impl PullRequest {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
        }
    }
}

/// Outcome of one matcher.
enum Match {
    /// The pattern matched and yielded a pull request.
    Found(PullRequest),
    /// The pattern matched but the message is incomplete; no later matcher runs.
    Rejected,
    /// The pattern does not apply; try the next one.
    Skipped,
}

type Matcher = fn(&str) -> Match;

/// Matchers in priority order; the first one that applies decides.
const MATCHERS: [Matcher; 2] = [match_merge_commit, match_squash_commit];

fn match_merge_commit(message: &str) -> Match {
    let first_line = message.lines().next().unwrap_or("");
    let Some(caps) = MERGE_REGEX.captures(first_line.trim_end()) else {
        return Match::Skipped;
    };

    // Line two is the conventional blank separator.
    let title = message.lines().nth(2).map(str::trim).unwrap_or("");
    match caps.get(1) {
        Some(number) if !title.is_empty() => {
            Match::Found(PullRequest::new(number.as_str(), title))
        }
        _ => Match::Rejected,
    }
}

fn match_squash_commit(message: &str) -> Match {
    let first_line = message.lines().next().unwrap_or("");
    let Some(caps) = SQUASH_REGEX.captures(first_line.trim_end()) else {
        return Match::Skipped;
    };

    let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    match caps.get(2) {
        Some(number) if !title.is_empty() => {
            Match::Found(PullRequest::new(number.as_str(), title))
        }
        _ => Match::Rejected,
    }
}

fn find_pr(message: &str) -> Option<PullRequest> {
    for matcher in MATCHERS {
        match matcher(message) {
            Match::Found(pr) => return Some(pr),
            Match::Rejected => return None,
            Match::Skipped => {}
        }
    }
    None
}

/// Whether a commit message records a merged pull request.
pub fn is_pr(message: &str) -> bool {
    find_pr(message).is_some()
}

/// Extract the pull request number and title from a commit message.
pub fn extract_pr(message: &str) -> Result<PullRequest, PullRequestError> {
    find_pr(message).ok_or_else(|| PullRequestError::NotAPullRequest {
        subject: message.lines().next().unwrap_or("").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_commit() {
        let message = "Merge pull request #1234 from some/branch\n\nMy Title";
        assert!(is_pr(message));
        assert_eq!(extract_pr(message).unwrap(), PullRequest::new("1234", "My Title"));
    }

    #[test]
    fn test_squash_commit() {
        let message = "My Title (#1234)\n\nMy description";
        assert!(is_pr(message));
        assert_eq!(extract_pr(message).unwrap(), PullRequest::new("1234", "My Title"));
    }

    #[test]
    fn test_squash_without_body() {
        let pr = extract_pr("Some title addresses bug (#345)").unwrap();
        assert_eq!(pr.number, "345");
        assert_eq!(pr.title, "Some title addresses bug");
    }

    #[test]
    fn test_not_a_pr() {
        assert!(!is_pr("I made some changes!"));
        assert_eq!(
            extract_pr("I made some changes!"),
            Err(PullRequestError::NotAPullRequest {
                subject: "I made some changes!".to_string()
            })
        );
    }

    #[test]
    fn test_merge_without_number() {
        let message = "Merge pull request from some/branch\n\nMy Title";
        assert!(!is_pr(message));
        assert!(extract_pr(message).is_err());
    }

    #[test]
    fn test_merge_without_title_line() {
        assert!(!is_pr("Merge pull request #12 from some/branch"));
        assert!(!is_pr("Merge pull request #12 from some/branch\n\n   "));
    }

    #[test]
    fn test_merge_title_is_trimmed() {
        let message = "Merge pull request #7 from a/b\r\n\r\n  Fix the thing  \r\n";
        assert_eq!(extract_pr(message).unwrap(), PullRequest::new("7", "Fix the thing"));
    }

    #[test]
    fn test_only_first_line_is_considered() {
        assert!(!is_pr("Refactor parser\n\nFollow-up to Some change (#12)"));
        assert!(!is_pr("Update docs\n\nMerge pull request #3 from a/b\n\nTitle"));
    }

    #[test]
    fn test_reference_must_end_the_line() {
        assert!(!is_pr("Revert (#12) partially"));
        assert!(!is_pr("Missing space(#12)"));
    }

    #[test]
    fn test_merge_without_title_does_not_fall_back_to_squash() {
        let message = "Merge pull request #1 from a/fix (#9)";
        assert!(!is_pr(message));
        assert!(extract_pr(message).is_err());
    }

    #[test]
    fn test_empty_squash_title() {
        assert!(!is_pr(" (#12)"));
    }

    #[test]
    fn test_merge_pattern_wins_over_squash() {
        let message = "Merge pull request #5 from a/fix (#9)\n\nReal title";
        assert_eq!(extract_pr(message).unwrap(), PullRequest::new("5", "Real title"));
    }
}
