//! Commit message classification.

pub mod classify;

pub use classify::{PullRequest, extract_pr, is_pr};
