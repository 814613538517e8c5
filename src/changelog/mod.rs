//! Changelog assembly and formatting.

pub mod format;
pub mod generate;

pub use format::{ExtendedPullRequest, ReleaseType, custom_description, format_changes};
pub use generate::{ChangelogOptions, generate_changelog, generate_changelog_with_client};
