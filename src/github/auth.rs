//! GitHub token discovery.
//!
//! Lookup order:
//! 1. Explicit `--token` flag
//! 2. CHANGELOG_GITHUB_TOKEN env var
//! 3. GITHUB_TOKEN env var
//! 4. GH_TOKEN env var
//!
//! A missing token is not an error; public repositories work anonymously.

use std::env;

use tracing::debug;

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 3] = ["CHANGELOG_GITHUB_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

/// Resolve the token to authenticate with, if any.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Some(token.to_string());
    }

    for var in TOKEN_ENV_VARS {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                debug!(var, "Using GitHub token from environment");
                return Some(token);
            }
        }
    }

    None
}
