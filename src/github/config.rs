//! Connection settings for a GitHub (or GitHub Enterprise) instance.

use std::collections::BTreeMap;

/// Web URL of public GitHub, used for pull request links.
pub const PUBLIC_GITHUB_URL: &str = "https://github.com";

/// REST API URL of public GitHub.
pub const PUBLIC_GITHUB_API_URL: &str = "https://api.github.com";

/// Immutable per-invocation GitHub settings.
///
/// `headers` is either empty or holds a single `Authorization` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub base_url: String,
    pub api_url: String,
    pub headers: BTreeMap<String, String>,
}

impl GitHubConfig {
    /// Build a config, attaching `Authorization: token <value>` when a token is given.
    pub fn new(base_url: impl Into<String>, api_url: impl Into<String>, token: Option<&str>) -> Self {
        let mut headers = BTreeMap::new();
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("token {}", token));
        }

        Self {
            base_url: base_url.into(),
            api_url: api_url.into(),
            headers,
        }
    }

    /// Config for public GitHub.
    pub fn public(token: Option<&str>) -> Self {
        Self::new(PUBLIC_GITHUB_URL, PUBLIC_GITHUB_API_URL, token)
    }

    /// Absolute API URL for a path such as `/repos/owner/repo/tags`.
    pub fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Web URL of a pull request.
    pub fn pull_request_url(&self, owner: &str, repo: &str, number: &str) -> String {
        format!(
            "{}/{}/{}/pull/{}",
            self.base_url.trim_end_matches('/'),
            owner,
            repo,
            number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_token_means_no_headers() {
        let config = GitHubConfig::new("base-url", "api-url", None);
        assert_eq!(config.base_url, "base-url");
        assert_eq!(config.api_url, "api-url");
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_token_adds_single_authorization_header() {
        let config = GitHubConfig::new("base-url", "api-url", Some("secret-value"));
        assert_eq!(config.headers.len(), 1);
        assert_eq!(
            config.headers.get("Authorization").map(String::as_str),
            Some("token secret-value")
        );
    }

    #[test]
    fn test_public_defaults() {
        let config = GitHubConfig::public(None);
        assert_eq!(config.base_url, PUBLIC_GITHUB_URL);
        assert_eq!(config.api_url, PUBLIC_GITHUB_API_URL);
    }

    #[test]
    fn test_api_endpoint_handles_enterprise_prefix() {
        let config = GitHubConfig::new(
            "https://github.company.com",
            "https://github.company.com/api/v3/",
            None,
        );
        assert_eq!(
            config.api_endpoint("/repos/owner/repo/tags"),
            "https://github.company.com/api/v3/repos/owner/repo/tags"
        );
    }

    #[test]
    fn test_pull_request_url() {
        let config = GitHubConfig::new("https://github.company.com/", "api", None);
        assert_eq!(
            config.pull_request_url("owner", "a-repo", "7"),
            "https://github.company.com/owner/a-repo/pull/7"
        );
    }
}
