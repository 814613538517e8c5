//! GitHub REST calls used to assemble a changelog.
//!
//! Each call is a single GET with the configured headers attached. Any non-2xx
//! status becomes a [`GitHubError`] carrying the status code and response body.
//! Nothing is retried.

use async_trait::async_trait;
use http::HeaderName;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::GitHubError;

use super::config::GitHubConfig;

/// Characters left as-is in ref names placed in URLs. `/` stays so that
/// hierarchical names like `release/1.0` keep their path form.
const REF_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

fn encode_ref(name: &str) -> String {
    utf8_percent_encode(name, REF_ENCODE_SET).to_string()
}

/// Status code and decoded JSON body of a GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing GET requests against the GitHub API.
///
/// This abstraction allows mocking HTTP in unit tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubTransport: Send + Sync {
    /// GET an absolute URL. Only transport failures are errors; HTTP error
    /// statuses come back as a normal [`ApiResponse`].
    async fn get(&self, url: &str) -> Result<ApiResponse, GitHubError>;
}

/// Default transport backed by octocrab.
pub struct OctocrabTransport {
    octocrab: Octocrab,
}

impl OctocrabTransport {
    /// Build an octocrab client that sends the config's headers on every request.
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let mut builder = Octocrab::builder();
        for (name, value) in &config.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| GitHubError::InvalidHeader(name.clone()))?;
            builder = builder.add_header(header, value.clone());
        }

        let octocrab = builder
            .add_retry_config(RetryConfig::None)
            .base_uri(config.api_url.as_str())
            .map_err(|e| GitHubError::Request(Box::new(e)))?
            .build()
            .map_err(|e| GitHubError::Request(Box::new(e)))?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl GitHubTransport for OctocrabTransport {
    async fn get(&self, url: &str) -> Result<ApiResponse, GitHubError> {
        let response = self
            .octocrab
            ._get(url.to_string())
            .await
            .map_err(|e| GitHubError::Request(Box::new(e)))?;

        let status = response.status().as_u16();
        let text = self
            .octocrab
            .body_to_string(response)
            .await
            .map_err(|e| GitHubError::Request(Box::new(e)))?;

        // Error pages are not always JSON; keep them as text for diagnostics.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}

/// A commit as returned by the commit list and compare endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
}

impl<'de> Deserialize<'de> for Commit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CommitBody {
            #[serde(default)]
            message: String,
        }

        #[derive(Deserialize)]
        struct RawCommit {
            sha: String,
            #[serde(default)]
            commit: Option<CommitBody>,
        }

        let raw = RawCommit::deserialize(deserializer)?;
        Ok(Commit {
            sha: raw.sha,
            message: raw.commit.map(|c| c.message).unwrap_or_default(),
        })
    }
}

/// A repository tag from the tag list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: TagCommit,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagCommit {
    pub sha: String,
}

/// Optional pull request metadata used to enrich a changelog line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequestDetails {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
}

impl PullRequestDetails {
    pub fn new(body: Option<&str>, labels: &[&str]) -> Self {
        Self {
            body: body.map(str::to_string),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Labels arrive as GitHub label objects, but bare strings are accepted too.
fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Name(String),
        Object { name: String },
    }

    let labels: Option<Vec<Label>> = Option::deserialize(deserializer)?;
    Ok(labels
        .unwrap_or_default()
        .into_iter()
        .map(|l| match l {
            Label::Name(name) | Label::Object { name } => name,
        })
        .collect())
}

#[derive(Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Deserialize)]
struct GitObject {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct Comparison {
    commits: Option<Vec<Commit>>,
}

/// GitHub API client bound to one [`GitHubConfig`].
pub struct GitHubClient {
    config: GitHubConfig,
    transport: Box<dyn GitHubTransport>,
}

impl GitHubClient {
    /// Create a client using the octocrab transport.
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        let transport = OctocrabTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client with a custom transport.
    ///
    /// This allows dependency injection for testing.
    pub fn with_transport(config: GitHubConfig, transport: impl GitHubTransport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// List the repository's tags, newest first.
    pub async fn list_tags(&self, owner: &str, repo: &str) -> Result<Vec<Tag>, GitHubError> {
        let url = self.config.api_endpoint(&format!("/repos/{}/{}/tags", owner, repo));
        let body = self.get_ok(&url).await?;
        decode(&url, body)
    }

    /// Resolve a tag name to the sha of the commit it points at.
    ///
    /// Annotated tags point at a tag object; that object is fetched once more
    /// to reach the commit.
    pub async fn get_commit_for_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<String, GitHubError> {
        let url = self
            .config
            .api_endpoint(&format!(
                "/repos/{}/{}/git/refs/tags/{}",
                owner,
                repo,
                encode_ref(tag)
            ));
        let mut object = decode::<GitRef>(&url, self.get_ok(&url).await?)?.object;

        if object.kind == "tag" {
            let Some(tag_url) = object.url.clone() else {
                return Err(GitHubError::UnexpectedObjectType {
                    tag: tag.to_string(),
                    object_type: "tag without url".to_string(),
                });
            };
            debug!(tag, url = %tag_url, "Following annotated tag object");
            object = decode::<GitRef>(&tag_url, self.get_ok(&tag_url).await?)?.object;
        }

        if object.kind != "commit" {
            return Err(GitHubError::UnexpectedObjectType {
                tag: tag.to_string(),
                object_type: object.kind,
            });
        }

        debug!(tag, sha = %object.sha, "Resolved tag");
        Ok(object.sha)
    }

    /// List commits on a branch, most recent first. `None` uses the default branch.
    pub async fn list_branch_commits(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<Vec<Commit>, GitHubError> {
        let mut path = format!("/repos/{}/{}/commits", owner, repo);
        if let Some(branch) = branch {
            path.push_str(&format!("?sha={}", encode_ref(branch)));
        }
        let url = self.config.api_endpoint(&path);
        let body = self.get_ok(&url).await?;
        decode(&url, body)
    }

    /// Sha of the latest commit on a branch.
    pub async fn get_last_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<String, GitHubError> {
        let commits = self.list_branch_commits(owner, repo, branch).await?;
        head_sha(&self.config, owner, repo, branch, &commits)
    }

    /// Commits between two shas, in the order the compare endpoint returns them.
    pub async fn get_commits_between(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<Commit>, GitHubError> {
        let url = self
            .config
            .api_endpoint(&format!("/repos/{}/{}/compare/{}...{}", owner, repo, base, head));
        let response = self.transport.get(&url).await?;

        let range_not_found = |detail: String| GitHubError::RangeNotFound {
            base: base.to_string(),
            head: head.to_string(),
            detail,
        };

        if !response.is_success() {
            return Err(range_not_found(format!(
                "GitHub returned {}: {}",
                response.status, response.body
            )));
        }

        let comparison: Comparison = decode(&url, response.body)?;
        let commits = comparison
            .commits
            .ok_or_else(|| range_not_found("response has no commits".to_string()))?;

        debug!(base, head, count = commits.len(), "Fetched commit range");
        Ok(commits)
    }

    /// Fetch a pull request's body and labels.
    pub async fn get_pr_details(
        &self,
        owner: &str,
        repo: &str,
        number: &str,
    ) -> Result<PullRequestDetails, GitHubError> {
        let url = self
            .config
            .api_endpoint(&format!("/repos/{}/{}/pulls/{}", owner, repo, number));
        let body = self.get_ok(&url).await?;
        decode(&url, body)
    }

    /// GET a URL and return its body, failing on any non-2xx status.
    async fn get_ok(&self, url: &str) -> Result<Value, GitHubError> {
        debug!(url, "GET");
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            return Err(GitHubError::NotFound {
                url: url.to_string(),
                status: response.status,
                body: response.body.to_string(),
            });
        }
        Ok(response.body)
    }
}

/// First sha of a most-recent-first commit list.
pub(crate) fn head_sha(
    config: &GitHubConfig,
    owner: &str,
    repo: &str,
    branch: Option<&str>,
    commits: &[Commit],
) -> Result<String, GitHubError> {
    commits
        .first()
        .map(|c| c.sha.clone())
        .ok_or_else(|| GitHubError::NotFound {
            url: config.api_endpoint(&format!("/repos/{}/{}/commits", owner, repo)),
            status: 200,
            body: format!("no commits on {}", branch.unwrap_or("default branch")),
        })
}

fn decode<T: DeserializeOwned>(url: &str, body: Value) -> Result<T, GitHubError> {
    serde_json::from_value(body).map_err(|source| GitHubError::InvalidResponse {
        url: url.to_string(),
        source,
    })
}
