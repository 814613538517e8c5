//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::PathBuf;

use github_changelog::github::{GitHubClient, GitHubConfig};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a GitHub API fixture as JSON.
pub fn github_fixture(name: &str) -> Value {
    let path = fixtures_dir().join("github").join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Invalid JSON in fixture {:?}: {}", path, e))
}

/// Config whose web and API URLs both point at the mock server.
pub fn mock_config(server: &MockServer, token: Option<&str>) -> GitHubConfig {
    GitHubConfig::new(server.uri(), server.uri(), token)
}

/// Client using the real octocrab transport against the mock server.
pub fn mock_client(server: &MockServer) -> GitHubClient {
    GitHubClient::new(mock_config(server, Some("fake-github-token")))
        .expect("Failed to build GitHub client")
}

/// Mount a GET handler returning `status` with a JSON body.
pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
