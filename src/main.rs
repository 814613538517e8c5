//! changelog - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use github_changelog::changelog::{ChangelogOptions, generate_changelog};
use github_changelog::github::{
    GitHubConfig, PUBLIC_GITHUB_API_URL, PUBLIC_GITHUB_URL, resolve_token,
};

/// Generate a changelog from the pull requests merged since the last release.
#[derive(Parser, Debug)]
#[command(name = "changelog")]
#[command(about = "Generate a changelog from pull requests merged since the last release")]
#[command(version)]
struct Cli {
    /// Repository owner (user or organization)
    owner: String,

    /// Repository name
    repo: String,

    /// Branch to release from (defaults to the repository's default branch)
    #[arg(short, long)]
    branch: Option<String>,

    /// Tag to compare against instead of the newest tag
    #[arg(long)]
    previous_tag: Option<String>,

    /// GitHub web URL, used for pull request links
    #[arg(long, default_value = PUBLIC_GITHUB_URL)]
    github_base_url: String,

    /// GitHub API URL
    #[arg(long, default_value = PUBLIC_GITHUB_API_URL)]
    github_api_url: String,

    /// GitHub token (defaults to CHANGELOG_GITHUB_TOKEN, GITHUB_TOKEN or GH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Output Markdown with links to each pull request
    #[arg(short, long)]
    markdown: bool,

    /// Skip fetching pull request bodies and labels
    #[arg(long)]
    no_details: bool,

    /// Log API calls to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let token = resolve_token(cli.token.as_deref());
    let config = GitHubConfig::new(cli.github_base_url, cli.github_api_url, token.as_deref());

    let options = ChangelogOptions {
        branch: cli.branch,
        previous_tag: cli.previous_tag,
        markdown: cli.markdown,
        fetch_details: !cli.no_details,
    };

    let changelog = generate_changelog(&config, &cli.owner, &cli.repo, &options)
        .await
        .with_context(|| format!("Failed to generate changelog for {}/{}", cli.owner, cli.repo))?;

    println!("{}", changelog);
    Ok(())
}
