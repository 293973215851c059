// src/sources/mod.rs
pub mod blog;
pub mod changelog;
pub mod registry;
pub mod releases;
pub mod repos;
pub mod status;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Closed set of monitored sources. Metadata lives in exhaustive matches so a
/// new source cannot ship without a label, an endpoint and an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Changelog,
    Releases,
    Blog,
    Research,
    NpmRegistry,
    PypiRegistry,
    Status,
    Repos,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Changelog => "API Changelog",
            SourceKind::Releases => "Claude Code Releases",
            SourceKind::Blog => "Anthropic Blog",
            SourceKind::Research => "Anthropic Research",
            SourceKind::NpmRegistry => "npm Registry",
            SourceKind::PypiRegistry => "PyPI Registry",
            SourceKind::Status => "Anthropic Status",
            SourceKind::Repos => "New Repositories",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            SourceKind::Changelog => "https://docs.anthropic.com/en/release-notes/api",
            SourceKind::Releases => "https://github.com/anthropics/claude-code/releases.atom",
            SourceKind::Blog => "https://www.anthropic.com/news",
            SourceKind::Research => "https://www.anthropic.com/research",
            SourceKind::NpmRegistry => "https://registry.npmjs.org/@anthropic-ai/claude-code",
            SourceKind::PypiRegistry => "https://pypi.org/pypi/anthropic/json",
            SourceKind::Status => "https://status.anthropic.com",
            SourceKind::Repos => {
                "https://api.github.com/orgs/anthropics/repos?sort=created&direction=desc&per_page=5"
            }
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SourceKind::Changelog => "🔧",
            SourceKind::Releases => "📦",
            SourceKind::Blog => "📰",
            SourceKind::Research => "🔬",
            SourceKind::NpmRegistry => "🟩",
            SourceKind::PypiRegistry => "🐍",
            SourceKind::Status => "⚠️",
            SourceKind::Repos => "🆕",
        }
    }

    /// Label under which this source's version lands in the cache document.
    /// Only the registry sources track a version.
    pub fn version_label(self) -> Option<&'static str> {
        match self {
            SourceKind::NpmRegistry => Some("claude-code (npm)"),
            SourceKind::PypiRegistry => Some("anthropic (PyPI)"),
            _ => None,
        }
    }
}

/// One normalized piece of detected change, produced fresh each run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Update {
    pub source: SourceKind,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub fingerprint: String,
    /// Latest observed version, for registry sources only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[async_trait::async_trait]
pub trait UpdateFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Update>>;
    fn kind(&self) -> SourceKind;
}

pub const TITLE_CAP: usize = 150;
pub const SUMMARY_CAP: usize = 300;
const FINGERPRINT_LEN: usize = 12;
const HTTP_TIMEOUT_SECS: u64 = 15;

/// Short deterministic digest over a source-specific seed. Equal seeds across
/// runs yield equal fingerprints; distinct content diverges at 12 hex chars.
pub fn fingerprint(seed: &str) -> String {
    use std::fmt::Write;
    let digest = Sha256::digest(seed.as_bytes());
    let mut out = String::with_capacity(FINGERPRINT_LEN);
    for b in digest.iter().take(FINGERPRINT_LEN / 2) {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Decode HTML entities, strip tags, collapse whitespace.
pub fn strip_tags(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    let out = re_tags.replace_all(&decoded, " ").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Cap to `cap` characters, appending a marker when anything was cut.
pub fn truncate_chars(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let mut out: String = s.chars().take(cap).collect();
    out.push_str("...");
    out
}

/// Shared HTTP client for all fetchers. GitHub's API rejects requests without
/// a user-agent, so it is set globally.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("update-sentinel/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .context("building http client")
}

/// The fixed fetch sequence for one run, in notification priority order.
pub fn default_fetchers(client: &reqwest::Client) -> Vec<Box<dyn UpdateFetcher>> {
    vec![
        Box::new(changelog::ChangelogFetcher::from_url(
            SourceKind::Changelog.endpoint(),
            client.clone(),
        )),
        Box::new(releases::ReleasesFetcher::from_url(
            SourceKind::Releases.endpoint(),
            client.clone(),
        )),
        Box::new(blog::LinkScanFetcher::from_url(
            SourceKind::Blog,
            SourceKind::Blog.endpoint(),
            client.clone(),
        )),
        Box::new(blog::LinkScanFetcher::from_url(
            SourceKind::Research,
            SourceKind::Research.endpoint(),
            client.clone(),
        )),
        Box::new(registry::RegistryFetcher::from_url(
            registry::Registry::Npm,
            SourceKind::NpmRegistry.endpoint(),
            client.clone(),
        )),
        Box::new(registry::RegistryFetcher::from_url(
            registry::Registry::Pypi,
            SourceKind::PypiRegistry.endpoint(),
            client.clone(),
        )),
        Box::new(status::StatusFetcher::from_url(
            SourceKind::Status.endpoint(),
            client.clone(),
        )),
        Box::new(repos::RepoListFetcher::from_url(
            SourceKind::Repos.endpoint(),
            client.clone(),
        )),
    ]
}
