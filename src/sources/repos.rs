// src/sources/repos.rs
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sources::{
    fingerprint, truncate_chars, SourceKind, Update, UpdateFetcher, SUMMARY_CAP,
};

const MAX_REPOS: usize = 5;

#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Newly created repositories in the organization, via the GitHub listing API
/// (already sorted by creation time by the query string).
pub struct RepoListFetcher {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RepoListFetcher {
    pub fn from_fixture(json: &str) -> Self {
        Self {
            mode: Mode::Fixture(json.to_string()),
        }
    }

    pub fn from_url(url: &str, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    fn parse(json: &str) -> Result<Vec<Update>> {
        let repos: Vec<Repo> = serde_json::from_str(json).context("parsing repo listing")?;

        let mut out = Vec::with_capacity(MAX_REPOS);
        for repo in repos.into_iter().take(MAX_REPOS) {
            let created = repo.created_at.unwrap_or_default();
            out.push(Update {
                source: SourceKind::Repos,
                title: format!("New repository: {}", repo.name),
                summary: truncate_chars(&repo.description.unwrap_or_default(), SUMMARY_CAP),
                url: repo.html_url,
                fingerprint: fingerprint(&format!("{}{}", repo.name, created)),
                version: None,
            });
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl UpdateFetcher for RepoListFetcher {
    async fn fetch(&self) -> Result<Vec<Update>> {
        match &self.mode {
            Mode::Fixture(json) => Self::parse(json),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("repo listing get")?
                    .error_for_status()
                    .context("repo listing non-2xx")?
                    .text()
                    .await
                    .context("repo listing body")?;
                Self::parse(&body)
            }
        }
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Repos
    }
}
