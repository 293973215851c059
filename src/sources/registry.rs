// src/sources/registry.rs
use anyhow::{Context, Result};
use serde_json::Value;

use crate::sources::{fingerprint, SourceKind, Update, UpdateFetcher};

/// Which package index a fetcher instance queries. Both answer a single GET
/// with a JSON document holding the latest version and its publish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registry {
    Npm,
    Pypi,
}

impl Registry {
    fn kind(self) -> SourceKind {
        match self {
            Registry::Npm => SourceKind::NpmRegistry,
            Registry::Pypi => SourceKind::PypiRegistry,
        }
    }

    fn package_page(self) -> &'static str {
        match self {
            Registry::Npm => "https://www.npmjs.com/package/@anthropic-ai/claude-code",
            Registry::Pypi => "https://pypi.org/project/anthropic/",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Registry::Npm => "claude-code",
            Registry::Pypi => "anthropic",
        }
    }
}

pub struct RegistryFetcher {
    registry: Registry,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RegistryFetcher {
    pub fn from_fixture(registry: Registry, json: &str) -> Self {
        Self {
            registry,
            mode: Mode::Fixture(json.to_string()),
        }
    }

    pub fn from_url(registry: Registry, url: &str, client: reqwest::Client) -> Self {
        Self {
            registry,
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    /// Zero or one update: the latest published version.
    fn parse(&self, body: &str) -> Result<Vec<Update>> {
        let doc: Value = serde_json::from_str(body).context("parsing registry json")?;

        let (version, published) = match self.registry {
            Registry::Npm => {
                let version = doc["dist-tags"]["latest"]
                    .as_str()
                    .context("npm dist-tags.latest missing")?
                    .to_string();
                let published = doc["time"][&version].as_str().map(str::to_string);
                (version, published)
            }
            Registry::Pypi => {
                let version = doc["info"]["version"]
                    .as_str()
                    .context("pypi info.version missing")?
                    .to_string();
                let published = doc["urls"][0]["upload_time_iso_8601"]
                    .as_str()
                    .map(str::to_string);
                (version, published)
            }
        };

        let label = self.registry.label();
        let summary = match &published {
            Some(ts) => format!("Published {ts}"),
            None => String::new(),
        };

        Ok(vec![Update {
            source: self.registry.kind(),
            title: format!("{label} {version}"),
            summary,
            url: self.registry.package_page().to_string(),
            fingerprint: fingerprint(&format!("{label}@{version}")),
            version: Some(version),
        }])
    }
}

#[async_trait::async_trait]
impl UpdateFetcher for RegistryFetcher {
    async fn fetch(&self) -> Result<Vec<Update>> {
        match &self.mode {
            Mode::Fixture(json) => self.parse(json),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("registry get")?
                    .error_for_status()
                    .context("registry non-2xx")?
                    .text()
                    .await
                    .context("registry body")?;
                self.parse(&body)
            }
        }
    }

    fn kind(&self) -> SourceKind {
        self.registry.kind()
    }
}
