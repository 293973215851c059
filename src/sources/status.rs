// src/sources/status.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::sources::{fingerprint, strip_tags, SourceKind, Update, UpdateFetcher};

/// Words that indicate an active problem on the status page. Deliberately
/// narrow: generic words like "update" or "resolved" appear on a healthy page
/// and would fire on every run.
const INCIDENT_KEYWORDS: &[&str] = &[
    "degraded",
    "outage",
    "incident",
    "maintenance",
    "investigating",
];

/// Keyword scan over the status page. Emits at most one synthetic update,
/// fingerprinted by date-and-hour so an ongoing incident re-fires hourly at
/// most, not on every run.
pub struct StatusFetcher {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl StatusFetcher {
    pub fn from_fixture(html: &str) -> Self {
        Self {
            mode: Mode::Fixture(html.to_string()),
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

    pub fn scan_at(html: &str, now: DateTime<Utc>) -> Vec<Update> {
        let text = strip_tags(html).to_lowercase();
        if !INCIDENT_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            return Vec::new();
        }

        let bucket = now.format("%Y-%m-%d-%H");
        vec![Update {
            source: SourceKind::Status,
            title: "Incident detected on the status page".to_string(),
            summary: "An incident or maintenance window is in progress. Check the status page."
                .to_string(),
            url: SourceKind::Status.endpoint().to_string(),
            fingerprint: fingerprint(&format!("incident-{bucket}")),
            version: None,
        }]
    }
}

#[async_trait::async_trait]
impl UpdateFetcher for StatusFetcher {
    async fn fetch(&self) -> Result<Vec<Update>> {
        let body = match &self.mode {
            Mode::Fixture(html) => html.clone(),
            Mode::Http { url, client } => client
                .get(url)
                .send()
                .await
                .context("status get")?
                .text()
                .await
                .context("status body")?,
        };
        Ok(Self::scan_at(&body, Utc::now()))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Status
    }
}
