// src/sources/changelog.rs
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;

use crate::sources::{
    fingerprint, strip_tags, truncate_chars, SourceKind, Update, UpdateFetcher, SUMMARY_CAP,
    TITLE_CAP,
};

const MAX_ENTRIES: usize = 5;
const BODY_SCAN_CAP: usize = 500;
const FINGERPRINT_BODY_PREFIX: usize = 100;

/// Scrapes dated release-notes headings from the changelog page. Headings are
/// matched with a month/year heuristic since the page carries no feed.
pub struct ChangelogFetcher {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

fn heading_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<h[23][^>]*>(.*?)</h[23]>").unwrap())
}

fn looks_like_date(text: &str) -> bool {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r"(January|February|March|April|May|June|July|August|September|October|November|December|\b20\d{2}\b)",
        )
        .unwrap()
    });
    re.is_match(text)
}

impl ChangelogFetcher {
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

    fn page_url(&self) -> &str {
        match &self.mode {
            Mode::Fixture(_) => SourceKind::Changelog.endpoint(),
            Mode::Http { url, .. } => url,
        }
    }

    fn parse(&self, html: &str) -> Vec<Update> {
        let mut out = Vec::new();
        let mut seen_in_page = HashSet::new();

        let headings: Vec<_> = heading_re().captures_iter(html).collect();
        for (i, cap) in headings.iter().enumerate() {
            let title = strip_tags(&cap[1]);
            if title.is_empty() || !looks_like_date(&title) {
                continue;
            }

            // Body is everything up to the next heading, tag-stripped and
            // capped; enough context for a notification, not the whole page.
            let start = cap.get(0).map(|m| m.end()).unwrap_or(0);
            let end = headings
                .get(i + 1)
                .and_then(|c| c.get(0))
                .map(|m| m.start())
                .unwrap_or(html.len());
            let mut body = strip_tags(&html[start..end]);
            if body.chars().count() > BODY_SCAN_CAP {
                body = body.chars().take(BODY_SCAN_CAP).collect();
            }

            let title = truncate_chars(&title, TITLE_CAP);
            let seed = format!(
                "{}{}",
                title,
                body.chars().take(FINGERPRINT_BODY_PREFIX).collect::<String>()
            );
            let fp = fingerprint(&seed);
            if !seen_in_page.insert(fp.clone()) {
                continue;
            }

            out.push(Update {
                source: SourceKind::Changelog,
                title,
                summary: truncate_chars(&body, SUMMARY_CAP),
                url: self.page_url().to_string(),
                fingerprint: fp,
                version: None,
            });
            if out.len() >= MAX_ENTRIES {
                break;
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl UpdateFetcher for ChangelogFetcher {
    async fn fetch(&self) -> Result<Vec<Update>> {
        match &self.mode {
            Mode::Fixture(html) => Ok(self.parse(html)),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("changelog get")?
                    .text()
                    .await
                    .context("changelog body")?;
                Ok(self.parse(&body))
            }
        }
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Changelog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_headings_become_updates() {
        let html = r#"
            <h2>May 22, 2025</h2><p>Added streaming support.</p>
            <h2>About</h2><p>Not a release entry.</p>
            <h3>April 2025</h3><p>Rate limit changes.</p>
        "#;
        let f = ChangelogFetcher::from_fixture(html);
        let ups = f.parse(html);
        assert_eq!(ups.len(), 2);
        assert_eq!(ups[0].title, "May 22, 2025");
        assert!(ups[0].summary.contains("streaming"));
    }

    #[test]
    fn identical_sections_dedupe_within_page() {
        let html = "<h2>May 2025</h2><p>Same body.</p><h2>May 2025</h2><p>Same body.</p>";
        let f = ChangelogFetcher::from_fixture(html);
        assert_eq!(f.parse(html).len(), 1);
    }
}
