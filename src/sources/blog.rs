// src/sources/blog.rs
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;

use crate::sources::{
    fingerprint, strip_tags, truncate_chars, SourceKind, Update, UpdateFetcher, TITLE_CAP,
};

const MAX_LINKS: usize = 10;
const MIN_TITLE_LEN: usize = 10;
const SITE_BASE: &str = "https://www.anthropic.com";

/// Navigation labels that show up as anchors but are never articles.
const STOPLIST: &[&str] = &[
    "read more",
    "learn more",
    "see all",
    "view all",
    "home",
    "news",
    "research",
];

/// Scans a listing page for article links under a path prefix. Covers both
/// the news and the research index, which share their markup style.
pub struct LinkScanFetcher {
    kind: SourceKind,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

fn anchor_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<a\s[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#).unwrap())
}

/// Path component of a link, without scheme, host, query or fragment.
fn url_path(link: &str) -> String {
    let without_scheme = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .map(|rest| rest.find('/').map(|i| &rest[i..]).unwrap_or("/"))
        .unwrap_or(link);
    let end = without_scheme
        .find(['?', '#'])
        .unwrap_or(without_scheme.len());
    without_scheme[..end].to_string()
}

impl LinkScanFetcher {
    pub fn from_fixture(kind: SourceKind, html: &str) -> Self {
        Self {
            kind,
            mode: Mode::Fixture(html.to_string()),
        }
    }

    pub fn from_url(kind: SourceKind, url: &str, client: reqwest::Client) -> Self {
        Self {
            kind,
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    fn path_prefix(&self) -> &'static str {
        match self.kind {
            SourceKind::Research => "/research/",
            _ => "/news/",
        }
    }

    fn parse(&self, html: &str) -> Vec<Update> {
        let mut out = Vec::new();
        let mut seen_in_page = HashSet::new();

        for cap in anchor_re().captures_iter(html) {
            let href = cap[1].trim().to_string();
            let path = url_path(&href);
            if !path.starts_with(self.path_prefix()) {
                continue;
            }

            let title = strip_tags(&cap[2]);
            if title.chars().count() < MIN_TITLE_LEN {
                continue;
            }
            let lowered = title.to_lowercase();
            if STOPLIST.iter().any(|s| lowered == *s) {
                continue;
            }

            // Dedupe by path: a re-titled link at the same path is treated as
            // the same article.
            let fp = fingerprint(&path);
            if !seen_in_page.insert(fp.clone()) {
                continue;
            }

            let url = if href.starts_with("http") {
                href
            } else {
                format!("{SITE_BASE}{href}")
            };

            out.push(Update {
                source: self.kind,
                title: truncate_chars(&title, TITLE_CAP),
                summary: String::new(),
                url,
                fingerprint: fp,
                version: None,
            });
            if out.len() >= MAX_LINKS {
                break;
            }
        }
        out
    }
}

#[async_trait::async_trait]
impl UpdateFetcher for LinkScanFetcher {
    async fn fetch(&self) -> Result<Vec<Update>> {
        match &self.mode {
            Mode::Fixture(html) => Ok(self.parse(html)),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("listing get")?
                    .text()
                    .await
                    .context("listing body")?;
                Ok(self.parse(&body))
            }
        }
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}
