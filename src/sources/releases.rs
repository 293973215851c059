// src/sources/releases.rs
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::sources::{
    fingerprint, strip_tags, truncate_chars, SourceKind, Update, UpdateFetcher, SUMMARY_CAP,
    TITLE_CAP,
};

const MAX_ENTRIES: usize = 5;

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    link: Option<Link>,
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Release announcements from the GitHub releases Atom feed.
pub struct ReleasesFetcher {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl ReleasesFetcher {
    pub fn from_fixture(xml: &str) -> Self {
        Self {
            mode: Mode::Fixture(xml.to_string()),
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

    fn parse(xml: &str) -> Result<Vec<Update>> {
        // Entries are deserialized one by one so a single malformed entry
        // degrades to a skip instead of losing the whole feed.
        static RE_ENTRY: OnceCell<Regex> = OnceCell::new();
        let re_entry =
            RE_ENTRY.get_or_init(|| Regex::new(r"(?is)<entry[^>]*>.*?</entry>").unwrap());

        let blocks: Vec<&str> = re_entry.find_iter(xml).map(|m| m.as_str()).collect();
        if blocks.is_empty() {
            // No entries at all: either an empty feed or not a feed. Let the
            // document parse decide which.
            let feed: Feed = from_str(xml).context("parsing releases atom feed")?;
            tracing::debug!(
                feed = feed.title.as_deref().unwrap_or(""),
                "releases feed has no entries"
            );
            return Ok(Vec::new());
        }

        let mut out = Vec::with_capacity(MAX_ENTRIES);
        for block in blocks.into_iter().take(MAX_ENTRIES) {
            let entry: Entry = match from_str(block) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unparsable feed entry");
                    continue;
                }
            };
            let title = entry.title.unwrap_or_else(|| "New Release".to_string());
            let summary = entry
                .content
                .and_then(|c| c.value)
                .map(|v| truncate_chars(&strip_tags(&v), SUMMARY_CAP))
                .unwrap_or_default();
            let url = entry
                .link
                .and_then(|l| l.href)
                .unwrap_or_else(|| SourceKind::Releases.endpoint().to_string());
            // Feed entry ids are stable across runs; the title is only a
            // fallback for malformed entries.
            let seed = entry.id.clone().unwrap_or_else(|| title.clone());

            out.push(Update {
                source: SourceKind::Releases,
                title: truncate_chars(&title, TITLE_CAP),
                summary,
                url,
                fingerprint: fingerprint(&seed),
                version: None,
            });
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl UpdateFetcher for ReleasesFetcher {
    async fn fetch(&self) -> Result<Vec<Update>> {
        match &self.mode {
            Mode::Fixture(xml) => Self::parse(xml),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("releases get")?
                    .text()
                    .await
                    .context("releases body")?;
                Self::parse(&body)
            }
        }
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Release notes</title>
  <entry>
    <id>tag:github.com,2008:Repository/1/v1.2.0</id>
    <title>v1.2.0</title>
    <link rel="alternate" href="https://github.com/anthropics/claude-code/releases/tag/v1.2.0"/>
    <content type="html">&lt;p&gt;Bug fixes and improvements&lt;/p&gt;</content>
  </entry>
  <entry>
    <id>tag:github.com,2008:Repository/1/v1.1.0</id>
    <title>v1.1.0</title>
    <link rel="alternate" href="https://github.com/anthropics/claude-code/releases/tag/v1.1.0"/>
    <content type="html">&lt;p&gt;New slash commands&lt;/p&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn entries_parse_with_stripped_summaries() {
        let ups = ReleasesFetcher::parse(FEED).unwrap();
        assert_eq!(ups.len(), 2);
        assert_eq!(ups[0].title, "v1.2.0");
        assert_eq!(ups[0].summary, "Bug fixes and improvements");
        assert!(ups[0].url.ends_with("/v1.2.0"));
    }

    #[test]
    fn one_bad_entry_does_not_lose_the_rest() {
        // Middle entry carries a duplicate <title> and fails to deserialize.
        let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>tag:github.com,2008:Repository/1/v3</id>
    <title>v3</title>
  </entry>
  <entry>
    <id>tag:github.com,2008:Repository/1/v2</id>
    <title>v2</title>
    <title>v2-duplicate</title>
  </entry>
  <entry>
    <id>tag:github.com,2008:Repository/1/v1</id>
    <title>v1</title>
  </entry>
</feed>"#;
        let ups = ReleasesFetcher::parse(feed).unwrap();
        let titles: Vec<_> = ups.iter().map(|u| u.title.as_str()).collect();
        assert_eq!(titles, vec!["v3", "v1"]);
    }

    #[test]
    fn entryless_garbage_is_still_an_error() {
        assert!(ReleasesFetcher::parse("no feed here").is_err());
    }

    #[test]
    fn fingerprint_keys_off_entry_id() {
        let ups = ReleasesFetcher::parse(FEED).unwrap();
        assert_eq!(
            ups[0].fingerprint,
            fingerprint("tag:github.com,2008:Repository/1/v1.2.0")
        );
        assert_ne!(ups[0].fingerprint, ups[1].fingerprint);
    }
}
