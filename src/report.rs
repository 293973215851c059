// src/report.rs
//! Deterministic rendering of updates into Telegram Markdown blocks and the
//! published site artifact. No I/O here; everything is pure over its inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::sources::{truncate_chars, SourceKind, Update};

/// Summary cap inside a detail message; tighter than the fetch-time cap so a
/// full block always stays well under Telegram's message size limit.
pub const DETAIL_SUMMARY_CAP: usize = 200;
/// At most this many detail messages per run; the digest carries the rest.
pub const MAX_DETAILS: usize = 5;

/// Escape characters that break Telegram's legacy Markdown dialect.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '_' | '*' | '[' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A literal `)` would terminate the Markdown link target early; parentheses
/// are percent-encoded, which every target server understands.
fn escape_link_url(url: &str) -> String {
    url.replace('(', "%28").replace(')', "%29")
}

/// One notification block per fresh update.
pub fn detail_message(update: &Update) -> String {
    let mut msg = format!(
        "{icon} *ANTHROPIC UPDATE*\n\n🏷️ *Source:* {source}\n📝 *{title}*\n",
        icon = update.source.icon(),
        source = escape_markdown(update.source.label()),
        title = escape_markdown(&update.title),
    );

    let summary = truncate_chars(&update.summary, DETAIL_SUMMARY_CAP);
    if !summary.is_empty() {
        msg.push('\n');
        msg.push_str(&escape_markdown(&summary));
        msg.push('\n');
    }

    msg.push_str(&format!("\n🔗 [See more]({})", escape_link_url(&update.url)));
    msg
}

/// Aggregate report for the run, sent even on quiet runs so the channel
/// doubles as a heartbeat.
pub fn digest_message(
    fresh_count: usize,
    versions: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> String {
    let stamp = now.format("%d/%m/%Y %H:%M");
    let mut msg = if fresh_count > 0 {
        format!("✅ *{fresh_count} new update(s) detected*\n📅 {stamp}")
    } else {
        format!("✅ *Check OK* - no news\n📅 {stamp}")
    };

    if !versions.is_empty() {
        msg.push_str("\n\n📦 *Tracked versions*");
        for (label, version) in versions {
            msg.push_str(&format!(
                "\n• {}: `{}`",
                escape_markdown(label),
                version
            ));
        }
    }
    msg
}

/// JSON document for static-site consumption (GitHub Pages data file).
#[derive(Debug, Serialize)]
pub struct Artifact {
    pub last_check: String,
    pub updates: Vec<ArtifactUpdate>,
    pub versions: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactUpdate {
    pub source: SourceKind,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub is_new: bool,
}

pub fn artifact(
    all: &[Update],
    fresh: &[Update],
    versions: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> Artifact {
    let fresh_fps: HashSet<&str> = fresh.iter().map(|u| u.fingerprint.as_str()).collect();
    Artifact {
        last_check: now.to_rfc3339(),
        updates: all
            .iter()
            .map(|u| ArtifactUpdate {
                source: u.source,
                title: u.title.clone(),
                summary: u.summary.clone(),
                url: u.url.clone(),
                is_new: fresh_fps.contains(u.fingerprint.as_str()),
            })
            .collect(),
        versions: versions.clone(),
    }
}
