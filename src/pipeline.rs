// src/pipeline.rs
//! Single linear pass: load cache, fetch every source in order, dedupe,
//! render, notify, persist. No retries between stages and no rollback; a
//! notify failure must not resurrect already-recorded fingerprints.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;

use crate::cache::{self, CacheDocument};
use crate::config::AppConfig;
use crate::dedupe;
use crate::notify::{Notify, OutgoingMessage};
use crate::report;
use crate::sources::{Update, UpdateFetcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Updates discovered across all sources this run.
    pub total: usize,
    /// Updates not seen in any previous run.
    pub fresh: usize,
    /// Messages the notifier reported as delivered.
    pub delivered: usize,
}

pub async fn run(
    cfg: &AppConfig,
    fetchers: &[Box<dyn UpdateFetcher>],
    notifier: &dyn Notify,
) -> Result<RunSummary> {
    // INIT
    let prior = cache::load(&cfg.cache_path);
    tracing::info!(
        seen = prior.seen_hashes.len(),
        last_check = prior.last_check.as_deref().unwrap_or("never"),
        "starting check"
    );

    // FETCH: sequential, one source failing contributes zero updates.
    let mut all: Vec<Update> = Vec::new();
    for fetcher in fetchers {
        match fetcher.fetch().await {
            Ok(mut updates) => {
                tracing::info!(source = fetcher.kind().label(), count = updates.len(), "fetched");
                all.append(&mut updates);
            }
            Err(e) => {
                tracing::warn!(source = fetcher.kind().label(), error = %e, "source failed");
            }
        }
    }

    // DEDUPE
    let outcome = dedupe::partition(&all, &prior.seen_hashes);
    for update in &outcome.fresh {
        tracing::info!(
            source = update.source.label(),
            title = %report::escape_markdown(&update.title),
            "new update"
        );
    }

    let mut versions = prior.versions.clone();
    for update in &all {
        if let (Some(version), Some(label)) = (&update.version, update.source.version_label()) {
            versions.insert(label.to_string(), version.clone());
        }
    }

    // REPORT
    let now = Utc::now();
    let details: Vec<String> = outcome
        .fresh
        .iter()
        .take(report::MAX_DETAILS)
        .map(report::detail_message)
        .collect();
    let digest = report::digest_message(outcome.fresh.len(), &versions, now);

    // NOTIFY: per-message result only; the run does not stop on failure.
    let mut delivered = 0usize;
    for text in details {
        if notifier.send(&OutgoingMessage::markdown(text)).await {
            delivered += 1;
        }
    }
    let digest_message = OutgoingMessage::markdown(digest).with_buttons(cfg.digest_buttons());
    if notifier.send(&digest_message).await {
        delivered += 1;
    }

    // PERSIST: runs even when notify failed, so fingerprints stay recorded
    // and the next run does not re-alert. A cache write failure is fatal.
    let mut doc = CacheDocument {
        seen_hashes: outcome.seen_hashes,
        last_check: prior.last_check.clone(),
        versions: versions.clone(),
        welcomed_users: prior.welcomed_users.clone(),
    };
    cache::save(&cfg.cache_path, &mut doc).context("persisting cache")?;

    if let Some(path) = &cfg.artifact_path {
        let artifact = report::artifact(&all, &outcome.fresh, &versions, now);
        match serde_json::to_vec_pretty(&artifact) {
            Ok(body) => {
                let write = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(fs::create_dir_all)
                    .unwrap_or(Ok(()))
                    .and_then(|_| fs::write(path, body));
                if let Err(e) = write {
                    tracing::warn!(path = %path.display(), error = %e, "artifact write failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "artifact serialization failed"),
        }
    }

    // DONE
    let summary = RunSummary {
        total: all.len(),
        fresh: outcome.fresh.len(),
        delivered,
    };
    tracing::info!(
        total = summary.total,
        fresh = summary.fresh,
        delivered = summary.delivered,
        "check complete"
    );
    Ok(summary)
}
