// src/dedupe.rs
use std::collections::HashSet;

use crate::sources::Update;

#[derive(Debug, Clone)]
pub struct DedupeOutcome {
    /// Updates not present in the prior seen set, in discovery order.
    pub fresh: Vec<Update>,
    /// Prior hashes plus the fresh ones appended, ready to persist.
    pub seen_hashes: Vec<String>,
}

/// Pure partition of one run's updates against the persisted fingerprint set.
/// Order within `all` is preserved; no cross-source reordering happens here.
pub fn partition(all: &[Update], prior: &[String]) -> DedupeOutcome {
    let known: HashSet<&str> = prior.iter().map(String::as_str).collect();

    let mut fresh = Vec::new();
    let mut seen_hashes = prior.to_vec();
    let mut appended: HashSet<&str> = HashSet::new();

    for update in all {
        if known.contains(update.fingerprint.as_str()) {
            continue;
        }
        // Two sources can surface the same item in one run; record it once.
        if appended.insert(update.fingerprint.as_str()) {
            seen_hashes.push(update.fingerprint.clone());
            fresh.push(update.clone());
        }
    }

    DedupeOutcome { fresh, seen_hashes }
}
