// src/cache.rs
//! Persisted run state: seen fingerprints, last check stamp, known versions.
//! One writer per run, loaded at start and written back at the end.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Most-recent fingerprints kept after a save; older ones are evicted first.
pub const SEEN_CAP: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CacheDocument {
    #[serde(default)]
    pub seen_hashes: Vec<String>,
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    /// Kept for compatibility with earlier state files.
    #[serde(default)]
    pub welcomed_users: Vec<String>,
}

/// Loads the cache document, falling back to an empty one when the file is
/// missing or unparsable. Corruption costs one round of duplicate alerts, not
/// the run.
pub fn load(path: &Path) -> CacheDocument {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str(&s) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache unparsable, starting empty");
                CacheDocument::default()
            }
        },
        Err(_) => CacheDocument::default(),
    }
}

/// Stamps `last_check`, enforces the fingerprint cap and writes atomically
/// (tmp file + rename) so a crash mid-write keeps the previous document.
pub fn save(path: &Path, doc: &mut CacheDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating cache dir {}", parent.display()))?;
        }
    }

    doc.last_check = Some(Utc::now().to_rfc3339());
    if doc.seen_hashes.len() > SEEN_CAP {
        let excess = doc.seen_hashes.len() - SEEN_CAP;
        doc.seen_hashes.drain(0..excess);
    }

    let body = serde_json::to_vec_pretty(doc).context("serializing cache")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}
