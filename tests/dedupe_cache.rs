// tests/dedupe_cache.rs
use update_sentinel::cache::{self, CacheDocument, SEEN_CAP};
use update_sentinel::dedupe;
use update_sentinel::sources::{SourceKind, Update};

fn update(fp: &str) -> Update {
    Update {
        source: SourceKind::Releases,
        title: format!("release {fp}"),
        summary: String::new(),
        url: "https://github.com/anthropics/claude-code/releases".to_string(),
        fingerprint: fp.to_string(),
        version: None,
    }
}

#[test]
fn seen_a_b_plus_fetched_a_c_reports_only_c() {
    let prior = vec!["A".to_string(), "B".to_string()];
    let out = dedupe::partition(&[update("A"), update("C")], &prior);

    assert_eq!(out.fresh.len(), 1);
    assert_eq!(out.fresh[0].fingerprint, "C");
    assert_eq!(out.seen_hashes, vec!["A", "B", "C"]);
}

#[test]
fn save_load_cycles_never_exceed_the_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("last_check.json");

    let mut doc = CacheDocument::default();
    doc.seen_hashes = (0..SEEN_CAP * 2).map(|i| format!("fp{i}")).collect();
    cache::save(&path, &mut doc).unwrap();

    // Second cycle over the loaded document with more appended.
    let mut doc = cache::load(&path);
    assert_eq!(doc.seen_hashes.len(), SEEN_CAP);
    doc.seen_hashes
        .extend((0..50).map(|i| format!("extra{i}")));
    cache::save(&path, &mut doc).unwrap();

    let reloaded = cache::load(&path);
    assert_eq!(reloaded.seen_hashes.len(), SEEN_CAP);
    // Newest survive the eviction.
    assert_eq!(reloaded.seen_hashes.last().unwrap(), "extra49");
}

#[test]
fn versions_and_welcomed_users_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut doc = CacheDocument::default();
    doc.versions
        .insert("claude-code (npm)".to_string(), "1.0.44".to_string());
    doc.welcomed_users.push("123456".to_string());
    cache::save(&path, &mut doc).unwrap();

    let loaded = cache::load(&path);
    assert_eq!(
        loaded.versions.get("claude-code (npm)").map(String::as_str),
        Some("1.0.44")
    );
    assert_eq!(loaded.welcomed_users, vec!["123456"]);
    assert!(loaded.last_check.is_some());
}
