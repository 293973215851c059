// tests/providers_registry.rs
use update_sentinel::sources::registry::{Registry, RegistryFetcher};
use update_sentinel::sources::repos::RepoListFetcher;
use update_sentinel::sources::{SourceKind, UpdateFetcher};

const NPM_JSON: &str = include_str!("fixtures/npm.json");
const PYPI_JSON: &str = include_str!("fixtures/pypi.json");
const REPOS_JSON: &str = include_str!("fixtures/repos.json");

#[tokio::test]
async fn npm_registry_emits_one_versioned_update() {
    let fetcher = RegistryFetcher::from_fixture(Registry::Npm, NPM_JSON);
    let updates = fetcher.fetch().await.unwrap();

    assert_eq!(updates.len(), 1);
    let up = &updates[0];
    assert_eq!(up.source, SourceKind::NpmRegistry);
    assert_eq!(up.title, "claude-code 1.0.44");
    assert_eq!(up.version.as_deref(), Some("1.0.44"));
    assert!(up.summary.contains("2025-07-08"));
}

#[tokio::test]
async fn pypi_registry_emits_one_versioned_update() {
    let fetcher = RegistryFetcher::from_fixture(Registry::Pypi, PYPI_JSON);
    let updates = fetcher.fetch().await.unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].source, SourceKind::PypiRegistry);
    assert_eq!(updates[0].version.as_deref(), Some("0.57.1"));
}

#[tokio::test]
async fn same_registry_version_is_a_stable_fingerprint() {
    let fetcher = RegistryFetcher::from_fixture(Registry::Npm, NPM_JSON);
    let a = fetcher.fetch().await.unwrap();
    let b = fetcher.fetch().await.unwrap();
    assert_eq!(a[0].fingerprint, b[0].fingerprint);
}

#[tokio::test]
async fn repo_listing_maps_each_repo() {
    let fetcher = RepoListFetcher::from_fixture(REPOS_JSON);
    let updates = fetcher.fetch().await.unwrap();

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].title, "New repository: sdk-demos");
    assert_eq!(updates[0].summary, "Demo applications for the SDK");
    assert_eq!(updates[1].summary, "");
    assert_ne!(updates[0].fingerprint, updates[1].fingerprint);
}
