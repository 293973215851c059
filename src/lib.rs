// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod cache;
pub mod config;
pub mod dedupe;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::cache::CacheDocument;
pub use crate::config::AppConfig;
pub use crate::notify::{Notify, OutgoingMessage};
pub use crate::pipeline::{run, RunSummary};
pub use crate::sources::{SourceKind, Update, UpdateFetcher};
