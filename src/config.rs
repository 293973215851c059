// src/config.rs
use std::path::PathBuf;

use crate::notify::LinkButton;

const DEFAULT_CACHE_PATH: &str = "cache/last_check.json";

/// Additional hardcoded recipients beyond the env-provided primary chat.
const EXTRA_RECIPIENTS: &[&str] = &[];

const CODE_DOCS_URL: &str = "https://docs.anthropic.com/en/docs/claude-code/overview";
const RELEASE_NOTES_URL: &str = "https://docs.anthropic.com/en/release-notes/overview";

/// Immutable run configuration, resolved once in `main` and passed into the
/// pipeline. No module-level mutable state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: Option<String>,
    pub recipients: Vec<String>,
    pub cache_path: PathBuf,
    /// Where to publish the site data file; `None` disables publishing.
    pub artifact_path: Option<PathBuf>,
    pub dashboard_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut recipients = Vec::new();
        if let Ok(primary) = std::env::var("TELEGRAM_CHAT_ID") {
            if !primary.trim().is_empty() {
                recipients.push(primary.trim().to_string());
            }
        }
        recipients.extend(EXTRA_RECIPIENTS.iter().map(|s| s.to_string()));

        Self {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            recipients,
            cache_path: PathBuf::from(
                std::env::var("CACHE_PATH").unwrap_or_else(|_| DEFAULT_CACHE_PATH.to_string()),
            ),
            artifact_path: std::env::var("SITE_DATA_PATH").ok().map(PathBuf::from),
            dashboard_url: std::env::var("DASHBOARD_URL").ok(),
        }
    }

    /// Inline buttons attached to the digest message.
    pub fn digest_buttons(&self) -> Vec<LinkButton> {
        let mut buttons = Vec::new();
        if let Some(url) = &self.dashboard_url {
            buttons.push(LinkButton {
                text: "📊 Dashboard".to_string(),
                url: url.clone(),
            });
        }
        buttons.push(LinkButton {
            text: "📖 Claude Code docs".to_string(),
            url: CODE_DOCS_URL.to_string(),
        });
        buttons.push(LinkButton {
            text: "📝 Release notes".to_string(),
            url: RELEASE_NOTES_URL.to_string(),
        });
        buttons
    }
}
