// src/notify/mod.rs
pub mod telegram;

use serde::Serialize;

/// One rendered message ready for delivery.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub text: String,
    /// Markdown on first attempt; delivery may fall back to plain text.
    pub markdown: bool,
    /// Optional inline action buttons (dashboard, docs).
    pub buttons: Vec<LinkButton>,
}

impl OutgoingMessage {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<LinkButton>) -> Self {
        self.buttons = buttons;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkButton {
    pub text: String,
    pub url: String,
}

/// Delivery seam: the pipeline only knows "send it, tell me if it worked".
/// Nothing behind this trait is allowed to panic or propagate errors.
#[async_trait::async_trait]
pub trait Notify: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> bool;
}
