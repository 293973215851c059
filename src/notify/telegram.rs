// src/notify/telegram.rs
use reqwest::Client;
use serde::Serialize;

use super::{LinkButton, Notify, OutgoingMessage};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot API delivery. One POST per recipient; a failed Markdown send is
/// retried exactly once as plain text, then dropped with a warning.
pub struct TelegramNotifier {
    token: Option<String>,
    recipients: Vec<String>,
    api_base: String,
    client: Client,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup<'a>>,
}

#[derive(Serialize)]
struct ReplyMarkup<'a> {
    inline_keyboard: Vec<Vec<&'a LinkButton>>,
}

impl TelegramNotifier {
    pub fn new(token: Option<String>, recipients: Vec<String>, client: Client) -> Self {
        Self {
            token,
            recipients,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        }
    }

    /// Test hook: point the notifier at a local mock server.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    async fn post(&self, token: &str, chat_id: &str, message: &OutgoingMessage, markdown: bool) -> bool {
        let url = format!("{}/bot{}/sendMessage", self.api_base, token);
        let reply_markup = if message.buttons.is_empty() {
            None
        } else {
            // One button per row.
            Some(ReplyMarkup {
                inline_keyboard: message.buttons.iter().map(|b| vec![b]).collect(),
            })
        };
        let payload = SendMessage {
            chat_id,
            text: &message.text,
            parse_mode: markdown.then_some("Markdown"),
            disable_web_page_preview: true,
            reply_markup,
        };

        match self.client.post(&url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(chat_id, status = %resp.status(), markdown, "telegram rejected message");
                false
            }
            Err(e) => {
                tracing::warn!(chat_id, error = %e, markdown, "telegram request failed");
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Notify for TelegramNotifier {
    async fn send(&self, message: &OutgoingMessage) -> bool {
        let Some(token) = &self.token else {
            tracing::info!(
                preview = %message.text.chars().take(80).collect::<String>(),
                "telegram disabled, skipping send"
            );
            return false;
        };

        if self.recipients.is_empty() {
            // Nothing to deliver, nothing failed.
            tracing::debug!("no telegram recipients configured");
            return true;
        }

        let mut all_delivered = true;
        for chat_id in &self.recipients {
            let mut ok = self.post(token, chat_id, message, message.markdown).await;
            if !ok && message.markdown {
                // Bad entities in Markdown are the usual culprit; plain text
                // still gets the information out.
                ok = self.post(token, chat_id, message, false).await;
            }
            if ok {
                tracing::info!(%chat_id, "telegram message delivered");
            } else {
                all_delivered = false;
            }
        }
        all_delivered
    }
}
