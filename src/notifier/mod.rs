//! Notification back-ends.
//!
//! The cleaner only needs "send a titled text message"; delivery is best effort
//! and failures are logged by the caller.

mod telegram;
mod webhook;

pub use telegram::TelegramNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{NotifierConfig, NotifierKind};

/// Notification errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Notifier not configured: {0}")]
    Config(String),
}

/// Sends a titled text message somewhere the user will see it
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Back-end identifier, e.g. "telegram"
    fn id(&self) -> &'static str;

    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn id(&self) -> &'static str {
        "log"
    }

    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(target: "notification", "{}\n{}", title, body);
        Ok(())
    }
}

/// Build the notifier selected in the configuration
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    let http = || {
        Client::builder()
            .user_agent(concat!("cas-task-cleaner/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
    };

    let notifier: Arc<dyn Notifier> = match config.kind {
        NotifierKind::Log => Arc::new(LogNotifier),
        NotifierKind::Telegram => {
            let token = config
                .telegram_bot_token
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| NotifyError::Config("telegram_bot_token is empty".to_string()))?;
            let chat_id = config
                .telegram_chat_id
                .as_deref()
                .filter(|c| !c.is_empty())
                .ok_or_else(|| NotifyError::Config("telegram_chat_id is empty".to_string()))?;
            Arc::new(TelegramNotifier::new(http()?, token, chat_id))
        }
        NotifierKind::Webhook => {
            let url = config
                .webhook_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| NotifyError::Config("webhook_url is empty".to_string()))?;
            Arc::new(WebhookNotifier::new(http()?, url))
        }
    };

    Ok(notifier)
}
