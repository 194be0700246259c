//! Alert delivery over the Telegram Bot API

use async_trait::async_trait;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::error::NotificationError;
use crate::modules::LiquidityChange;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Delivers alert text to a fixed destination
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotificationError>;
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram notifier for a single chat
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    pub fn new(config: &Config) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        info!(target: "ALERTS", "Telegram bot initialized");

        Ok(Self {
            client,
            bot_token: config.telegram_bot_token.clone(),
            chat_id: config.telegram_chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API, self.bot_token);
        let params = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
            "disable_web_page_preview": true,
        });

        let response = self.client.post(&url).json(&params).send().await?;
        let status = response.status();
        let body: TelegramResponse = response.json().await?;

        if !status.is_success() || !body.ok {
            return Err(NotificationError::Rejected(
                body.description
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            ));
        }

        Ok(())
    }
}

/// Render the alert text for a detected liquidity change
pub fn format_liquidity_alert(pool_id: &Pubkey, change: &LiquidityChange) -> String {
    format!(
        "🚨 Liquidity change alert!\n\nPool: {}\nBase reserve: {:.4} -> {:.4} ({:+.2}%)\nQuote reserve: {:.4}",
        pool_id,
        change.previous_base,
        change.current_base,
        change.signed_percent(),
        change.current_quote
    )
}
