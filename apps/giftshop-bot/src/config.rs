use anyhow::{Context, Result};
use std::path::PathBuf;
use teloxide::types::ChatId;
use url::Url;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub usdt_wallet_address: String,
    pub card_details: String,
    pub welcome_image_url: Option<Url>,
    pub instructions_dir: PathBuf,
    pub support_email: String,
    pub support_telegram: String,
    /// Chat that receives payment proof; hand-off is off when unset.
    pub operator_chat_id: Option<ChatId>,
    pub log_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).with_context(|| format!("{} is not set", key));

        let welcome_image_url = match var("WELCOME_IMAGE_URL") {
            Some(raw) => Some(
                Url::parse(&raw).with_context(|| format!("Invalid WELCOME_IMAGE_URL: {}", raw))?,
            ),
            None => None,
        };

        let operator_chat_id = match var("OPERATOR_CHAT_ID") {
            Some(raw) => Some(ChatId(
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("Invalid OPERATOR_CHAT_ID format: {}", raw))?,
            )),
            None => None,
        };

        Ok(Self {
            token: required("BOT_TOKEN")?,
            usdt_wallet_address: required("USDT_WALLET_ADDRESS")?,
            card_details: required("CARD_DETAILS")?,
            welcome_image_url,
            instructions_dir: var("INSTRUCTIONS_DIR")
                .unwrap_or_else(|| "instructions".to_string())
                .into(),
            support_email: var("SUPPORT_EMAIL").unwrap_or_else(|| "support@example.com".to_string()),
            support_telegram: var("SUPPORT_TELEGRAM").unwrap_or_else(|| "@support_bot".to_string()),
            operator_chat_id,
            log_dir: log_dir_from(var("LOG_DIR")),
        })
    }

    #[cfg(test)]
    pub fn sample() -> Self {
        Self {
            token: "123:TEST".to_string(),
            usdt_wallet_address: "TTestWalletAddress123".to_string(),
            card_details: "Card: 2200 0000 0000 0000".to_string(),
            welcome_image_url: None,
            instructions_dir: "instructions".into(),
            support_email: "support@example.com".to_string(),
            support_telegram: "@support_bot".to_string(),
            operator_chat_id: None,
            log_dir: ".".into(),
        }
    }
}

/// Logging starts before the rest of the config is validated.
pub fn log_dir_from(raw: Option<String>) -> PathBuf {
    raw.unwrap_or_else(|| ".".to_string()).into()
}
