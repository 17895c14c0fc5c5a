//! # outbox-telegram
//!
//! Telegram transport for outbox-core: [`TelegramApi`] implements the six [`outbox_core::ChatApi`]
//! send operations via teloxide, plus recipient parsing and minimal env-driven config.
//! Handles only Telegram connectivity; rendering and batching live in outbox-core.

mod api;
mod config;

pub use api::{parse_recipient, TelegramApi};
pub use config::TelegramConfig;

use anyhow::Result;

/// Builds a [`TelegramApi`] from config, honoring a custom API server URL when set.
pub fn api_from_config(config: &TelegramConfig) -> Result<TelegramApi> {
    let mut bot = teloxide::Bot::new(config.bot_token.clone());
    if let Some(raw) = &config.telegram_api_url {
        let url = url::Url::parse(raw)
            .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL {}: {}", raw, e))?;
        bot = bot.set_api_url(url);
    }
    Ok(TelegramApi::new(bot))
}
