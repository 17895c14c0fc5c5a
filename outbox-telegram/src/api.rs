//! Wraps teloxide::Bot and implements [`outbox_core::ChatApi`]. Production code sends via
//! Telegram; tests substitute a recording ChatApi instead.

use async_trait::async_trait;
use chrono::Utc;
use outbox_core::{AssetCall, AssetSource, ChatApi, FormatMode, Result, SendError, SendResult, TextCall};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, MessageId, ParseMode, Recipient, ReplyParameters};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements outbox-core's ChatApi trait.
pub struct TelegramApi {
    bot: teloxide::Bot,
}

impl TelegramApi {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Creates a bot using the given Telegram bot token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(teloxide::Bot::new(token))
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// Parses a destination into a teloxide recipient: numeric chat id or `@channel` username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

/// Parses a reply-to message id string into reply parameters. Telegram ids are numeric.
fn parse_reply_parameters(message_id: &str) -> Result<ReplyParameters> {
    let id: i32 = message_id.parse().map_err(|_| {
        SendError::Api(format!("Invalid reply_to message id: {}", message_id))
    })?;
    Ok(ReplyParameters::new(MessageId(id)))
}

fn to_parse_mode(mode: FormatMode) -> ParseMode {
    match mode {
        FormatMode::MarkdownV2 => ParseMode::MarkdownV2,
        FormatMode::Html => ParseMode::Html,
    }
}

/// Maps a resolved asset source to a teloxide InputFile. Local paths become streamed file
/// uploads; teloxide owns the handle from here on.
fn to_input_file(source: AssetSource) -> Result<InputFile> {
    match source {
        AssetSource::Url(raw) => {
            let url = url::Url::parse(&raw)
                .map_err(|e| SendError::Asset(format!("Invalid remote url {}: {}", raw, e)))?;
            Ok(InputFile::url(url))
        }
        AssetSource::Path(path) => Ok(InputFile::file(path)),
        AssetSource::Bytes { data, filename } => Ok(InputFile::memory(data).file_name(filename)),
    }
}

fn to_send_result(sent: &teloxide::types::Message) -> SendResult {
    SendResult {
        message_id: sent.id.to_string(),
        sent_at: Utc::now(),
    }
}

macro_rules! send_asset_op {
    ($self:ident, $call:ident, $method:ident, $op:literal) => {{
        debug!(chat_id = %$call.chat_id, op = $op, "step: telegram send");
        let input = to_input_file($call.source)?;
        let mut request = $self.bot.$method(parse_recipient(&$call.chat_id), input);
        if !$call.caption.is_empty() {
            request = request.caption($call.caption);
        }
        if let Some(mode) = $call.mode {
            request = request.parse_mode(to_parse_mode(mode));
        }
        if let Some(reply_to) = &$call.reply_to {
            request = request.reply_parameters(parse_reply_parameters(reply_to)?);
        }
        let sent = request.await.map_err(|e| SendError::Api(e.to_string()))?;
        Ok(to_send_result(&sent))
    }};
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn send_text(&self, call: TextCall) -> Result<SendResult> {
        debug!(chat_id = %call.chat_id, op = "sendMessage", "step: telegram send");
        let mut request = self.bot.send_message(parse_recipient(&call.chat_id), call.text);
        if let Some(mode) = call.mode {
            request = request.parse_mode(to_parse_mode(mode));
        }
        if let Some(reply_to) = &call.reply_to {
            request = request.reply_parameters(parse_reply_parameters(reply_to)?);
        }
        let sent = request.await.map_err(|e| SendError::Api(e.to_string()))?;
        Ok(to_send_result(&sent))
    }

    async fn send_photo(&self, call: AssetCall) -> Result<SendResult> {
        send_asset_op!(self, call, send_photo, "sendPhoto")
    }

    async fn send_audio(&self, call: AssetCall) -> Result<SendResult> {
        send_asset_op!(self, call, send_audio, "sendAudio")
    }

    async fn send_document(&self, call: AssetCall) -> Result<SendResult> {
        send_asset_op!(self, call, send_document, "sendDocument")
    }

    async fn send_video(&self, call: AssetCall) -> Result<SendResult> {
        send_asset_op!(self, call, send_video, "sendVideo")
    }

    async fn send_animation(&self, call: AssetCall) -> Result<SendResult> {
        send_asset_op!(self, call, send_animation, "sendAnimation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_token() {
        let _api = TelegramApi::from_token("dummy_token");
    }

    #[test]
    fn test_parse_recipient_numeric() {
        assert_eq!(parse_recipient("123"), Recipient::Id(ChatId(123)));
        assert_eq!(parse_recipient("-1001"), Recipient::Id(ChatId(-1001)));
    }

    #[test]
    fn test_parse_recipient_channel_username() {
        assert_eq!(
            parse_recipient("@channel"),
            Recipient::ChannelUsername("@channel".to_string())
        );
    }

    #[test]
    fn test_parse_reply_parameters() {
        assert!(parse_reply_parameters("42").is_ok());
        assert!(parse_reply_parameters("not-a-number").is_err());
    }

    #[test]
    fn test_to_input_file_rejects_bad_url() {
        let err = to_input_file(AssetSource::Url("not a url".to_string())).unwrap_err();
        assert!(err.to_string().contains("Invalid remote url"));
    }

    #[test]
    fn test_to_input_file_accepts_path_and_bytes() {
        assert!(to_input_file(AssetSource::Path(PathBuf::from("/tmp/a.gif"))).is_ok());
        assert!(to_input_file(AssetSource::Bytes {
            data: b"hello".to_vec(),
            filename: "file".to_string(),
        })
        .is_ok());
    }
}
