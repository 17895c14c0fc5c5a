//! Dispatcher seam: the six chat API send operations behind an async trait.
//!
//! [`ChatApi`] is transport-agnostic; outbox-telegram implements it via teloxide and tests
//! substitute a recording implementation. [`dispatch_asset`] is the static 1:1 map from
//! attachment slot to operation.

use crate::asset::AssetSource;
use crate::error::Result;
use crate::payload::{AssetSlot, FormatMode};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque per-call record returned by the API. Order-preserved across one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// API-assigned message id.
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
}

/// A finalized plain-text send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCall {
    pub chat_id: String,
    pub text: String,
    pub mode: Option<FormatMode>,
    pub reply_to: Option<String>,
}

/// A finalized single-attachment send: caption plus exactly one resolved source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCall {
    pub chat_id: String,
    pub caption: String,
    pub mode: Option<FormatMode>,
    pub reply_to: Option<String>,
    pub source: AssetSource,
}

/// The chat API's send surface: one plain-text operation and five attachment operations,
/// mutually exclusive per call. Implementations execute exactly one network call per method
/// invocation, without retries, and return the API's result or error verbatim.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_text(&self, call: TextCall) -> Result<SendResult>;
    async fn send_photo(&self, call: AssetCall) -> Result<SendResult>;
    async fn send_audio(&self, call: AssetCall) -> Result<SendResult>;
    async fn send_document(&self, call: AssetCall) -> Result<SendResult>;
    async fn send_video(&self, call: AssetCall) -> Result<SendResult>;
    async fn send_animation(&self, call: AssetCall) -> Result<SendResult>;
}

/// Maps an occupied attachment slot to its send operation. Exhaustive: a new slot cannot
/// compile without an operation.
pub async fn dispatch_asset(
    api: &dyn ChatApi,
    slot: AssetSlot,
    call: AssetCall,
) -> Result<SendResult> {
    match slot {
        AssetSlot::Photo => api.send_photo(call).await,
        AssetSlot::Audio => api.send_audio(call).await,
        AssetSlot::Document => api.send_document(call).await,
        AssetSlot::Video => api.send_video(call).await,
        AssetSlot::Animation => api.send_animation(call).await,
    }
}
