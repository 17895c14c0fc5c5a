//! Pending payload: the per-destination accumulator the renderer mutates as it walks the tree.

use serde::{Deserialize, Serialize};

/// The five attachment slots the chat API distinguishes. At most one is occupied per payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetSlot {
    Photo,
    Audio,
    Document,
    Video,
    Animation,
}

impl AssetSlot {
    /// Field/operation name the API knows the slot by.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSlot::Photo => "photo",
            AssetSlot::Audio => "audio",
            AssetSlot::Document => "document",
            AssetSlot::Video => "video",
            AssetSlot::Animation => "animation",
        }
    }
}

/// Parse mode for text and captions. Absent means plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatMode {
    MarkdownV2,
    Html,
}

/// Accumulator for one in-flight send: caption text, at most one attachment reference,
/// an optional reply target, and the current format mode.
///
/// The chat id is fixed for the payload's lifetime. A flush clears caption, attachment and
/// reply target; the format mode persists until the render ends.
#[derive(Debug, Clone)]
pub struct PendingPayload {
    chat_id: String,
    caption: String,
    asset: Option<(AssetSlot, String)>,
    reply_to: Option<String>,
    mode: Option<FormatMode>,
}

impl PendingPayload {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            caption: String::new(),
            asset: None,
            reply_to: None,
            mode: None,
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Appends a text fragment to the caption buffer.
    pub fn push_text(&mut self, fragment: &str) {
        self.caption.push_str(fragment);
    }

    pub fn caption_is_empty(&self) -> bool {
        self.caption.is_empty()
    }

    /// Takes the caption, leaving the buffer empty.
    pub fn take_caption(&mut self) -> String {
        std::mem::take(&mut self.caption)
    }

    /// Occupies the attachment slot with a raw, unresolved reference.
    /// Callers must flush first; the slot must be empty.
    pub fn set_asset(&mut self, slot: AssetSlot, reference: impl Into<String>) {
        debug_assert!(self.asset.is_none(), "attachment slot already occupied");
        self.asset = Some((slot, reference.into()));
    }

    pub fn has_asset(&self) -> bool {
        self.asset.is_some()
    }

    pub fn take_asset(&mut self) -> Option<(AssetSlot, String)> {
        self.asset.take()
    }

    pub fn set_reply_to(&mut self, id: impl Into<String>) {
        self.reply_to = Some(id.into());
    }

    pub fn take_reply_to(&mut self) -> Option<String> {
        self.reply_to.take()
    }

    pub fn set_mode(&mut self, mode: FormatMode) {
        self.mode = Some(mode);
    }

    pub fn mode(&self) -> Option<FormatMode> {
        self.mode
    }
}
