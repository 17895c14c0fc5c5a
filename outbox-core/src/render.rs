//! Renderer: walks the node tree, accumulates the pending payload, and decides flush points.
//!
//! The walk is depth-first, left to right, and fully sequential: at most one API call is in
//! flight at any time, which is what preserves call order. A [`Sender`] is disposable: one
//! instance renders one top-level send and is then consumed.

use crate::asset::AssetResolver;
use crate::dispatch::{dispatch_asset, AssetCall, ChatApi, SendResult, TextCall};
use crate::node::{Node, NodeKind};
use crate::outcome::{AggregateFailure, CallLog};
use crate::payload::{AssetSlot, FormatMode, PendingPayload};
use std::future::Future;
use std::pin::Pin;
use tracing::{info, instrument, warn};

/// Renders one node tree into an ordered sequence of send calls against a [`ChatApi`].
///
/// Failed calls are recorded and the walk continues; the aggregate failure (if any) is
/// surfaced once at the end.
pub struct Sender<'a> {
    api: &'a dyn ChatApi,
    resolver: AssetResolver,
    payload: PendingPayload,
    log: CallLog,
}

impl<'a> Sender<'a> {
    pub fn new(api: &'a dyn ChatApi, chat_id: impl Into<String>) -> Self {
        Self::with_resolver(api, chat_id, AssetResolver::default())
    }

    /// Creates a sender with a custom resolver (e.g. a different sniffing backend).
    pub fn with_resolver(
        api: &'a dyn ChatApi,
        chat_id: impl Into<String>,
        resolver: AssetResolver,
    ) -> Self {
        Self {
            api,
            resolver,
            payload: PendingPayload::new(chat_id),
            log: CallLog::new(),
        }
    }

    /// Renders the tree and returns the ordered results, or one combined failure wrapping
    /// every call that failed. Consumes the sender.
    #[instrument(skip(self, nodes), fields(chat_id = %self.payload.chat_id()))]
    pub async fn send(mut self, nodes: &[Node]) -> Result<Vec<SendResult>, AggregateFailure> {
        self.walk(nodes).await;
        // Final unconditional flush once the whole tree is consumed.
        self.flush().await;
        self.log.finish()
    }

    /// Visits a node sequence. Boxed because nested `message` and container nodes recurse.
    fn walk<'s>(
        &'s mut self,
        nodes: &'s [Node],
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 's>> {
        Box::pin(async move {
            for node in nodes {
                self.visit(node).await;
            }
        })
    }

    async fn visit(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Text => {
                if let Some(content) = node.attr("content") {
                    self.payload.push_text(content);
                }
            }
            NodeKind::At => {
                // Mention target fallback: name, id, role, type. Nothing if all absent.
                let target = node
                    .attr("name")
                    .or_else(|| node.attr("id"))
                    .or_else(|| node.attr("role"))
                    .or_else(|| node.attr("type"));
                if let Some(target) = target {
                    self.payload.push_text(&format!("@{} ", target));
                }
            }
            NodeKind::Sharp => {
                let target = node.attr("name").or_else(|| node.attr("id"));
                if let Some(target) = target {
                    self.payload.push_text(&format!("#{} ", target));
                }
            }
            NodeKind::Image => {
                self.free_slot().await;
                if let Some(reference) = node.attr("url").or_else(|| node.attr("src")) {
                    let slot = if self.resolver.is_animated(reference) {
                        AssetSlot::Animation
                    } else {
                        AssetSlot::Photo
                    };
                    self.payload.set_asset(slot, reference);
                }
            }
            NodeKind::Audio => {
                self.free_slot().await;
                if let Some(reference) = node.attr("url").or_else(|| node.attr("src")) {
                    self.payload.set_asset(AssetSlot::Audio, reference);
                }
            }
            NodeKind::Video => {
                self.free_slot().await;
                if let Some(reference) = node.attr("url").or_else(|| node.attr("src")) {
                    self.payload.set_asset(AssetSlot::Video, reference);
                }
            }
            NodeKind::File => {
                self.free_slot().await;
                if let Some(reference) = node.attr("url").or_else(|| node.attr("src")) {
                    self.payload.set_asset(AssetSlot::Document, reference);
                }
            }
            NodeKind::Quote => {
                self.flush().await;
                if let Some(id) = node.attr("id") {
                    self.payload.set_reply_to(id);
                }
            }
            NodeKind::Message => {
                self.flush().await;
                if node.attrs.contains_key("quote") {
                    // Quoted message boundary: becomes the reply target, children skipped.
                    if let Some(id) = node.attr("id") {
                        self.payload.set_reply_to(id);
                    }
                } else {
                    // Shared accumulator: the nested message reuses this payload and the
                    // trailing flush bounds whatever it accumulated.
                    self.walk(&node.children).await;
                    self.flush().await;
                }
            }
            NodeKind::Markdown => {
                self.flush().await;
                self.payload.set_mode(FormatMode::MarkdownV2);
            }
            NodeKind::Html => {
                self.flush().await;
                self.payload.set_mode(FormatMode::Html);
            }
            NodeKind::Other(_) => {
                // Transparent container: children share the accumulation context.
                self.walk(&node.children).await;
            }
        }
    }

    /// Flushes only when the attachment slot is occupied, so a new attachment can take it.
    /// Text accumulated so far stays pending and becomes the new attachment's caption.
    async fn free_slot(&mut self) {
        if self.payload.has_asset() {
            self.flush().await;
        }
    }

    /// Materializes the pending payload into at most one API call: an attachment send if the
    /// slot is occupied, else a text send if the caption is non-empty, else nothing. Clears
    /// caption, attachment and reply target; format mode persists.
    async fn flush(&mut self) {
        if let Some((slot, reference)) = self.payload.take_asset() {
            let chat_id = self.payload.chat_id().to_string();
            let caption = self.payload.take_caption();
            let mode = self.payload.mode();
            let reply_to = self.payload.take_reply_to();
            let outcome = match self.resolver.resolve(&reference, slot) {
                Ok(source) => {
                    info!(
                        chat_id = %chat_id,
                        slot = slot.as_str(),
                        call_index = self.log.next_index(),
                        "step: dispatching attachment send"
                    );
                    let call = AssetCall {
                        chat_id,
                        caption,
                        mode,
                        reply_to,
                        source,
                    };
                    dispatch_asset(self.api, slot, call).await
                }
                Err(error) => Err(error),
            };
            self.record(outcome);
        } else if !self.payload.caption_is_empty() {
            let call = TextCall {
                chat_id: self.payload.chat_id().to_string(),
                text: self.payload.take_caption(),
                mode: self.payload.mode(),
                reply_to: self.payload.take_reply_to(),
            };
            info!(
                chat_id = %call.chat_id,
                call_index = self.log.next_index(),
                "step: dispatching text send"
            );
            let outcome = self.api.send_text(call).await;
            self.record(outcome);
        }
    }

    fn record(&mut self, outcome: crate::error::Result<SendResult>) {
        if let Err(error) = &outcome {
            warn!(
                error = %error,
                call_index = self.log.next_index(),
                "Send call failed; continuing render"
            );
        }
        self.log.record(outcome);
    }
}
