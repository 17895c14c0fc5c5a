//! # outbox-core
//!
//! Renders an ordered tree of typed message nodes into a minimal, correctly ordered sequence
//! of chat API send calls: [`Sender`] walks the tree and decides flush points, [`AssetResolver`]
//! resolves attachment references, [`ChatApi`] is the transport seam (six operations), and
//! [`CallLog`] collects per-call outcomes into either ordered results or one combined failure.
//! Transport-agnostic; outbox-telegram maps the seam onto teloxide.

pub mod asset;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod node;
pub mod outcome;
pub mod payload;
pub mod render;
pub mod sniff;

pub use asset::{AssetResolver, AssetSource, ReferenceKind};
pub use dispatch::{dispatch_asset, AssetCall, ChatApi, SendResult, TextCall};
pub use error::{Result, SendError};
pub use logger::init_tracing;
pub use node::{Node, NodeKind};
pub use outcome::{AggregateFailure, CallLog};
pub use payload::{AssetSlot, FormatMode, PendingPayload};
pub use render::Sender;
pub use sniff::{MagicSniffer, SniffMime};
