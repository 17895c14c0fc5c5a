//! Message node tree: the input to the renderer.
//!
//! Nodes come from an external markup parser; this crate only consumes them. [`NodeKind`] is a
//! closed enum so every branch over node kinds is exhaustive; adding a kind fails to compile
//! until the renderer handles it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a message node. Unknown tags end up in `Other` and are treated as
/// transparent containers by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Text,
    At,
    Sharp,
    Image,
    Audio,
    Video,
    File,
    Quote,
    Message,
    Markdown,
    Html,
    Other(String),
}

/// One node in the message tree: kind, string attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with no attributes and no children.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// A literal text fragment.
    pub fn text(content: impl Into<String>) -> Self {
        Node::new(NodeKind::Text).with_attr("content", content)
    }

    /// A mention (`@user`). Target attributes: `name`, `id`, `role`, `type`.
    pub fn at() -> Self {
        Node::new(NodeKind::At)
    }

    /// A hashtag (`#tag`). Target attributes: `name`, `id`.
    pub fn sharp() -> Self {
        Node::new(NodeKind::Sharp)
    }

    /// An image attachment referencing `url`.
    pub fn image(url: impl Into<String>) -> Self {
        Node::new(NodeKind::Image).with_attr("url", url)
    }

    /// An audio attachment referencing `url`.
    pub fn audio(url: impl Into<String>) -> Self {
        Node::new(NodeKind::Audio).with_attr("url", url)
    }

    /// A video attachment referencing `url`.
    pub fn video(url: impl Into<String>) -> Self {
        Node::new(NodeKind::Video).with_attr("url", url)
    }

    /// A generic file attachment referencing `url`.
    pub fn file(url: impl Into<String>) -> Self {
        Node::new(NodeKind::File).with_attr("url", url)
    }

    /// A quote of the message with the given id (reply target).
    pub fn quote(id: impl Into<String>) -> Self {
        Node::new(NodeKind::Quote).with_attr("id", id)
    }

    /// A nested message boundary.
    pub fn message() -> Self {
        Node::new(NodeKind::Message)
    }

    /// Switches subsequent text sends to MarkdownV2.
    pub fn markdown() -> Self {
        Node::new(NodeKind::Markdown)
    }

    /// Switches subsequent text sends to HTML.
    pub fn html() -> Self {
        Node::new(NodeKind::Html)
    }

    /// A node with an unrecognized tag; rendered as a transparent container.
    pub fn other(tag: impl Into<String>) -> Self {
        Node::new(NodeKind::Other(tag.into()))
    }

    /// Sets one attribute, builder style.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Sets the children, builder style.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Returns the attribute value if present and non-empty. Empty strings count as absent.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}
