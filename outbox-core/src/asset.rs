//! Attachment-reference resolution.
//!
//! [`ReferenceKind`] classifies a URI-like reference by literal prefix; [`AssetResolver`] turns
//! a classified reference into an [`AssetSource`] the transport can send, and classifies images
//! as static vs animated. Remote URLs are never fetched.

use crate::error::{Result, SendError};
use crate::payload::AssetSlot;
use crate::sniff::{MagicSniffer, SniffMime};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::PathBuf;
use tracing::warn;

/// Default filename used when nothing better can be sniffed.
const DEFAULT_FILENAME: &str = "file";

/// Classification of an attachment reference. Only the first three kinds resolve to
/// bytes/paths; anything else passes through as a plain URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind<'a> {
    /// `file://...` or `file:...`: a local filesystem path.
    LocalFile(&'a str),
    /// `base64:...`: inline base64 payload.
    InlineBase64(&'a str),
    /// `data:...;base64,...`: the segment after the `base64,` marker.
    DataUri(&'a str),
    /// Any other scheme; passed through unresolved.
    RemoteUrl(&'a str),
}

impl<'a> ReferenceKind<'a> {
    /// Triage by literal prefix. No parsing beyond prefix/marker checks.
    pub fn classify(reference: &'a str) -> Self {
        if let Some(path) = reference.strip_prefix("file://") {
            ReferenceKind::LocalFile(path)
        } else if let Some(path) = reference.strip_prefix("file:") {
            ReferenceKind::LocalFile(path)
        } else if let Some(payload) = reference.strip_prefix("base64:") {
            ReferenceKind::InlineBase64(payload)
        } else if reference.starts_with("data:") {
            match reference.split_once("base64,") {
                Some((_, payload)) => ReferenceKind::DataUri(payload),
                None => ReferenceKind::RemoteUrl(reference),
            }
        } else {
            ReferenceKind::RemoteUrl(reference)
        }
    }
}

/// What the transport receives for one attachment: a passthrough URL, a local path it can
/// stream itself (and whose handle it owns), or decoded bytes with a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Url(String),
    Path(PathBuf),
    Bytes { data: Vec<u8>, filename: String },
}

/// Resolves attachment references and classifies images as photo vs animation.
pub struct AssetResolver {
    sniffer: Box<dyn SniffMime>,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(Box::new(MagicSniffer))
    }
}

impl AssetResolver {
    pub fn new(sniffer: Box<dyn SniffMime>) -> Self {
        Self { sniffer }
    }

    /// Resolves a reference for the given slot. Local files stay paths (the transport streams
    /// them), inline/data references are decoded, everything else passes through as a URL.
    pub fn resolve(&self, reference: &str, slot: AssetSlot) -> Result<AssetSource> {
        match ReferenceKind::classify(reference) {
            ReferenceKind::LocalFile(path) => Ok(AssetSource::Path(PathBuf::from(path))),
            ReferenceKind::InlineBase64(payload) | ReferenceKind::DataUri(payload) => {
                let data = STANDARD.decode(payload).map_err(|e| {
                    SendError::Asset(format!("Invalid base64 in {} reference: {}", slot.as_str(), e))
                })?;
                let filename = self.filename_for(slot, &data);
                Ok(AssetSource::Bytes { data, filename })
            }
            ReferenceKind::RemoteUrl(url) => Ok(AssetSource::Url(url.to_string())),
        }
    }

    /// Default filename, sniffed to `file.<ext>` only for the document slot.
    fn filename_for(&self, slot: AssetSlot, data: &[u8]) -> String {
        if slot != AssetSlot::Document {
            return DEFAULT_FILENAME.to_string();
        }
        match self.sniffer.sniff(data) {
            Some(ext) => format!("{}.{}", DEFAULT_FILENAME, ext),
            None => {
                warn!(
                    slot = slot.as_str(),
                    "Could not sniff a MIME type for document bytes; keeping default filename"
                );
                DEFAULT_FILENAME.to_string()
            }
        }
    }

    /// True if the reference is an animated image. A literal `.gif` suffix (any case) decides
    /// immediately; inline/data references are decoded and sniffed; remote URLs are never
    /// fetched and therefore classify as static.
    pub fn is_animated(&self, reference: &str) -> bool {
        if reference.to_ascii_lowercase().ends_with(".gif") {
            return true;
        }
        match ReferenceKind::classify(reference) {
            ReferenceKind::InlineBase64(payload) | ReferenceKind::DataUri(payload) => STANDARD
                .decode(payload)
                .ok()
                .map(|data| self.sniffer.sniff(&data) == Some("gif"))
                .unwrap_or(false),
            ReferenceKind::LocalFile(_) | ReferenceKind::RemoteUrl(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64 of b"GIF87a"
    const GIF_B64: &str = "R0lGODdh";
    // base64 of the 8-byte PNG signature
    const PNG_B64: &str = "iVBORw0KGgo=";

    #[test]
    fn test_classify_local_file() {
        assert_eq!(
            ReferenceKind::classify("file:///tmp/a.gif"),
            ReferenceKind::LocalFile("/tmp/a.gif")
        );
        assert_eq!(
            ReferenceKind::classify("file:/tmp/b.png"),
            ReferenceKind::LocalFile("/tmp/b.png")
        );
    }

    #[test]
    fn test_classify_inline_and_data() {
        assert_eq!(
            ReferenceKind::classify("base64:aGVsbG8="),
            ReferenceKind::InlineBase64("aGVsbG8=")
        );
        assert_eq!(
            ReferenceKind::classify("data:image/png;base64,iVBORw0KGgo="),
            ReferenceKind::DataUri("iVBORw0KGgo=")
        );
        // data: without a base64 marker is not resolvable; passes through
        assert_eq!(
            ReferenceKind::classify("data:text/plain,hello"),
            ReferenceKind::RemoteUrl("data:text/plain,hello")
        );
    }

    #[test]
    fn test_classify_remote_url() {
        assert_eq!(
            ReferenceKind::classify("https://x/y.png"),
            ReferenceKind::RemoteUrl("https://x/y.png")
        );
    }

    #[test]
    fn test_resolve_base64_bytes() {
        let resolver = AssetResolver::default();
        let source = resolver.resolve("base64:aGVsbG8=", AssetSlot::Photo).unwrap();
        assert_eq!(
            source,
            AssetSource::Bytes {
                data: b"hello".to_vec(),
                filename: "file".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_invalid_base64_fails() {
        let resolver = AssetResolver::default();
        let err = resolver.resolve("base64:not base64!", AssetSlot::Photo).unwrap_err();
        assert!(err.to_string().contains("Invalid base64"));
    }

    #[test]
    fn test_resolve_local_file_stays_path() {
        let resolver = AssetResolver::default();
        let source = resolver.resolve("file:///tmp/a.gif", AssetSlot::Animation).unwrap();
        assert_eq!(source, AssetSource::Path(PathBuf::from("/tmp/a.gif")));
    }

    #[test]
    fn test_resolve_remote_url_passthrough() {
        let resolver = AssetResolver::default();
        let source = resolver.resolve("https://x/y.png", AssetSlot::Photo).unwrap();
        assert_eq!(source, AssetSource::Url("https://x/y.png".to_string()));
    }

    #[test]
    fn test_document_filename_sniffed() {
        let resolver = AssetResolver::default();
        let reference = format!("data:image/png;base64,{}", PNG_B64);
        match resolver.resolve(&reference, AssetSlot::Document).unwrap() {
            AssetSource::Bytes { filename, .. } => assert_eq!(filename, "file.png"),
            other => panic!("expected bytes, got {:?}", other),
        }
    }

    #[test]
    fn test_document_filename_inconclusive_keeps_default() {
        let resolver = AssetResolver::default();
        match resolver.resolve("base64:aGVsbG8=", AssetSlot::Document).unwrap() {
            AssetSource::Bytes { filename, .. } => assert_eq!(filename, "file"),
            other => panic!("expected bytes, got {:?}", other),
        }
    }

    #[test]
    fn test_non_document_never_sniffs_filename() {
        let resolver = AssetResolver::default();
        let reference = format!("base64:{}", PNG_B64);
        match resolver.resolve(&reference, AssetSlot::Photo).unwrap() {
            AssetSource::Bytes { filename, .. } => assert_eq!(filename, "file"),
            other => panic!("expected bytes, got {:?}", other),
        }
    }

    #[test]
    fn test_gif_suffix_is_animated_any_case() {
        let resolver = AssetResolver::default();
        assert!(resolver.is_animated("https://x/y.gif"));
        assert!(resolver.is_animated("https://x/y.GIF"));
        assert!(resolver.is_animated("file:///tmp/a.Gif"));
    }

    #[test]
    fn test_inline_gif_bytes_are_animated() {
        let resolver = AssetResolver::default();
        assert!(resolver.is_animated(&format!("base64:{}", GIF_B64)));
        assert!(resolver.is_animated(&format!("data:image/gif;base64,{}", GIF_B64)));
    }

    #[test]
    fn test_inline_png_is_static() {
        let resolver = AssetResolver::default();
        assert!(!resolver.is_animated(&format!("base64:{}", PNG_B64)));
    }

    #[test]
    fn test_remote_url_never_fetched_classifies_static() {
        let resolver = AssetResolver::default();
        assert!(!resolver.is_animated("https://x/maybe-a-gif"));
        assert!(!resolver.is_animated("https://x/y.png"));
    }
}
