//! Byte-buffer MIME sniffing capability.
//!
//! The resolver only needs "bytes → optional file extension"; implementations can wrap any
//! sniffing backend. [`MagicSniffer`] is the built-in default covering the formats the chat
//! API cares about.

/// Maps a byte buffer to a file extension, if the format is recognizable.
pub trait SniffMime: Send + Sync {
    fn sniff(&self, bytes: &[u8]) -> Option<&'static str>;
}

/// Magic-byte signature table for common image/audio/video/document formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

impl SniffMime for MagicSniffer {
    fn sniff(&self, bytes: &[u8]) -> Option<&'static str> {
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some("gif")
        } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some("png")
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some("jpg")
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some("webp")
        } else if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
            Some("mp4")
        } else if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            Some("webm")
        } else if bytes.starts_with(b"OggS") {
            Some("ogg")
        } else if bytes.starts_with(b"ID3") || bytes.starts_with(&[0xFF, 0xFB]) {
            Some("mp3")
        } else if bytes.starts_with(b"%PDF") {
            Some("pdf")
        } else if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            Some("zip")
        } else {
            None
        }
    }
}
