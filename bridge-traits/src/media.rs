//! Session-scoped media handles.
//!
//! Uploaded audio files and cover images are never copied into the persisted
//! collection. The host registers the raw bytes and hands back an opaque
//! [`MediaRef`] (an object URL in the browser) that is only valid for the
//! lifetime of the current page or process. Records keep the reference after a
//! reload, so consumers must check [`MediaRegistry::is_available`] before
//! treating a reference as playable or displayable.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::Result, platform::PlatformSendSync};

/// Opaque reference to host-held binary content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a registered upload is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Image,
}

/// A user-selected file as delivered by the host's file picker.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Original file name including its extension.
    pub file_name: String,
    /// MIME type reported by the picker, when known.
    pub mime_type: Option<String>,
    /// Raw file content.
    pub data: Bytes,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Registry that turns uploads into session-scoped references.
///
/// - Web: `URL.createObjectURL(blob)` / `URL.revokeObjectURL`
/// - Desktop: in-memory table keyed by generated handles
pub trait MediaRegistry: PlatformSendSync {
    /// Register uploaded content and return a reference to it.
    fn register(&self, kind: MediaKind, upload: &MediaUpload) -> Result<MediaRef>;

    /// Whether `media` still resolves to content in this session.
    fn is_available(&self, media: &MediaRef) -> bool;

    /// Release the content behind `media`. Releasing an unknown reference
    /// succeeds.
    fn release(&self, media: &MediaRef) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_ref_serializes_as_plain_string() {
        let media = MediaRef::new("blob:http://localhost/1234");
        let json = serde_json::to_string(&media).unwrap();
        assert_eq!(json, "\"blob:http://localhost/1234\"");

        let back: MediaRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, media);
        assert_eq!(back.to_string(), "blob:http://localhost/1234");
    }

    #[test]
    fn upload_builder_sets_mime_type() {
        let upload = MediaUpload::new("song.mp3", vec![1u8, 2, 3]).with_mime_type("audio/mpeg");
        assert_eq!(upload.file_name, "song.mp3");
        assert_eq!(upload.mime_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(upload.data.len(), 3);
    }
}
