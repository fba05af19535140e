//! Object-URL media registry.
//!
//! Uploaded bytes become a `Blob` and are exposed through
//! `URL.createObjectURL`. Such URLs only live as long as the document, so a
//! reference persisted before a reload is no longer known here and reports
//! as unavailable.

use std::cell::RefCell;
use std::collections::HashSet;

use bridge_traits::{
    error::Result as BridgeResult,
    media::{MediaKind, MediaRef, MediaRegistry, MediaUpload},
};
use tracing::debug;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::error::js_error;

/// [`MediaRegistry`] handing out `blob:` URLs for the current document.
#[derive(Default)]
pub struct BlobMediaRegistry {
    live: RefCell<HashSet<MediaRef>>,
}

impl BlobMediaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of object URLs created and not yet revoked.
    pub fn len(&self) -> usize {
        self.live.borrow().len()
    }

    /// Whether no object URL is currently live.
    pub fn is_empty(&self) -> bool {
        self.live.borrow().is_empty()
    }
}

impl MediaRegistry for BlobMediaRegistry {
    fn register(&self, kind: MediaKind, upload: &MediaUpload) -> BridgeResult<MediaRef> {
        let bytes = js_sys::Uint8Array::from(upload.data.as_ref());
        let parts = js_sys::Array::of1(&bytes);

        let options = BlobPropertyBag::new();
        if let Some(mime_type) = &upload.mime_type {
            options.set_type(mime_type);
        }

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|err| js_error("create blob", err))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|err| js_error("createObjectURL", err))?;

        let media = MediaRef::new(url);
        self.live.borrow_mut().insert(media.clone());
        debug!(
            ?kind,
            media = %media,
            file = %upload.file_name,
            size = upload.data.len(),
            "Created object URL"
        );
        Ok(media)
    }

    fn is_available(&self, media: &MediaRef) -> bool {
        self.live.borrow().contains(media)
    }

    fn release(&self, media: &MediaRef) -> BridgeResult<()> {
        if self.live.borrow_mut().remove(media) {
            Url::revoke_object_url(media.as_str())
                .map_err(|err| js_error("revokeObjectURL", err))?;
            debug!(media = %media, "Revoked object URL");
        }
        Ok(())
    }
}
