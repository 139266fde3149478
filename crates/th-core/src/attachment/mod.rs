//! Transient binary attachments and their preview handles.
//!
//! Attachments (intro video, profile photo) exist only for the lifetime of a
//! wizard session. A preview handle is acquired when an attachment is set on
//! the draft and released when it is cleared or the wizard is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Identifier of one selected attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentId(Uuid);

impl AttachmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque binary attachment reference.
#[derive(Clone, PartialEq)]
pub struct Attachment {
    id: AttachmentId,
    file_name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id: AttachmentId::new(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn id(&self) -> AttachmentId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Registry of live preview handles.
///
/// Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashMap<Uuid, AttachmentId>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a preview handle for `attachment`.
    pub fn acquire(&self, attachment: &Attachment) -> PreviewHandle {
        let preview_id = Uuid::new_v4();
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(preview_id, attachment.id());

        #[cfg(feature = "tracing")]
        tracing::debug!(%preview_id, attachment_id = %attachment.id(), "preview handle acquired");

        PreviewHandle {
            preview_id,
            attachment_id: attachment.id(),
            registry: self.clone(),
        }
    }

    /// Number of handles not yet released.
    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_live(&self, attachment_id: AttachmentId) -> bool {
        self.live
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .any(|id| *id == attachment_id)
    }

    fn release(&self, preview_id: Uuid) {
        if let Ok(mut live) = self.live.lock() {
            live.remove(&preview_id);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%preview_id, "preview handle released");
    }
}

/// Scoped preview of an attachment. Released on drop.
pub struct PreviewHandle {
    preview_id: Uuid,
    attachment_id: AttachmentId,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn attachment_id(&self) -> AttachmentId {
        self.attachment_id
    }

    /// Session-local URL the UI can render the preview from.
    pub fn url(&self) -> String {
        format!("preview://{}", self.preview_id)
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("preview_id", &self.preview_id)
            .field("attachment_id", &self.attachment_id)
            .finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.preview_id);
    }
}
