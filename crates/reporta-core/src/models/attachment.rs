use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// How an attachment entered the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentOrigin {
    /// Picked from disk through the file input
    Upload,
    /// Confirmed from a live camera capture
    Capture,
}

/// Displayable handle to an image payload (the object-URL equivalent).
///
/// Cheap to clone; all clones observe the same released flag. The owner of the
/// attachment releases the handle when the image leaves the report, and the
/// rendering layer must stop using it afterwards.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    id: Uuid,
    released: Arc<AtomicBool>,
}

impl PreviewHandle {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Release the displayable resource. Idempotent.
    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Default for PreviewHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// One user-supplied evidence item (image or document).
///
/// Lives only in memory for the duration of the form session; removed
/// explicitly, cleared after a successful submission, or dropped with the
/// session.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub id: Uuid,
    pub original_name: String,
    pub content_type: String,
    pub content: Bytes,
    pub origin: AttachmentOrigin,
    pub created_at: DateTime<Utc>,
    preview: Option<PreviewHandle>,
}

impl Attachment {
    /// Attachment from a file picked through the upload input
    pub fn from_upload(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name: original_name.into(),
            content_type: content_type.into(),
            content,
            origin: AttachmentOrigin::Upload,
            created_at: Utc::now(),
            preview: None,
        }
    }

    /// Attachment from an encoded camera frame. The display name is
    /// synthesized from the capture timestamp.
    pub fn from_capture(content: Bytes, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name: format!("photo-{}.jpg", captured_at.timestamp_millis()),
            content_type: "image/jpeg".to_string(),
            content,
            origin: AttachmentOrigin::Capture,
            created_at: captured_at,
            preview: None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Create the displayable preview handle for image attachments.
    /// Non-image attachments render a generic placeholder and get none.
    pub fn ensure_preview(&mut self) {
        if self.is_image() && self.preview.is_none() {
            self.preview = Some(PreviewHandle::new());
        }
    }

    /// Release the preview handle, if any. Idempotent.
    pub fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }
}
