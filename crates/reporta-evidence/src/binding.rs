//! Form field binding for the evidence collection
//!
//! Connects the evidence store to the surrounding form: every mutation
//! re-validates the field synchronously and surfaces rejections through the
//! notification sink. The form's submission gate consults `is_valid`.

use std::sync::Arc;

use reporta_core::{
    Attachment, EvidencePolicy, NoticeMetadata, NotificationSink, ReportError,
};

use crate::store::{EvidenceError, EvidenceStore};

const REQUIRED_MESSAGE: &str = "Attach at least one evidence file";

/// The evidence collection as a validated form field
pub struct EvidenceField {
    store: EvidenceStore,
    error: Option<String>,
    notify: Arc<dyn NotificationSink>,
}

impl EvidenceField {
    pub fn new(policy: EvidencePolicy, notify: Arc<dyn NotificationSink>) -> Self {
        let mut field = Self {
            store: EvidenceStore::new(policy),
            error: None,
            notify,
        };
        field.revalidate();
        field
    }

    /// Admit a batch of uploaded files. Rejections are surfaced as notices
    /// and leave the collection unchanged.
    pub fn add_batch(&mut self, candidates: Vec<Attachment>) -> Result<(), ReportError> {
        let result = self.store.add_batch(candidates);
        self.revalidate();
        match result {
            Ok(0) => Ok(()),
            Ok(added) => {
                self.notify.success(&format!("{} file(s) added", added));
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Admit one confirmed camera capture
    pub fn add_capture(&mut self, capture: Attachment) -> Result<(), ReportError> {
        let result = self.store.add_capture(capture);
        self.revalidate();
        match result {
            Ok(()) => {
                self.notify.success("Photo saved");
                Ok(())
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    pub fn remove(&mut self, index: usize) {
        self.store.remove(index);
        self.revalidate();
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.revalidate();
    }

    /// The submission gate: true once at least one attachment is present
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn store(&self) -> &EvidenceStore {
        &self.store
    }

    fn revalidate(&mut self) {
        self.error = if self.store.is_empty() {
            Some(REQUIRED_MESSAGE.to_string())
        } else {
            None
        };
    }

    fn reject(&self, err: EvidenceError) -> ReportError {
        let err = ReportError::from(err);
        tracing::debug!(error = %err, "Evidence admission rejected");
        self.notify.notify(err.notice_level(), &err.user_message());
        err
    }
}
