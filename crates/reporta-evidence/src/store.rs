//! Evidence store
//!
//! Single source of truth for the attachments the user has assembled for one
//! report. Admission enforces the count cap and the per-origin type and size
//! limits; every operation is all-or-nothing, so a rejected batch leaves the
//! collection untouched.

use reporta_core::{Attachment, EvidencePolicy, ReportError};

/// Admission errors for evidence attachments
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("Maximum {max} files allowed")]
    TooManyFiles { requested: usize, max: usize },

    #[error("File type not allowed: {filename}")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },

    #[error("File {filename} exceeds the {max_mb}MB limit")]
    FileTooLarge {
        filename: String,
        size: usize,
        max_mb: usize,
    },

    #[error("File is empty: {0}")]
    EmptyFile(String),
}

impl From<EvidenceError> for ReportError {
    fn from(err: EvidenceError) -> Self {
        ReportError::ValidationRejected(err.to_string())
    }
}

/// Ordered, capped collection of report attachments
pub struct EvidenceStore {
    policy: EvidencePolicy,
    items: Vec<Attachment>,
}

impl EvidenceStore {
    pub fn new(policy: EvidencePolicy) -> Self {
        Self {
            policy,
            items: Vec::new(),
        }
    }

    /// Admit a batch of uploaded files, preserving selection order.
    ///
    /// The whole batch is rejected on the first violation: count cap first,
    /// then per candidate the accepted-type check and the upload size ceiling.
    /// Returns the number of files admitted.
    pub fn add_batch(&mut self, candidates: Vec<Attachment>) -> Result<usize, EvidenceError> {
        if candidates.is_empty() {
            return Ok(0);
        }

        if self.items.len() + candidates.len() > self.policy.max_files {
            return Err(EvidenceError::TooManyFiles {
                requested: candidates.len(),
                max: self.policy.max_files,
            });
        }

        for candidate in &candidates {
            if !self.policy.accepts_upload_type(&candidate.content_type) {
                return Err(EvidenceError::UnsupportedType {
                    filename: candidate.original_name.clone(),
                    content_type: candidate.content_type.clone(),
                });
            }
            if candidate.size_bytes() == 0 {
                return Err(EvidenceError::EmptyFile(candidate.original_name.clone()));
            }
            if candidate.size_bytes() > self.policy.max_upload_bytes {
                return Err(EvidenceError::FileTooLarge {
                    filename: candidate.original_name.clone(),
                    size: candidate.size_bytes(),
                    max_mb: self.policy.max_upload_mb(),
                });
            }
        }

        let added = candidates.len();
        for mut candidate in candidates {
            candidate.ensure_preview();
            self.items.push(candidate);
        }
        tracing::debug!(added, total = self.items.len(), "Evidence batch admitted");
        Ok(added)
    }

    /// Admit one confirmed camera capture. Captures are JPEG by construction,
    /// so only the count cap and the capture size ceiling apply.
    pub fn add_capture(&mut self, mut capture: Attachment) -> Result<(), EvidenceError> {
        if self.items.len() >= self.policy.max_files {
            return Err(EvidenceError::TooManyFiles {
                requested: 1,
                max: self.policy.max_files,
            });
        }
        if capture.size_bytes() == 0 {
            return Err(EvidenceError::EmptyFile(capture.original_name.clone()));
        }
        if capture.size_bytes() > self.policy.max_capture_bytes {
            return Err(EvidenceError::FileTooLarge {
                filename: capture.original_name.clone(),
                size: capture.size_bytes(),
                max_mb: self.policy.max_capture_mb(),
            });
        }

        capture.ensure_preview();
        self.items.push(capture);
        tracing::debug!(total = self.items.len(), "Capture admitted");
        Ok(())
    }

    /// Remove the attachment at `index`, releasing its preview.
    /// Out-of-range indices are a silent no-op: UI re-render races are
    /// expected and must not panic.
    pub fn remove(&mut self, index: usize) {
        if index < self.items.len() {
            let mut removed = self.items.remove(index);
            removed.release_preview();
        }
    }

    /// Empty the collection, releasing every preview. Used after a successful
    /// submission.
    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.release_preview();
        }
        self.items.clear();
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.policy.max_files
    }

    pub fn remaining_capacity(&self) -> usize {
        self.policy.max_files.saturating_sub(self.items.len())
    }

    pub fn policy(&self) -> &EvidencePolicy {
        &self.policy
    }
}
