//! Capture review state machine
//!
//! One `CaptureSession` covers the lifetime of one open camera dialog:
//! `Idle -> Acquiring -> Live <-> Previewing`, back to `Idle` on close. The
//! device stream and any pending preview are released on every exit path.

use std::sync::Arc;

use reporta_core::{
    Attachment, FacingMode, NoticeMetadata, NotificationSink, PreviewHandle, ReportError,
};

use super::controller::{CameraController, StreamHandle};
use crate::binding::EvidenceField;

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session; the dialog is closed
    Idle,
    /// Device acquisition in flight
    Acquiring,
    /// Stream flowing, no pending capture
    Live,
    /// A captured frame awaits confirm or retake
    Previewing,
}

struct PendingCapture {
    attachment: Attachment,
    preview: PreviewHandle,
}

/// State machine for one open camera dialog
pub struct CaptureSession {
    controller: CameraController,
    notify: Arc<dyn NotificationSink>,
    state: SessionState,
    facing: FacingMode,
    handle: Option<StreamHandle>,
    pending: Option<PendingCapture>,
}

impl CaptureSession {
    pub fn new(controller: CameraController, notify: Arc<dyn NotificationSink>) -> Self {
        Self {
            controller,
            notify,
            state: SessionState::Idle,
            facing: FacingMode::default(),
            handle: None,
            pending: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_open(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// The transient preview of the frame awaiting confirm/retake
    pub fn pending_preview(&self) -> Option<&PreviewHandle> {
        self.pending.as_ref().map(|p| &p.preview)
    }

    /// The live stream handle, for the rendering layer's video surface
    pub fn stream(&self) -> Option<&StreamHandle> {
        self.handle.as_ref()
    }

    /// Open the dialog: acquire the device and go live.
    ///
    /// A fresh session has no memory of the previous one; facing resets to
    /// front. Acquisition failure closes the session and surfaces a notice.
    pub async fn open(&mut self) -> Result<(), ReportError> {
        if self.state != SessionState::Idle {
            return Ok(());
        }

        self.facing = FacingMode::default();
        self.release_handle();
        self.state = SessionState::Acquiring;

        match self.controller.acquire(self.facing).await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = SessionState::Live;
                tracing::debug!(facing = ?self.facing, "Capture session live");
                Ok(())
            }
            Err(err) => {
                self.close();
                self.notify.notify(err.notice_level(), &err.user_message());
                Err(err)
            }
        }
    }

    /// Whether the capture control should be enabled
    pub fn can_capture(&self, evidence: &EvidenceField) -> bool {
        self.state == SessionState::Live && !evidence.store().is_full()
    }

    /// Capture the current frame for review.
    ///
    /// Only acts in `Live` and below the collection cap. A `NotReady` stream
    /// keeps the session live with a transient notice; an oversize capture is
    /// rejected in place.
    pub async fn capture(&mut self, evidence: &EvidenceField) -> Result<(), ReportError> {
        if self.state != SessionState::Live {
            return Ok(());
        }
        if evidence.store().is_full() {
            let max = evidence.store().policy().max_files;
            self.notify.warn(&format!("Maximum {} files allowed", max));
            return Ok(());
        }

        let handle = match self.handle.as_ref() {
            Some(handle) => handle,
            None => return Err(ReportError::NotReady),
        };

        match self.controller.capture(handle).await {
            Ok(attachment) => {
                let max_bytes = evidence.store().policy().max_capture_bytes;
                if attachment.size_bytes() > max_bytes {
                    let max_mb = evidence.store().policy().max_capture_mb();
                    self.notify
                        .warn(&format!("Photo exceeds the {}MB limit", max_mb));
                    return Ok(());
                }

                self.pending = Some(PendingCapture {
                    attachment,
                    preview: PreviewHandle::new(),
                });
                self.state = SessionState::Previewing;
                self.notify.success("Photo captured");
                Ok(())
            }
            Err(err) => {
                self.notify.notify(err.notice_level(), &err.user_message());
                Err(err)
            }
        }
    }

    /// Commit the pending capture to the evidence collection.
    ///
    /// Releases the transient preview and returns to `Live`; when the commit
    /// fills the collection cap the session auto-closes.
    pub fn confirm(&mut self, evidence: &mut EvidenceField) -> Result<(), ReportError> {
        let pending = match self.pending.take() {
            Some(pending) if self.state == SessionState::Previewing => pending,
            other => {
                self.pending = other;
                return Ok(());
            }
        };

        pending.preview.release();
        self.state = SessionState::Live;

        let result = evidence.add_capture(pending.attachment);
        if result.is_ok() && evidence.store().is_full() {
            tracing::debug!("Collection at cap after confirm; closing session");
            self.close();
        }
        result
    }

    /// Discard the pending capture and return to the live view
    pub fn retake(&mut self) {
        if self.state != SessionState::Previewing {
            return;
        }
        if let Some(pending) = self.pending.take() {
            pending.preview.release();
        }
        self.state = SessionState::Live;
    }

    /// Switch between front and rear cameras.
    ///
    /// Observably `Live -> Live`; a failed switch falls back to the previous
    /// mode with a non-fatal notice. Only when even the fallback fails does
    /// the session close.
    pub async fn switch_facing(&mut self) -> Result<(), ReportError> {
        if self.state != SessionState::Live {
            return Ok(());
        }
        let current = match self.handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };

        match self.controller.switch_facing(current, self.facing).await {
            Ok((handle, facing, switched)) => {
                self.handle = Some(handle);
                self.facing = facing;
                if !switched {
                    let err = ReportError::SwitchFailed("fell back to previous mode".to_string());
                    self.notify.notify(err.notice_level(), &err.user_message());
                }
                Ok(())
            }
            Err(err) => {
                self.close();
                self.notify.notify(err.notice_level(), &err.user_message());
                Err(err)
            }
        }
    }

    /// Close the dialog from any state, releasing the device stream and any
    /// pending preview. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.preview.release();
        }
        self.release_handle();
        self.state = SessionState::Idle;
    }

    fn release_handle(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        // Unmount-equivalent: the device must never outlive the dialog
        self.close();
    }
}
