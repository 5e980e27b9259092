//! Reporta Evidence Library
//!
//! This crate implements the evidence subsystem of the incident-report form:
//! the attachment store with its admission limits, the camera capture pipeline
//! (device acquisition, facing switch, frame encoding), the capture review
//! state machine, and the binding that gates form submission on a non-empty
//! evidence collection.

pub mod binding;
pub mod camera;
pub mod store;
pub mod testing;

// Re-export commonly used types
pub use binding::EvidenceField;
pub use camera::{
    CameraController, CaptureDevice, CaptureSession, DeviceError, RawFrame, SessionState,
    StreamConstraints, StreamHandle, VideoStream,
};
pub use store::{EvidenceError, EvidenceStore};
