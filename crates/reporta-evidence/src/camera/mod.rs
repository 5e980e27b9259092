//! Camera capture subsystem
//!
//! Three layers, outermost first:
//!
//! - [`session`]: the capture review state machine driving one open camera
//!   dialog (open, capture, confirm/retake, facing switch, close)
//! - [`controller`]: device acquisition with the bounded grace period,
//!   stream handle ownership, and frame-to-JPEG encoding
//! - [`device`]: the platform seam - traits the embedding provides to reach
//!   the actual camera hardware

mod controller;
mod device;
mod session;

pub use controller::{CameraController, StreamHandle};
pub use device::{CaptureDevice, DeviceError, RawFrame, StreamConstraints, VideoStream};
pub use session::{CaptureSession, SessionState};
