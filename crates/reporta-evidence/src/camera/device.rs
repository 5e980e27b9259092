//! Capture device abstraction traits
//!
//! This module defines the seam between the capture engine and the platform
//! camera. The embedding application implements these traits over whatever
//! media API it has; the engine only ever sees streams and frames.

use async_trait::async_trait;
use reporta_core::FacingMode;
use thiserror::Error;

/// Device acquisition errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Device unavailable: {0}")]
    Unavailable(String),
}

/// Requested stream parameters. The platform may substitute the resolution.
#[derive(Debug, Clone, Copy)]
pub struct StreamConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

/// One decoded video frame, RGB8 row-major
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A live video stream with exclusively-owned tracks
pub trait VideoStream: Send {
    /// Current decode dimensions; zero until the stream produces frames
    fn dimensions(&self) -> (u32, u32);

    /// Latest decoded frame, if one is available
    fn current_frame(&self) -> Option<RawFrame>;

    /// Stop every track. Idempotent.
    fn stop(&mut self);

    fn is_stopped(&self) -> bool;
}

/// Platform camera access
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Open a video-only stream for the requested facing mode.
    ///
    /// A permission denial must be reported as [`DeviceError::PermissionDenied`];
    /// any other acquisition failure as [`DeviceError::Unavailable`]. The call
    /// may take arbitrarily long on slow hardware - the controller bounds the
    /// wait, not the device.
    async fn open(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, DeviceError>;
}
