//! Camera controller and stream handle
//!
//! Wraps the platform device behind an acquire/release/switch/capture
//! contract. Acquisition is bounded by a grace period: a device that has
//! neither delivered a stream nor failed when the grace expires is treated
//! optimistically as granted, and the stream installs into the handle when it
//! eventually arrives. A handle released before that arrival stops the late
//! stream immediately, so a closed dialog can never leak an open camera.

use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use tokio::sync::Notify;

use reporta_core::{Attachment, CameraConfig, FacingMode, ReportError};

use super::device::{CaptureDevice, DeviceError, RawFrame, StreamConstraints, VideoStream};

enum HandleState {
    /// Acquisition still in flight (or optimistically granted)
    Warming,
    Live(Box<dyn VideoStream>),
    Failed(DeviceError),
    Released,
}

enum Settled {
    Live,
    Failed(DeviceError),
    Released,
}

struct HandleInner {
    state: Mutex<HandleState>,
    settled: Notify,
}

/// Exclusively-owned reference to one acquired (or warming) device stream.
///
/// Clones share the same underlying stream; `release` stops every track and is
/// idempotent, including on handles whose stream never arrived.
#[derive(Clone)]
pub struct StreamHandle {
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}

impl StreamHandle {
    fn new_warming() -> Self {
        Self {
            inner: Arc::new(HandleInner {
                state: Mutex::new(HandleState::Warming),
                settled: Notify::new(),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, HandleState> {
        // Recover rather than propagate: a panic while holding this lock
        // leaves plain enum state that is still safe to read.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn install(&self, mut stream: Box<dyn VideoStream>) {
        {
            let mut state = self.lock_state();
            if matches!(*state, HandleState::Warming) {
                *state = HandleState::Live(stream);
            } else {
                // Arrived after release (or after a failure was already
                // recorded): the session is gone, stop the tracks now.
                tracing::debug!("Stream arrived on a settled handle; stopping tracks");
                stream.stop();
            }
        }
        self.inner.settled.notify_waiters();
    }

    fn fail(&self, err: DeviceError) {
        {
            let mut state = self.lock_state();
            if matches!(*state, HandleState::Warming) {
                *state = HandleState::Failed(err);
            }
        }
        self.inner.settled.notify_waiters();
    }

    /// Stop every track of the stream. Idempotent; safe on a handle whose
    /// acquisition is still in flight.
    pub fn release(&self) {
        {
            let mut state = self.lock_state();
            if let HandleState::Live(stream) = &mut *state {
                stream.stop();
            }
            *state = HandleState::Released;
        }
        self.inner.settled.notify_waiters();
    }

    pub fn is_released(&self) -> bool {
        matches!(*self.lock_state(), HandleState::Released)
    }

    /// Current video surface dimensions; zero while warming or not decoding
    pub fn dimensions(&self) -> (u32, u32) {
        match &*self.lock_state() {
            HandleState::Live(stream) => stream.dimensions(),
            _ => (0, 0),
        }
    }

    fn current_frame(&self) -> Result<RawFrame, ReportError> {
        match &*self.lock_state() {
            HandleState::Live(stream) => {
                let (width, height) = stream.dimensions();
                if width == 0 || height == 0 {
                    return Err(ReportError::NotReady);
                }
                stream.current_frame().ok_or(ReportError::NotReady)
            }
            _ => Err(ReportError::NotReady),
        }
    }

    fn settled_snapshot(&self) -> Option<Settled> {
        match &*self.lock_state() {
            HandleState::Warming => None,
            HandleState::Live(_) => Some(Settled::Live),
            HandleState::Failed(err) => Some(Settled::Failed(err.clone())),
            HandleState::Released => Some(Settled::Released),
        }
    }

    async fn wait_settled(&self) -> Settled {
        loop {
            let notified = self.inner.settled.notified();
            tokio::pin!(notified);
            // Register before checking, so a notify_waiters between the check
            // and the await cannot be lost
            notified.as_mut().enable();

            if let Some(outcome) = self.settled_snapshot() {
                return outcome;
            }
            notified.await;
        }
    }
}

/// Acquire/release/switch/capture contract over the platform device
#[derive(Clone)]
pub struct CameraController {
    device: Arc<dyn CaptureDevice>,
    config: CameraConfig,
}

impl CameraController {
    pub fn new(device: Arc<dyn CaptureDevice>, config: CameraConfig) -> Self {
        Self { device, config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Request a video-only stream for the given facing mode.
    ///
    /// Waits up to the configured grace period for a definitive outcome.
    /// An explicit denial or failure inside the grace is reported
    /// immediately; grace expiry yields a warming handle that resolves when
    /// the device eventually responds.
    pub async fn acquire(&self, facing: FacingMode) -> Result<StreamHandle, ReportError> {
        let constraints = StreamConstraints {
            facing,
            ideal_width: self.config.ideal_width,
            ideal_height: self.config.ideal_height,
        };

        let handle = StreamHandle::new_warming();
        let installer = handle.clone();
        let device = self.device.clone();
        tokio::spawn(async move {
            match device.open(constraints).await {
                Ok(stream) => installer.install(stream),
                Err(err) => installer.fail(err),
            }
        });

        match tokio::time::timeout(self.config.acquire_grace, handle.wait_settled()).await {
            Ok(Settled::Live) => Ok(handle),
            Ok(Settled::Failed(DeviceError::PermissionDenied)) => {
                Err(ReportError::PermissionDenied)
            }
            Ok(Settled::Failed(DeviceError::Unavailable(msg))) => {
                Err(ReportError::DeviceUnavailable(msg))
            }
            Ok(Settled::Released) => Err(ReportError::DeviceUnavailable(
                "stream released during acquisition".to_string(),
            )),
            Err(_elapsed) => {
                tracing::warn!(
                    grace_secs = self.config.acquire_grace.as_secs(),
                    ?facing,
                    "Camera did not settle within the grace period; proceeding optimistically"
                );
                Ok(handle)
            }
        }
    }

    /// Switch to the opposite facing mode.
    ///
    /// The current handle is released before the new stream is requested, so
    /// two streams are never open at once. On failure the original mode is
    /// re-acquired; `switched` is false in that case so the caller can show
    /// a non-fatal notice. An error here means even the fallback failed.
    pub async fn switch_facing(
        &self,
        current: StreamHandle,
        mode: FacingMode,
    ) -> Result<(StreamHandle, FacingMode, bool), ReportError> {
        current.release();

        let target = mode.opposite();
        match self.acquire(target).await {
            Ok(handle) => Ok((handle, target, true)),
            Err(err) => {
                tracing::warn!(error = %err, ?target, "Facing switch failed; re-acquiring previous mode");
                let fallback = self.acquire(mode).await?;
                Ok((fallback, mode, false))
            }
        }
    }

    /// Encode the current frame of the stream as a JPEG attachment.
    ///
    /// Fails with `NotReady` while the surface reports zero dimensions; the
    /// user simply presses capture again once the stream is decoding.
    pub async fn capture(&self, handle: &StreamHandle) -> Result<Attachment, ReportError> {
        let frame = handle.current_frame()?;
        let quality = self.config.jpeg_quality;

        let encoded = tokio::task::spawn_blocking(move || encode_jpeg(&frame, quality))
            .await
            .map_err(|e| ReportError::Internal(format!("Capture encoding task failed: {}", e)))??;

        Ok(Attachment::from_capture(encoded, Utc::now()))
    }
}

fn encode_jpeg(frame: &RawFrame, quality: u8) -> Result<Bytes, ReportError> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
    encoder
        .encode(
            &frame.pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ReportError::Internal(format!("JPEG encoding failed: {}", e)))?;
    Ok(Bytes::from(buf))
}
