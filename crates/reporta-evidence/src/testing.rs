//! Test helpers
//!
//! This module provides scriptable mock implementations of the capture-device
//! seam and the notification sink for isolated unit and integration tests.
//! No real camera hardware is needed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reporta_core::{NoticeLevel, NotificationSink};

use crate::camera::{CaptureDevice, DeviceError, RawFrame, StreamConstraints, VideoStream};

/// Scripted acquisition outcome for one facing mode
#[derive(Clone)]
pub enum MockOutcome {
    /// Deliver a decoding stream at the given dimensions
    Stream { width: u32, height: u32 },
    /// Deliver the stream only after a delay (slow hardware)
    StreamAfter {
        delay: Duration,
        width: u32,
        height: u32,
    },
    /// Deliver a stream that never starts decoding (zero dimensions)
    NotDecoding,
    PermissionDenied,
    Unavailable,
}

/// Shared observable state of one opened mock stream
pub struct MockStreamState {
    stopped: AtomicBool,
}

impl MockStreamState {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

struct MockStream {
    width: u32,
    height: u32,
    state: Arc<MockStreamState>,
}

impl VideoStream for MockStream {
    fn dimensions(&self) -> (u32, u32) {
        if self.state.is_stopped() {
            (0, 0)
        } else {
            (self.width, self.height)
        }
    }

    fn current_frame(&self) -> Option<RawFrame> {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        Some(RawFrame {
            width,
            height,
            pixels: vec![128; (width * height * 3) as usize],
        })
    }

    fn stop(&mut self) {
        self.state.stopped.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }
}

/// Mock camera with per-facing scripted outcomes. Tracks every stream it ever
/// opened so tests can assert that none leaked.
pub struct MockCamera {
    front: MockOutcome,
    rear: MockOutcome,
    streams: Mutex<Vec<Arc<MockStreamState>>>,
}

impl MockCamera {
    pub fn new(front: MockOutcome, rear: MockOutcome) -> Self {
        Self {
            front,
            rear,
            streams: Mutex::new(Vec::new()),
        }
    }

    /// Both facings deliver a decoding stream immediately
    pub fn with_streams(width: u32, height: u32) -> Self {
        Self::new(
            MockOutcome::Stream { width, height },
            MockOutcome::Stream { width, height },
        )
    }

    /// Front works, rear is unavailable (single-camera hardware)
    pub fn front_only(width: u32, height: u32) -> Self {
        Self::new(MockOutcome::Stream { width, height }, MockOutcome::Unavailable)
    }

    pub fn denied() -> Self {
        Self::new(MockOutcome::PermissionDenied, MockOutcome::PermissionDenied)
    }

    pub fn unavailable() -> Self {
        Self::new(MockOutcome::Unavailable, MockOutcome::Unavailable)
    }

    /// Both facings deliver a stream only after `delay`
    pub fn slow(delay: Duration, width: u32, height: u32) -> Self {
        Self::new(
            MockOutcome::StreamAfter {
                delay,
                width,
                height,
            },
            MockOutcome::StreamAfter {
                delay,
                width,
                height,
            },
        )
    }

    /// Streams open but never start decoding
    pub fn not_decoding() -> Self {
        Self::new(MockOutcome::NotDecoding, MockOutcome::NotDecoding)
    }

    /// Number of streams ever opened by this camera
    pub fn streams_opened(&self) -> usize {
        self.streams.lock().unwrap().len()
    }

    /// True when every stream ever opened has been stopped
    pub fn all_streams_stopped(&self) -> bool {
        self.streams.lock().unwrap().iter().all(|s| s.is_stopped())
    }

    /// Number of streams opened and not yet stopped
    pub fn streams_still_open(&self) -> usize {
        self.streams
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.is_stopped())
            .count()
    }

    fn open_stream(&self, width: u32, height: u32) -> Box<dyn VideoStream> {
        let state = Arc::new(MockStreamState {
            stopped: AtomicBool::new(false),
        });
        self.streams.lock().unwrap().push(state.clone());
        Box::new(MockStream {
            width,
            height,
            state,
        })
    }
}

#[async_trait]
impl CaptureDevice for MockCamera {
    async fn open(
        &self,
        constraints: StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, DeviceError> {
        let outcome = match constraints.facing {
            reporta_core::FacingMode::Front => self.front.clone(),
            reporta_core::FacingMode::Rear => self.rear.clone(),
        };

        match outcome {
            MockOutcome::Stream { width, height } => Ok(self.open_stream(width, height)),
            MockOutcome::StreamAfter {
                delay,
                width,
                height,
            } => {
                tokio::time::sleep(delay).await;
                Ok(self.open_stream(width, height))
            }
            MockOutcome::NotDecoding => Ok(self.open_stream(0, 0)),
            MockOutcome::PermissionDenied => Err(DeviceError::PermissionDenied),
            MockOutcome::Unavailable => {
                Err(DeviceError::Unavailable("no suitable camera".to_string()))
            }
        }
    }
}

/// Notification sink that records every notice for assertions
pub struct RecordingSink {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn contains(&self, level: NoticeLevel, substring: &str) -> bool {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m.contains(substring))
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().unwrap().is_empty()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}
