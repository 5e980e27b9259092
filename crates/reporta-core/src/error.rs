//! Error types module
//!
//! This module provides the core error types used throughout the Reporta
//! application. All errors are unified under the `ReportError` enum which can
//! represent evidence validation, camera device, identity lookup, and
//! submission failures.

use crate::notify::NoticeLevel;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a slow or busy device
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error presentation - defines how an error surfaces to the user.
/// This trait allows errors to self-describe their notice characteristics.
pub trait NoticeMetadata {
    /// Notice level shown to the user
    fn notice_level(&self) -> NoticeLevel;

    /// Whether the triggering action can be retried without further cleanup
    fn is_retryable(&self) -> bool;

    /// Whether an open capture session must close when this error occurs
    fn closes_session(&self) -> bool;

    /// User-facing message (may differ from internal error message)
    fn user_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Camera not ready")]
    NotReady,

    #[error("Could not switch camera: {0}")]
    SwitchFailed(String),

    #[error("Identity lookup failed: {0}")]
    LookupFailed(String),

    #[error("Submission failed: {0}")]
    SubmitFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        ReportError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (notice_level, retryable, closes_session, log_level).
/// user_message stays per-variant for dynamic content.
fn report_error_static_metadata(err: &ReportError) -> (NoticeLevel, bool, bool, LogLevel) {
    match err {
        ReportError::ValidationRejected(_) => {
            (NoticeLevel::Warning, true, false, LogLevel::Debug)
        }
        ReportError::PermissionDenied => (NoticeLevel::Error, false, true, LogLevel::Warn),
        ReportError::DeviceUnavailable(_) => (NoticeLevel::Error, false, true, LogLevel::Warn),
        ReportError::NotReady => (NoticeLevel::Warning, true, false, LogLevel::Debug),
        ReportError::SwitchFailed(_) => (NoticeLevel::Warning, true, false, LogLevel::Warn),
        ReportError::LookupFailed(_) => (NoticeLevel::Warning, true, false, LogLevel::Warn),
        ReportError::SubmitFailed(_) => (NoticeLevel::Error, true, false, LogLevel::Warn),
        ReportError::Internal(_) => (NoticeLevel::Error, true, false, LogLevel::Error),
        ReportError::InternalWithSource { .. } => {
            (NoticeLevel::Error, true, false, LogLevel::Error)
        }
    }
}

impl ReportError {
    /// Get the error type name for detailed error reporting
    pub fn error_type(&self) -> &str {
        match self {
            ReportError::ValidationRejected(_) => "ValidationRejected",
            ReportError::PermissionDenied => "PermissionDenied",
            ReportError::DeviceUnavailable(_) => "DeviceUnavailable",
            ReportError::NotReady => "NotReady",
            ReportError::SwitchFailed(_) => "SwitchFailed",
            ReportError::LookupFailed(_) => "LookupFailed",
            ReportError::SubmitFailed(_) => "SubmitFailed",
            ReportError::Internal(_) => "Internal",
            ReportError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl NoticeMetadata for ReportError {
    fn notice_level(&self) -> NoticeLevel {
        report_error_static_metadata(self).0
    }

    fn is_retryable(&self) -> bool {
        report_error_static_metadata(self).1
    }

    fn closes_session(&self) -> bool {
        report_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        report_error_static_metadata(self).3
    }

    fn user_message(&self) -> String {
        match self {
            ReportError::ValidationRejected(ref msg) => msg.clone(),
            ReportError::PermissionDenied => {
                "Camera permission denied. Allow camera access and try again".to_string()
            }
            ReportError::DeviceUnavailable(_) => "Could not access the camera".to_string(),
            ReportError::NotReady => "The camera is not ready yet".to_string(),
            ReportError::SwitchFailed(_) => {
                "Could not switch camera, using the default one".to_string()
            }
            ReportError::LookupFailed(_) => {
                "Document lookup failed. You can enter the name manually".to_string()
            }
            ReportError::SubmitFailed(ref msg) => msg.clone(),
            ReportError::Internal(_) => "Unexpected error".to_string(),
            ReportError::InternalWithSource { .. } => "Unexpected error".to_string(),
        }
    }
}
