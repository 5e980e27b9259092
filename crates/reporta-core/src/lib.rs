//! Reporta Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! notification capability that are shared across all Reporta components.

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod telemetry;

// Re-export commonly used types
pub use config::{CameraConfig, Config, EvidencePolicy, FormConfig};
pub use error::{LogLevel, NoticeMetadata, ReportError};
pub use models::{
    default_areas, Area, Attachment, AttachmentOrigin, DocumentKind, FacingMode, IncidentReport,
    PreviewHandle, RelatedCategory, ReportKind,
};
pub use notify::{NoOpNotificationSink, NoticeLevel, NotificationSink, TracingNotificationSink};
