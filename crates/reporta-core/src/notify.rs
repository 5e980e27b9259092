//! Notification capability
//!
//! This module provides the trait interface through which the core surfaces
//! user-visible notices (the equivalent of UI toasts) without depending on any
//! rendering layer. The embedding application implements this trait.

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Trait for surfacing transient user-visible notices
///
/// The core calls these methods whenever something must be shown to the user
/// (a rejected file, a captured photo, a camera failure). Implementations
/// should display-and-forget; nothing here is persisted.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(NoticeLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// No-op implementation for embeddings that render state directly
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _level: NoticeLevel, _message: &str) {}
}

/// Sink that forwards notices to the tracing subscriber. Useful for headless
/// runs and as a default before a UI sink is wired in.
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(notice = message),
            NoticeLevel::Warning => tracing::warn!(notice = message),
            NoticeLevel::Error => tracing::error!(notice = message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingSink(Mutex<Vec<(NoticeLevel, String)>>);

    impl NotificationSink for CollectingSink {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_convenience_methods_set_level() {
        let sink = CollectingSink(Mutex::new(Vec::new()));
        sink.success("added");
        sink.warn("too large");
        sink.error("no camera");

        let notices = sink.0.lock().unwrap();
        assert_eq!(notices[0], (NoticeLevel::Success, "added".to_string()));
        assert_eq!(notices[1], (NoticeLevel::Warning, "too large".to_string()));
        assert_eq!(notices[2], (NoticeLevel::Error, "no camera".to_string()));
    }
}
