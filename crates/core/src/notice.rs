//! User-facing notifications.
//!
//! Every action reports its outcome as a [`Notice`]. Front ends decide how
//! to render them; the library only emits.

use std::sync::Mutex;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The action succeeded
    Success,
    /// Informational
    Info,
    /// The action failed
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Human-readable message
    pub message: String,
}

impl Notice {
    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    /// True for error notices.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync {
    /// Deliver a notice.
    fn notify(&self, notice: Notice);
}

/// Notifier that keeps every notice in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices delivered so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// The most recent notice.
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().ok().and_then(|n| n.last().cloned())
    }

    /// Remove and return all notices.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notice::success("saved"));
        notifier.notify(Notice::error("boom"));

        assert_eq!(notifier.notices().len(), 2);
        assert!(notifier.last().unwrap().is_error());
        assert_eq!(notifier.drain().len(), 2);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Notice::info("hi").to_string(), "[info] hi");
    }
}
