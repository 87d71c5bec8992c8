// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.

use crate::ui::design_tokens::palette;
use iced::Color;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed (green, 3s).
    Success,
    /// Informational message (blue, 3s).
    #[default]
    Info,
    /// Warning that doesn't block operation (orange, 5s).
    Warning,
    /// Error requiring attention (red, manual dismiss).
    Error,
}

impl Severity {
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Severity::Success => palette::SUCCESS_500,
            Severity::Info => palette::INFO_500,
            Severity::Warning => palette::WARNING_500,
            Severity::Error => palette::ERROR_500,
        }
    }

    /// Returns `None` for errors (manual dismiss required).
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None,
        }
    }
}

/// A notification to be displayed to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    /// The i18n key for the notification message.
    message_key: String,
    message_args: Vec<(String, String)>,
    created_at: Instant,
}

impl Notification {
    /// Creates a notification; `message_key` is resolved at render time.
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            created_at: Instant::now(),
        }
    }

    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    #[must_use]
    pub fn should_auto_dismiss(&self) -> bool {
        self.severity
            .auto_dismiss_duration()
            .is_some_and(|d| self.age() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_ids_are_unique() {
        let n1 = Notification::info("test");
        let n2 = Notification::info("test");
        assert_ne!(n1.id(), n2.id());
    }

    #[test]
    fn errors_never_auto_dismiss() {
        assert!(Severity::Error.auto_dismiss_duration().is_none());
        assert!(!Notification::error("x").should_auto_dismiss());
    }

    #[test]
    fn fresh_notification_is_kept() {
        assert!(!Notification::warning("x").should_auto_dismiss());
    }

    #[test]
    fn with_arg_keeps_order() {
        let n = Notification::error("key")
            .with_arg("a", "1")
            .with_arg("b", "2");
        assert_eq!(
            n.message_args(),
            &[("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(n.message_key(), "key");
    }
}
