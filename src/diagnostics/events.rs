// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for fetch activity tracking.

use std::fmt;
use std::time::Instant;

/// Which viewer produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKind {
    Model,
    Positioning,
}

impl fmt::Display for ViewerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerKind::Model => f.write_str("model"),
            ViewerKind::Positioning => f.write_str("positioning"),
        }
    }
}

/// A diagnostic event with timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred (monotonic clock for duration calculations)
    pub timestamp: Instant,
    pub viewer: ViewerKind,
    pub kind: FetchEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(viewer: ViewerKind, kind: FetchEventKind) -> Self {
        Self::with_timestamp(viewer, kind, Instant::now())
    }

    #[must_use]
    pub fn with_timestamp(viewer: ViewerKind, kind: FetchEventKind, timestamp: Instant) -> Self {
        Self {
            timestamp,
            viewer,
            kind,
        }
    }
}

/// What happened to an activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEventKind {
    Started {
        activation: u64,
        plan_id: i64,
        view: String,
    },
    Ready {
        activation: u64,
        width: u32,
        height: u32,
    },
    Failed {
        /// Error category (`validation`, `http`, `timeout`, ...).
        error: String,
        message: String,
    },
    Superseded {
        activation: u64,
    },
}

impl fmt::Display for FetchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchEventKind::Started {
                activation,
                plan_id,
                view,
            } => write!(f, "#{activation} started (plan {plan_id}, {view})"),
            FetchEventKind::Ready {
                activation,
                width,
                height,
            } => write!(f, "#{activation} ready ({width}x{height})"),
            FetchEventKind::Failed { error, message } => write!(f, "{error}: {message}"),
            FetchEventKind::Superseded { activation } => write!(f, "#{activation} superseded"),
        }
    }
}
