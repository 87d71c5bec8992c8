// SPDX-License-Identifier: MPL-2.0
//! In-memory record of fetch activity.
//!
//! - [`CircularBuffer`]: generic ring buffer with bounded capacity
//! - [`DiagnosticEvent`]: one fetch event of one viewer
//! - [`DiagnosticsLog`]: records events and mirrors them to the `log` facade

mod buffer;
mod events;

pub use buffer::{buffer_capacity_bounds, BufferCapacity, CircularBuffer};
pub use events::{DiagnosticEvent, FetchEventKind, ViewerKind};

use crate::error::FetchError;
use crate::fetch::{Activation, ActivationId};
use crate::media::DecodedImage;

/// Bounded history of fetch events.
#[derive(Debug, Clone)]
pub struct DiagnosticsLog {
    events: CircularBuffer<DiagnosticEvent>,
    failures: usize,
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

impl DiagnosticsLog {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            events: CircularBuffer::new(capacity),
            failures: 0,
        }
    }

    pub fn record(&mut self, viewer: ViewerKind, kind: FetchEventKind) {
        match &kind {
            FetchEventKind::Failed { .. } => log::warn!("[{viewer}] {kind}"),
            FetchEventKind::Ready { .. } => log::info!("[{viewer}] {kind}"),
            FetchEventKind::Started { .. } | FetchEventKind::Superseded { .. } => {
                log::debug!("[{viewer}] {kind}");
            }
        }
        if matches!(kind, FetchEventKind::Failed { .. }) {
            self.failures += 1;
        }
        self.events.push(DiagnosticEvent::new(viewer, kind));
    }

    pub fn started(&mut self, viewer: ViewerKind, activation: &Activation) {
        self.record(
            viewer,
            FetchEventKind::Started {
                activation: activation.id.value(),
                plan_id: activation.plan_id.value(),
                view: activation.view.to_string(),
            },
        );
    }

    pub fn superseded(&mut self, viewer: ViewerKind, id: ActivationId) {
        self.record(
            viewer,
            FetchEventKind::Superseded {
                activation: id.value(),
            },
        );
    }

    pub fn finished(
        &mut self,
        viewer: ViewerKind,
        id: ActivationId,
        result: &Result<DecodedImage, FetchError>,
    ) {
        let kind = match result {
            Ok(image) => FetchEventKind::Ready {
                activation: id.value(),
                width: image.width,
                height: image.height,
            },
            Err(err) => FetchEventKind::Failed {
                error: err.kind().to_string(),
                message: err.user_message(),
            },
        };
        self.record(viewer, kind);
    }

    pub fn rejected(&mut self, viewer: ViewerKind, err: &FetchError) {
        self.record(
            viewer,
            FetchEventKind::Failed {
                error: err.kind().to_string(),
                message: err.user_message(),
            },
        );
    }

    pub fn events(&self) -> impl DoubleEndedIterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DiagnosticEvent> {
        self.events.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Failures recorded since start, including evicted ones.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures
    }
}
