// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` handles queuing, display timing, and dismissal of notifications.
//! It limits the number of visible toasts and manages auto-dismiss timers.

use super::notification::{Notification, NotificationId, Severity};
use std::collections::VecDeque;

/// Maximum number of notifications visible at once.
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(NotificationId),
    /// Tick for checking auto-dismiss timers.
    Tick,
}

/// Manages the notification queue and visible notifications.
#[derive(Debug, Default)]
pub struct Manager {
    /// Currently visible notifications (newest first).
    visible: VecDeque<Notification>,
    /// Queued notifications waiting to be displayed.
    queue: VecDeque<Notification>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a notification; it is queued when `MAX_VISIBLE` are showing.
    pub fn push(&mut self, notification: Notification) {
        match notification.severity() {
            Severity::Warning | Severity::Error => {
                log::warn!("notification: {}", notification.message_key());
            }
            Severity::Success | Severity::Info => {
                log::debug!("notification: {}", notification.message_key());
            }
        }

        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_front(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Returns `true` if the notification was found and removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }

        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }

        false
    }

    /// Dismisses every visible notification whose timer expired.
    pub fn tick(&mut self) {
        let expired: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();

        for id in expired {
            self.dismiss(id);
        }
    }

    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick(),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            match self.queue.pop_front() {
                Some(next) => self.visible.push_back(next),
                None => break,
            }
        }
    }
}
