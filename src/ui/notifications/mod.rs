// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for short notices (missing plan id, unreadable
//! settings file, failed status polls).
//!
//! - [`notification`] - `Notification` with severity levels
//! - [`manager`] - queuing and auto-dismiss
//! - [`toast`] - rendering

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
