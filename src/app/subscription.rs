// SPDX-License-Identifier: MPL-2.0
//! Timer subscriptions for the application.

use super::{Message, Screen};
use crate::ui::positioning;
use iced::{time, Subscription};
use std::time::Duration;

/// Interval of the notification auto-dismiss check.
const NOTIFICATION_TICK: Duration = Duration::from_millis(100);

/// Polls the point registration status while the positioning screen is shown.
pub fn create_status_poll_subscription(screen: Screen, interval: Duration) -> Subscription<Message> {
    if screen == Screen::Positioning {
        time::every(interval).map(|_| Message::Positioning(positioning::Message::PollStatus))
    } else {
        Subscription::none()
    }
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(NOTIFICATION_TICK).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
