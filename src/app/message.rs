// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::ui::notifications;
use crate::ui::positioning;
use crate::ui::viewer;
use std::time::Instant;

use super::Screen;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    ModelViewer(viewer::Message),
    PositioningViewer(viewer::Message),
    Positioning(positioning::Message),
    PlanIdChanged(String),
    SwitchScreen(Screen),
    Notification(notifications::NotificationMessage),
    Tick(Instant), // Periodic tick for notification auto-dismiss
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Operation plan id to open on startup.
    pub plan: Option<String>,
    /// Server base URL, overriding `[server] base_url`.
    pub server: Option<String>,
    /// Bearer token. Falls back to `ORTHOVIEW_TOKEN`.
    pub token: Option<String>,
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ORTHOVIEW_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Initial screen, `model` or `positioning`.
    pub screen: Option<String>,
}
