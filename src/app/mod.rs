// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the two screens.
//!
//! The `App` struct wires together the viewers, the positioning panel,
//! localization and notifications, and translates component effects into
//! further tasks. Everything that can fail at startup (base URL, HTTP
//! client) is resolved into a [`Startup`] before the event loop starts.

mod message;
pub mod paths;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;
pub use update::{
    MISSING_PLAN_ID_KEY, MODEL_REFRESH_MISSING_PLAN_ID_KEY, MODEL_VIEW_MISSING_PLAN_ID_KEY,
};

use crate::api::{HttpTransport, PositioningApi, ServerTransport, ViewEndpoint};
use crate::config::{self, Config};
use crate::diagnostics::{DiagnosticsLog, ViewerKind};
use crate::error::{Error, Result};
use crate::fetch::FetchConfig;
use crate::i18n::I18n;
use crate::session::Session;
use crate::ui::notifications::{self, Notification};
use crate::ui::{positioning, viewer};
use iced::{window, Element, Subscription, Task, Theme};
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const WINDOW_DEFAULT_WIDTH: u32 = 1280;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const MIN_WINDOW_WIDTH: u32 = 900;
pub const MIN_WINDOW_HEIGHT: u32 = 600;

/// Everything the application needs at boot, resolved ahead of time.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: Config,
    /// i18n key of a config loading problem to show once the UI is up.
    pub config_warning: Option<String>,
    pub lang: Option<String>,
    pub base_url: Url,
    pub session: Session,
    pub transport: Arc<dyn ServerTransport>,
    pub plan_id: Option<String>,
    pub screen: Screen,
}

impl Startup {
    /// Startup state with defaults for everything the CLI could set.
    #[must_use]
    pub fn new(config: Config, base_url: Url, transport: Arc<dyn ServerTransport>) -> Self {
        Self {
            config,
            config_warning: None,
            lang: None,
            base_url,
            session: Session::anonymous(),
            transport,
            plan_id: None,
            screen: Screen::default(),
        }
    }

    /// Loads the config file and applies the CLI flags on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL or the screen name is invalid, or if
    /// the HTTP client cannot be built.
    pub fn resolve(flags: Flags) -> Result<Self> {
        let (config, config_warning) = config::load();

        let base_url = match flags.server.as_deref() {
            Some(raw) => config::parse_base_url(raw)?,
            None => config.base_url()?,
        };
        let screen = flags
            .screen
            .as_deref()
            .map(str::parse::<Screen>)
            .transpose()
            .map_err(Error::Config)?
            .unwrap_or_default();
        let transport: Arc<dyn ServerTransport> = Arc::new(HttpTransport::new()?);

        Ok(Self {
            config,
            config_warning,
            lang: flags.lang,
            base_url,
            session: Session::resolve(flags.token),
            transport,
            plan_id: flags.plan,
            screen,
        })
    }
}

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    /// Plan id as typed, shared by both screens.
    plan_id: String,
    session: Session,
    model_viewer: viewer::State,
    positioning_viewer: viewer::State,
    positioning: positioning::State,
    diagnostics: DiagnosticsLog,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
    status_poll_interval: Duration,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("plan_id", &self.plan_id)
            .field("model_viewer", &self.model_viewer)
            .field("positioning_viewer", &self.positioning_viewer)
            .finish()
    }
}

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(startup: Startup) -> iced::Result {
    // iced 0.14 requires an `Fn` boot function.
    let boot = move || App::new(startup.clone());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Builds both viewers against the resolved server and loads the initial
    /// screen when a plan id was given.
    fn new(startup: Startup) -> (Self, Task<Message>) {
        let Startup {
            config,
            config_warning,
            lang,
            base_url,
            session,
            transport,
            plan_id,
            screen,
        } = startup;

        let i18n = I18n::new(lang, &config);
        let timeout = config.request_timeout();
        let (width, height) = config.positioning_size();

        log::info!(
            "using server {base_url} (timeout {} ms, token {})",
            timeout.as_millis(),
            if session.is_authenticated() { "set" } else { "missing" }
        );

        let model_viewer = viewer::State::new(
            ViewerKind::Model,
            FetchConfig {
                endpoint: ViewEndpoint::OperationPlanModel,
                base_url: base_url.clone(),
                timeout,
            },
            Arc::clone(&transport),
            session.clone(),
        );
        let positioning_viewer = viewer::State::new(
            ViewerKind::Positioning,
            FetchConfig {
                endpoint: ViewEndpoint::BonePositioning { width, height },
                base_url: base_url.clone(),
                timeout,
            },
            Arc::clone(&transport),
            session.clone(),
        );
        let positioning =
            positioning::State::new(PositioningApi::new(transport, base_url, session.clone()));

        let mut notifications = notifications::Manager::new();
        if let Some(key) = config_warning {
            notifications.push(Notification::warning(key));
        }

        let mut app = App {
            i18n,
            screen,
            plan_id: plan_id.unwrap_or_default(),
            session,
            model_viewer,
            positioning_viewer,
            positioning,
            diagnostics: DiagnosticsLog::default(),
            notifications,
            status_poll_interval: config.status_poll_interval(),
        };

        let task = update::show_screen(&mut app.update_context());
        (app, task)
    }

    fn update_context(&mut self) -> update::UpdateContext<'_> {
        update::UpdateContext {
            screen: &mut self.screen,
            plan_id: &mut self.plan_id,
            model_viewer: &mut self.model_viewer,
            positioning_viewer: &mut self.positioning_viewer,
            positioning: &mut self.positioning,
            diagnostics: &mut self.diagnostics,
            notifications: &mut self.notifications,
        }
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        let plan_id = self.plan_id.trim();
        if plan_id.is_empty() {
            app_name
        } else {
            format!("#{plan_id} - {app_name}")
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let poll_sub =
            subscription::create_status_poll_subscription(self.screen, self.status_poll_interval);
        let tick_sub =
            subscription::create_tick_subscription(self.notifications.has_notifications());

        Subscription::batch([poll_sub, tick_sub])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::update(&mut self.update_context(), message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: self.screen,
            plan_id: &self.plan_id,
            session: &self.session,
            model_viewer: &self.model_viewer,
            positioning_viewer: &self.positioning_viewer,
            positioning: &self.positioning,
            diagnostics: &self.diagnostics,
            notifications: &self.notifications,
        })
    }
}
