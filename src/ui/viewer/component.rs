// SPDX-License-Identifier: MPL-2.0
//! Viewer component encapsulating state and update logic.
//!
//! A viewer binds one [`FetchLifecycle`] to a plan id, a view name and a
//! refresh counter. Any change of the three starts a new activation; the
//! result comes back as [`Message::Fetched`]. Picking a view always bumps
//! the counter, so clicking the current view reloads it.

use crate::api::{ServerTransport, ViewName};
use crate::diagnostics::{DiagnosticsLog, ViewerKind};
use crate::fetch::{self, Completion, FetchConfig, FetchLifecycle, FetchRequest, FetchStatus};
use crate::i18n::I18n;
use crate::media::ImageHandle;
use crate::session::Session;
use crate::ui::design_tokens::{spacing, typography};
use iced::widget::{button, image::Image, Column, Container, Row, Text};
use iced::{alignment, ContentFit, Element, Length, Task, Theme};
use std::fmt;
use std::sync::Arc;

/// Messages emitted by viewer widgets and fetch tasks.
#[derive(Debug, Clone)]
pub enum Message {
    SelectView(ViewName),
    Refresh,
    Fetched(Completion),
}

/// User action refused because no plan id is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusedAction {
    ChangeView,
    Refresh,
}

/// Side effects the application should perform after handling a viewer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    MissingPlanId(RefusedAction),
}

/// What the viewer area shows. Exactly one at a time.
#[derive(Debug)]
pub enum Display<'a> {
    Error(String),
    Loading,
    Image(&'a ImageHandle),
    Empty,
}

pub struct State {
    kind: ViewerKind,
    lifecycle: FetchLifecycle,
    transport: Arc<dyn ServerTransport>,
    session: Session,
    request: FetchRequest,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("kind", &self.kind)
            .field("request", &self.request)
            .field("status", self.lifecycle.status())
            .finish()
    }
}

impl State {
    /// Creates an idle viewer showing the first view of its endpoint.
    #[must_use]
    pub fn new(
        kind: ViewerKind,
        config: FetchConfig,
        transport: Arc<dyn ServerTransport>,
        session: Session,
    ) -> Self {
        let view = config
            .endpoint
            .views()
            .first()
            .copied()
            .unwrap_or(ViewName::Front);
        Self {
            kind,
            lifecycle: FetchLifecycle::new(config),
            transport,
            session,
            request: FetchRequest::new(String::new(), view),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ViewerKind {
        self.kind
    }

    #[must_use]
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        self.lifecycle.status()
    }

    #[must_use]
    pub fn lifecycle(&self) -> &FetchLifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lifecycle.status().is_loading()
    }

    #[must_use]
    pub fn display(&self) -> Display<'_> {
        match self.lifecycle.status() {
            FetchStatus::Failed(err) => Display::Error(err.user_message()),
            FetchStatus::Loading => Display::Loading,
            FetchStatus::Ready(handle) => Display::Image(handle),
            FetchStatus::Idle => Display::Empty,
        }
    }

    /// Updates the plan id; re-activates only when it changed.
    pub fn set_plan_id(&mut self, plan_id: &str, diagnostics: &mut DiagnosticsLog) -> Task<Message> {
        if self.request.plan_id == plan_id {
            return Task::none();
        }
        self.request.plan_id = plan_id.to_string();
        self.activate(diagnostics)
    }

    /// Bumps the refresh counter from outside (e.g. after the positioning
    /// error evaluation replaced the registered points).
    pub fn refresh(&mut self, diagnostics: &mut DiagnosticsLog) -> Task<Message> {
        self.request.refresh = self.request.refresh.wrapping_add(1);
        self.activate(diagnostics)
    }

    /// Puts the viewer back on screen for `plan_id`. Reloads when the plan id
    /// changed or the viewer was torn down while hidden.
    pub fn show(&mut self, plan_id: &str, diagnostics: &mut DiagnosticsLog) -> Task<Message> {
        let torn_down = matches!(self.lifecycle.status(), FetchStatus::Idle);
        if self.request.plan_id != plan_id || (torn_down && !plan_id.trim().is_empty()) {
            self.request.plan_id = plan_id.to_string();
            return self.activate(diagnostics);
        }
        Task::none()
    }

    /// Aborts in-flight work and releases the image.
    pub fn teardown(&mut self) {
        self.lifecycle.teardown();
    }

    fn activate(&mut self, diagnostics: &mut DiagnosticsLog) -> Task<Message> {
        if let Some(previous) = self.lifecycle.in_flight() {
            diagnostics.superseded(self.kind, previous);
        }

        match self.lifecycle.activate(&self.request) {
            Ok(activation) => {
                diagnostics.started(self.kind, &activation);
                Task::perform(
                    fetch::run(activation, Arc::clone(&self.transport), self.session.clone()),
                    Message::Fetched,
                )
            }
            Err(err) => {
                diagnostics.rejected(self.kind, &err);
                Task::none()
            }
        }
    }

    pub fn handle_message(
        &mut self,
        message: Message,
        diagnostics: &mut DiagnosticsLog,
    ) -> (Effect, Task<Message>) {
        match message {
            Message::SelectView(view) => {
                if self.request.plan_id.trim().is_empty() {
                    return (
                        Effect::MissingPlanId(RefusedAction::ChangeView),
                        Task::none(),
                    );
                }
                self.request.view = view;
                (Effect::None, self.refresh(diagnostics))
            }
            Message::Refresh => {
                if self.request.plan_id.trim().is_empty() {
                    return (Effect::MissingPlanId(RefusedAction::Refresh), Task::none());
                }
                (Effect::None, self.refresh(diagnostics))
            }
            Message::Fetched(Completion::Finished { id, result }) => {
                if self.lifecycle.in_flight() == Some(id) {
                    diagnostics.finished(self.kind, id, &result);
                }
                if !self.lifecycle.complete(id, result) {
                    log::debug!("[{}] ignored result of {id}", self.kind);
                }
                (Effect::None, Task::none())
            }
            Message::Fetched(Completion::Aborted(id)) => {
                log::debug!("[{}] activation {id} aborted", self.kind);
                (Effect::None, Task::none())
            }
        }
    }

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let view_name = self.request.view.as_query();

        let content: Element<'a, Message> = match self.display() {
            Display::Error(message) => Text::new(message)
                .size(typography::BODY)
                .style(iced::widget::text::danger)
                .into(),
            Display::Loading => {
                Text::new(i18n.tr_args("viewer-loading", &[("view", view_name)]))
                    .size(typography::BODY)
                    .into()
            }
            Display::Image(handle) => Image::new(handle.widget_handle())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            Display::Empty => Text::new(i18n.tr_args("viewer-empty", &[("view", view_name)]))
                .size(typography::BODY)
                .into(),
        };

        Column::new()
            .spacing(spacing::SM)
            .push(self.view_selector(i18n))
            .push(
                Container::new(content)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(alignment::Horizontal::Center)
                    .align_y(alignment::Vertical::Center),
            )
            .into()
    }

    fn view_selector<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let buttons = self.lifecycle.config().endpoint.views().iter().map(|&view| {
            let style: fn(&Theme, button::Status) -> button::Style = if view == self.request.view {
                button::primary
            } else {
                button::secondary
            };
            button(Text::new(view.label()).size(typography::BODY))
                .on_press(Message::SelectView(view))
                .style(style)
                .into()
        });

        Row::with_children(buttons)
            .push(
                button(Text::new(i18n.tr("refresh-button")).size(typography::BODY))
                    .on_press(Message::Refresh)
                    .style(button::success),
            )
            .spacing(spacing::XS)
            .align_y(alignment::Vertical::Center)
            .into()
    }
}
