// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Component effects are translated here: a missing plan id becomes a
//! toast, a finished positioning evaluation reloads the positioning view.

use super::{Message, Screen};
use crate::diagnostics::DiagnosticsLog;
use crate::ui::notifications::{self, Notification};
use crate::ui::{positioning, viewer};
use iced::Task;

/// Notice of the positioning screen for any action that needs a plan id.
pub const MISSING_PLAN_ID_KEY: &str = "notice-missing-plan-id";

/// Notices of the model screen, one per refused action.
pub const MODEL_REFRESH_MISSING_PLAN_ID_KEY: &str = "notice-model-refresh-missing-plan-id";
pub const MODEL_VIEW_MISSING_PLAN_ID_KEY: &str = "notice-model-view-missing-plan-id";

/// Mutable view of the application state handed to the handlers.
pub struct UpdateContext<'a> {
    pub screen: &'a mut Screen,
    pub plan_id: &'a mut String,
    pub model_viewer: &'a mut viewer::State,
    pub positioning_viewer: &'a mut viewer::State,
    pub positioning: &'a mut positioning::State,
    pub diagnostics: &'a mut DiagnosticsLog,
    pub notifications: &'a mut notifications::Manager,
}

pub fn update(ctx: &mut UpdateContext<'_>, message: Message) -> Task<Message> {
    match message {
        Message::ModelViewer(msg) => handle_model_viewer(ctx, msg),
        Message::PositioningViewer(msg) => handle_positioning_viewer(ctx, msg),
        Message::Positioning(msg) => handle_positioning(ctx, msg),
        Message::PlanIdChanged(raw) => handle_plan_id_changed(ctx, raw),
        Message::SwitchScreen(screen) => handle_screen_switch(ctx, screen),
        Message::Notification(msg) => {
            ctx.notifications.handle_message(&msg);
            Task::none()
        }
        Message::Tick(_) => {
            ctx.notifications.tick();
            Task::none()
        }
    }
}

/// Loads whatever the current screen shows for the current plan id.
pub fn show_screen(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    match *ctx.screen {
        Screen::Model => ctx
            .model_viewer
            .show(ctx.plan_id.as_str(), ctx.diagnostics)
            .map(Message::ModelViewer),
        Screen::Positioning => {
            let view = ctx
                .positioning_viewer
                .show(ctx.plan_id.as_str(), ctx.diagnostics)
                .map(Message::PositioningViewer);
            let status = ctx.positioning.set_plan_id(ctx.plan_id.as_str());
            let (_, poll) = ctx
                .positioning
                .handle_message(positioning::Message::PollStatus);
            Task::batch([
                view,
                status.map(Message::Positioning),
                poll.map(Message::Positioning),
            ])
        }
    }
}

fn notify_missing_plan_id(notifications: &mut notifications::Manager) {
    notifications.push(Notification::warning(MISSING_PLAN_ID_KEY));
}

fn handle_model_viewer(ctx: &mut UpdateContext<'_>, msg: viewer::Message) -> Task<Message> {
    let (effect, task) = ctx.model_viewer.handle_message(msg, ctx.diagnostics);
    if let viewer::Effect::MissingPlanId(action) = effect {
        let key = match action {
            viewer::RefusedAction::Refresh => MODEL_REFRESH_MISSING_PLAN_ID_KEY,
            viewer::RefusedAction::ChangeView => MODEL_VIEW_MISSING_PLAN_ID_KEY,
        };
        ctx.notifications.push(Notification::warning(key));
    }
    task.map(Message::ModelViewer)
}

fn handle_positioning_viewer(ctx: &mut UpdateContext<'_>, msg: viewer::Message) -> Task<Message> {
    let manual_refresh = matches!(msg, viewer::Message::Refresh);
    let (effect, task) = ctx.positioning_viewer.handle_message(msg, ctx.diagnostics);
    let task = task.map(Message::PositioningViewer);

    match effect {
        viewer::Effect::MissingPlanId(_) => {
            notify_missing_plan_id(ctx.notifications);
            task
        }
        // The point list is re-read along with the view.
        viewer::Effect::None if manual_refresh => {
            let (_, poll) = ctx
                .positioning
                .handle_message(positioning::Message::PollStatus);
            Task::batch([task, poll.map(Message::Positioning)])
        }
        viewer::Effect::None => task,
    }
}

fn handle_positioning(ctx: &mut UpdateContext<'_>, msg: positioning::Message) -> Task<Message> {
    let (effect, task) = ctx.positioning.handle_message(msg);
    let task = task.map(Message::Positioning);

    match effect {
        positioning::Effect::None => task,
        positioning::Effect::MissingPlanId => {
            notify_missing_plan_id(ctx.notifications);
            task
        }
        positioning::Effect::RefreshView => {
            let refresh = ctx
                .positioning_viewer
                .refresh(ctx.diagnostics)
                .map(Message::PositioningViewer);
            Task::batch([task, refresh])
        }
    }
}

fn handle_plan_id_changed(ctx: &mut UpdateContext<'_>, raw: String) -> Task<Message> {
    *ctx.plan_id = raw;
    match *ctx.screen {
        Screen::Model => ctx
            .model_viewer
            .set_plan_id(ctx.plan_id.as_str(), ctx.diagnostics)
            .map(Message::ModelViewer),
        Screen::Positioning => {
            let view = ctx
                .positioning_viewer
                .set_plan_id(ctx.plan_id.as_str(), ctx.diagnostics)
                .map(Message::PositioningViewer);
            let status = ctx
                .positioning
                .set_plan_id(ctx.plan_id.as_str())
                .map(Message::Positioning);
            Task::batch([view, status])
        }
    }
}

fn handle_screen_switch(ctx: &mut UpdateContext<'_>, screen: Screen) -> Task<Message> {
    if *ctx.screen == screen {
        return Task::none();
    }
    log::debug!("switching to {screen:?} screen");
    *ctx.screen = screen;

    // Only the visible viewer holds an image.
    match screen {
        Screen::Model => ctx.positioning_viewer.teardown(),
        Screen::Positioning => ctx.model_viewer.teardown(),
    }
    show_screen(ctx)
}
