// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! This module handles the `view()` function that renders the current screen
//! based on application state.

use super::{Message, Screen};
use crate::diagnostics::DiagnosticsLog;
use crate::i18n::I18n;
use crate::session::Session;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::notifications::{self, Toast};
use crate::ui::{positioning, viewer};
use iced::widget::{button, text_input, Column, Container, Row, Stack, Text};
use iced::{alignment, Element, Length, Theme};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: Screen,
    pub plan_id: &'a str,
    pub session: &'a Session,
    pub model_viewer: &'a viewer::State,
    pub positioning_viewer: &'a viewer::State,
    pub positioning: &'a positioning::State,
    pub diagnostics: &'a DiagnosticsLog,
    pub notifications: &'a notifications::Manager,
}

/// Renders the current application view based on the active screen.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let current_view: Element<'_, Message> = match ctx.screen {
        Screen::Model => ctx.model_viewer.view(ctx.i18n).map(Message::ModelViewer),
        Screen::Positioning => view_positioning(&ctx),
    };

    let column = Column::new()
        .spacing(spacing::SM)
        .padding(spacing::MD)
        .push(top_bar(&ctx))
        .push(
            Container::new(current_view)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .push(status_line(&ctx))
        .width(Length::Fill)
        .height(Length::Fill);

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);

    Stack::new()
        .push(column)
        .push(toasts)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn top_bar<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let screens = Screen::ALL.iter().map(|&screen| {
        let style: fn(&Theme, button::Status) -> button::Style = if screen == ctx.screen {
            button::primary
        } else {
            button::secondary
        };
        button(Text::new(i18n.tr(screen.label_key())).size(typography::BODY))
            .on_press(Message::SwitchScreen(screen))
            .style(style)
            .into()
    });

    let placeholder = i18n.tr("plan-id-placeholder");
    let plan_input = text_input(placeholder.as_str(), ctx.plan_id)
        .on_input(Message::PlanIdChanged)
        .size(typography::BODY)
        .width(Length::Fixed(sizing::PLAN_INPUT_WIDTH));

    let plan_field = Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("plan-id-label")).size(typography::BODY))
        .push(plan_input);

    Row::with_children(screens)
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(
            Container::new(plan_field)
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Right),
        )
        .into()
}

fn view_positioning<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let panel = positioning::view(ctx.positioning, ctx.i18n).map(Message::Positioning);

    Row::new()
        .spacing(spacing::MD)
        .push(
            Container::new(ctx.positioning_viewer.view(ctx.i18n).map(Message::PositioningViewer))
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .push(
            Container::new(panel)
                .width(Length::Fixed(sizing::SIDE_PANEL_WIDTH))
                .height(Length::Fill),
        )
        .into()
}

fn status_line<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let count = ctx.diagnostics.len().to_string();
    let failures = ctx.diagnostics.failure_count().to_string();
    let mut line = ctx
        .i18n
        .tr_args("status-events", &[("count", &count), ("failures", &failures)]);
    if !ctx.session.is_authenticated() {
        line = format!("{line} · {}", ctx.i18n.tr("status-anonymous"));
    }

    Text::new(line)
        .size(typography::CAPTION)
        .color(palette::GRAY_400)
        .into()
}
