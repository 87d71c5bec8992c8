// SPDX-License-Identifier: MPL-2.0
//! Toast widget for rendering individual notifications.

use super::manager::{Manager, Message};
use super::notification::Notification;
use crate::i18n::I18n;
use crate::ui::design_tokens::{border, radius, sizing, spacing, typography};
use iced::widget::{button, container, text, Column, Container, Row, Text};
use iced::{alignment, Color, Element, Length, Theme};

/// Toast widget configuration.
pub struct Toast;

impl Toast {
    /// Renders a single toast notification.
    pub fn view<'a>(notification: &'a Notification, i18n: &'a I18n) -> Element<'a, Message> {
        let accent_color = notification.severity().color();

        let args: Vec<(&str, &str)> = notification
            .message_args()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let message_text = i18n.tr_args(notification.message_key(), &args);

        let dismiss_button = button(Text::new("×").size(typography::BODY))
            .on_press(Message::Dismiss(notification.id()))
            .padding(spacing::XXS)
            .style(button::text);

        let content = Row::new()
            .spacing(spacing::SM)
            .align_y(alignment::Vertical::Center)
            .push(
                Container::new(Text::new(message_text).size(typography::BODY))
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Left),
            )
            .push(dismiss_button);

        Container::new(content)
            .width(Length::Fixed(sizing::TOAST_WIDTH))
            .padding(spacing::SM)
            .style(move |theme: &Theme| toast_container_style(theme, accent_color))
            .into()
    }

    /// Renders all visible notifications stacked in the bottom-right corner.
    pub fn view_overlay<'a>(manager: &'a Manager, i18n: &'a I18n) -> Element<'a, Message> {
        let toasts: Vec<Element<'a, Message>> = manager
            .visible()
            .map(|notification| Self::view(notification, i18n))
            .collect();

        if toasts.is_empty() {
            return Container::new(text(""))
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into();
        }

        Container::new(
            Column::with_children(toasts)
                .spacing(spacing::XS)
                .align_x(alignment::Horizontal::Right),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Right)
        .align_y(alignment::Vertical::Bottom)
        .padding(spacing::MD)
        .into()
    }
}

fn toast_container_style(theme: &Theme, accent_color: Color) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(
            theme.extended_palette().background.base.color,
        )),
        border: iced::Border {
            color: accent_color,
            width: border::WIDTH_MD,
            radius: radius::MD.into(),
        },
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}
