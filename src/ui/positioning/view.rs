// SPDX-License-Identifier: MPL-2.0
//! Rendering of the positioning review panel.

use super::state::{Message, State};
use crate::api::positioning::{format_coords, format_error_value};
use crate::api::{PointKind, PointStatus, PredictionError};
use crate::i18n::I18n;
use crate::ui::design_tokens::{spacing, typography};
use iced::widget::{button, rule, scrollable, text, Column, Row, Text};
use iced::{Element, Length};

const INDEX_WIDTH: f32 = 50.0;
const KIND_WIDTH: f32 = 90.0;

/// Text of the world coordinate cell.
#[must_use]
pub fn world_cell(point: &PointStatus, i18n: &I18n) -> String {
    match &point.world_coords {
        Some(coords) => format_coords(coords),
        None => i18n.tr("positioning-not-registered"),
    }
}

fn kind_label(kind: PointKind, i18n: &I18n) -> String {
    match kind {
        PointKind::Main => i18n.tr("positioning-point-main"),
        PointKind::Prediction => i18n.tr("positioning-point-prediction"),
    }
}

fn cell<'a>(content: String, width: Length) -> Element<'a, Message> {
    Text::new(content).size(typography::CAPTION).width(width).into()
}

fn points_table<'a>(points: &'a [PointStatus], i18n: &'a I18n) -> Element<'a, Message> {
    if points.is_empty() {
        return Text::new(i18n.tr("positioning-no-data"))
            .size(typography::BODY)
            .into();
    }

    let header = Row::new()
        .spacing(spacing::XS)
        .push(cell(i18n.tr("positioning-col-index"), Length::Fixed(INDEX_WIDTH)))
        .push(cell(i18n.tr("positioning-col-type"), Length::Fixed(KIND_WIDTH)))
        .push(cell(i18n.tr("positioning-col-model"), Length::FillPortion(1)))
        .push(cell(i18n.tr("positioning-col-world"), Length::FillPortion(1)));

    let rows = points.iter().map(|point| {
        Row::new()
            .spacing(spacing::XS)
            .push(cell(point.index.to_string(), Length::Fixed(INDEX_WIDTH)))
            .push(cell(kind_label(point.kind, i18n), Length::Fixed(KIND_WIDTH)))
            .push(cell(format_coords(&point.model_coords), Length::FillPortion(1)))
            .push(cell(world_cell(point, i18n), Length::FillPortion(1)))
            .into()
    });

    Column::new()
        .spacing(spacing::XXS)
        .push(header)
        .push(rule::horizontal(1))
        .extend(rows)
        .into()
}

fn prediction_section<'a>(prediction: Option<&'a PredictionError>, i18n: &'a I18n) -> Element<'a, Message> {
    let Some(prediction) = prediction else {
        return Text::new(i18n.tr("positioning-not-calculated"))
            .size(typography::BODY)
            .into();
    };

    let rows = prediction.rows().map(|(index, error)| {
        Row::new()
            .spacing(spacing::XS)
            .push(cell(index.to_string(), Length::Fixed(INDEX_WIDTH)))
            .push(cell(format_error_value(error), Length::Fill))
            .into()
    });

    Column::new()
        .spacing(spacing::XXS)
        .extend(rows)
        .push(
            Text::new(i18n.tr_args(
                "positioning-mean-error",
                &[("value", &format_error_value(prediction.mean_error))],
            ))
            .size(typography::BODY),
        )
        .into()
}

pub fn view<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let evaluate_label = if state.is_evaluating() {
        i18n.tr("positioning-evaluating")
    } else {
        i18n.tr("positioning-evaluate-button")
    };
    let evaluate = button(Text::new(evaluate_label).size(typography::BODY))
        .on_press_maybe((!state.is_evaluating()).then_some(Message::Evaluate));

    let mut content = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(i18n.tr("positioning-points-title")).size(typography::TITLE_SM))
        .push(points_table(state.points(), i18n))
        .push(rule::horizontal(1))
        .push(Text::new(i18n.tr("positioning-error-title")).size(typography::TITLE_SM))
        .push(prediction_section(state.prediction(), i18n))
        .push(evaluate);

    if let Some(error) = state.evaluation_error() {
        content = content.push(Text::new(error).size(typography::BODY).style(text::danger));
    }

    scrollable(content).height(Length::Fill).into()
}
