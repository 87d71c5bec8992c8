// SPDX-License-Identifier: MPL-2.0
//! State of the positioning review panel: registered points and the
//! prediction error of the last evaluation.

use crate::api::{EvaluationError, PointStatus, PositioningApi, PredictionError};
use crate::error::ApiError;
use crate::fetch::PlanId;
use iced::Task;

#[derive(Debug, Clone)]
pub enum Message {
    /// Poll timer fired or a refresh was requested.
    PollStatus,
    StatusLoaded {
        plan_id: PlanId,
        result: Result<Vec<PointStatus>, ApiError>,
    },
    Evaluate,
    Evaluated {
        plan_id: PlanId,
        result: Result<PredictionError, EvaluationError>,
    },
}

/// Side effects the application should perform after handling a panel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// An evaluation was requested without a valid plan id.
    MissingPlanId,
    /// Registered points were replaced; the positioning view must reload.
    RefreshView,
}

#[derive(Debug)]
pub struct State {
    api: PositioningApi,
    plan_id: Option<PlanId>,
    points: Vec<PointStatus>,
    status_in_flight: bool,
    prediction: Option<PredictionError>,
    evaluating: bool,
    evaluation_error: Option<String>,
}

impl State {
    #[must_use]
    pub fn new(api: PositioningApi) -> Self {
        Self {
            api,
            plan_id: None,
            points: Vec::new(),
            status_in_flight: false,
            prediction: None,
            evaluating: false,
            evaluation_error: None,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[PointStatus] {
        &self.points
    }

    #[must_use]
    pub fn prediction(&self) -> Option<&PredictionError> {
        self.prediction.as_ref()
    }

    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.evaluating
    }

    #[must_use]
    pub fn evaluation_error(&self) -> Option<&str> {
        self.evaluation_error.as_deref()
    }

    /// Switches to another plan. Data of the previous plan is discarded and
    /// late responses for it are ignored.
    pub fn set_plan_id(&mut self, raw: &str) -> Task<Message> {
        let plan_id = PlanId::parse(raw).ok();
        if plan_id == self.plan_id {
            return Task::none();
        }
        self.plan_id = plan_id;
        self.points.clear();
        self.prediction = None;
        self.evaluation_error = None;
        self.evaluating = false;
        self.status_in_flight = false;
        self.poll_status()
    }

    fn poll_status(&mut self) -> Task<Message> {
        let Some(plan_id) = self.plan_id else {
            return Task::none();
        };
        if self.status_in_flight {
            return Task::none();
        }
        self.status_in_flight = true;

        let api = self.api.clone();
        Task::perform(
            async move { api.points_status(plan_id).await },
            move |result| Message::StatusLoaded { plan_id, result },
        )
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::PollStatus => (Effect::None, self.poll_status()),
            Message::StatusLoaded { plan_id, result } => {
                if Some(plan_id) != self.plan_id {
                    return (Effect::None, Task::none());
                }
                self.status_in_flight = false;
                match result {
                    Ok(points) => self.points = points,
                    // The previous list stays on screen.
                    Err(err) => log::warn!("point status for plan {plan_id} failed: {err}"),
                }
                (Effect::None, Task::none())
            }
            Message::Evaluate => {
                let Some(plan_id) = self.plan_id else {
                    return (Effect::MissingPlanId, Task::none());
                };
                if self.evaluating {
                    return (Effect::None, Task::none());
                }
                self.evaluating = true;
                self.evaluation_error = None;

                let api = self.api.clone();
                let task = Task::perform(
                    async move { api.evaluate_positioning_error(plan_id).await },
                    move |result| Message::Evaluated { plan_id, result },
                );
                (Effect::None, task)
            }
            Message::Evaluated { plan_id, result } => {
                if Some(plan_id) != self.plan_id {
                    return (Effect::None, Task::none());
                }
                self.evaluating = false;
                match result {
                    Ok(prediction) => {
                        self.prediction = Some(prediction);
                        self.status_in_flight = false;
                        (Effect::RefreshView, self.poll_status())
                    }
                    Err(err) => {
                        log::warn!("positioning error evaluation failed at {:?}: {}", err.step, err.source);
                        self.evaluation_error = Some(err.to_string());
                        (Effect::None, Task::none())
                    }
                }
            }
        }
    }
}
