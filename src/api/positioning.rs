// SPDX-License-Identifier: MPL-2.0
//! JSON endpoints of the pre-operative bone positioning review.
//!
//! - point registration status, polled while the positioning screen is open
//! - the positioning error evaluation, a three-step sequence that reads the
//!   prediction error, then replaces the stored registration points

use super::error_body::{self, ErrorDetail};
use super::transport::{ApiRequest, RawResponse, ServerTransport};
use crate::error::ApiError;
use crate::fetch::PlanId;
use crate::session::Session;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

const POINTS_STATUS_PATH: &str = "preop_bone_positioning/get_points_status";
const MEAN_ERROR_PATH: &str = "preop_bone_positioning/get_mean_error";
const REMOVE_POINTS_PATH: &str = "preop_bone_positioning/remove_registered_points";
const SAVE_POINTS_PATH: &str = "preop_bone_positioning/save_registered_points";

/// Role of a sampled surface point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// One of the ten points used for registration.
    Main,
    /// Held-out point used to measure the registration error.
    Prediction,
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKind::Main => f.write_str("main"),
            PointKind::Prediction => f.write_str("prediction"),
        }
    }
}

/// Registration status of one surface point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointStatus {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: PointKind,
    pub model_coords: [f64; 3],
    /// Tracker coordinates, `None` until the point is registered.
    pub world_coords: Option<[f64; 3]>,
}

impl PointStatus {
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.world_coords.is_some()
    }
}

/// Prediction error of a completed registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionError {
    pub prediction_indices: Vec<u32>,
    pub prediction_errors: Vec<f64>,
    pub mean_error: f64,
}

impl PredictionError {
    /// `(point index, error)` pairs. Extra entries on either side are ignored.
    pub fn rows(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.prediction_indices
            .iter()
            .copied()
            .zip(self.prediction_errors.iter().copied())
    }
}

/// Step of the positioning error evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStep {
    ReadMeanError,
    RemovePreviousPoints,
    SaveNewPoints,
}

impl EvaluationStep {
    /// Message used when the server gives no detail.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            EvaluationStep::ReadMeanError => "Failed to calculate prediction error.",
            EvaluationStep::RemovePreviousPoints => "Failed to remove previous registered points.",
            EvaluationStep::SaveNewPoints => "Failed to save new registered points.",
        }
    }
}

/// Failure of one step of the evaluation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    pub step: EvaluationStep,
    pub source: ApiError,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ApiError::Http { .. } => match self.source.detail() {
                Some(detail) => f.write_str(detail),
                None => f.write_str(self.step.fallback_message()),
            },
            other => write!(f, "{}", other),
        }
    }
}

impl std::error::Error for EvaluationError {}

/// Client for the positioning JSON endpoints.
#[derive(Debug, Clone)]
pub struct PositioningApi {
    transport: Arc<dyn ServerTransport>,
    base_url: Url,
    session: Session,
}

impl PositioningApi {
    #[must_use]
    pub fn new(transport: Arc<dyn ServerTransport>, base_url: Url, session: Session) -> Self {
        Self {
            transport,
            base_url,
            session,
        }
    }

    fn url(&self, path: &str, plan_id: PlanId) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("i_operation_plan", &plan_id.to_string());
        Ok(url)
    }

    async fn call(&self, method: Method, path: &str, plan_id: PlanId) -> Result<RawResponse, ApiError> {
        let url = self.url(path, plan_id)?;
        log::debug!("{method} {url}");
        let response = self
            .transport
            .send(ApiRequest::new(method, url, self.session.clone()))
            .await
            .map_err(|e| ApiError::Network(e.0))?;

        if !response.status.is_success() {
            return Err(ApiError::Http {
                status: response.status.as_u16(),
                status_text: response.status_text(),
                detail: error_body::parse_detail(&response.body),
            });
        }
        Ok(response)
    }

    /// Registration status of every sampled point.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or a
    /// body that is not a point list.
    pub async fn points_status(&self, plan_id: PlanId) -> Result<Vec<PointStatus>, ApiError> {
        let response = self.call(Method::GET, POINTS_STATUS_PATH, plan_id).await?;
        decode_json(&response.body)
    }

    /// Runs the evaluation sequence: read the mean error, delete the stored
    /// registration points, store the current ones. Stops at the first
    /// failing step.
    ///
    /// # Errors
    ///
    /// Returns the failing [`EvaluationStep`] with its cause.
    pub async fn evaluate_positioning_error(
        &self,
        plan_id: PlanId,
    ) -> Result<PredictionError, EvaluationError> {
        let fail = |step| move |source| EvaluationError { step, source };

        let response = self
            .call(Method::GET, MEAN_ERROR_PATH, plan_id)
            .await
            .map_err(fail(EvaluationStep::ReadMeanError))?;
        let prediction: PredictionError =
            decode_json(&response.body).map_err(fail(EvaluationStep::ReadMeanError))?;
        log::info!(
            "plan {plan_id}: mean prediction error {:.5}",
            prediction.mean_error
        );

        self.call(Method::DELETE, REMOVE_POINTS_PATH, plan_id)
            .await
            .map_err(fail(EvaluationStep::RemovePreviousPoints))?;
        log::info!("plan {plan_id}: previous registered points removed");

        let saved = self
            .call(Method::POST, SAVE_POINTS_PATH, plan_id)
            .await
            .map_err(fail(EvaluationStep::SaveNewPoints))?;
        log::info!(
            "plan {plan_id}: new registered points saved ({})",
            String::from_utf8_lossy(&saved.body)
        );

        Ok(prediction)
    }
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Formats coordinates with two decimals, comma separated.
#[must_use]
pub fn format_coords(coords: &[f64; 3]) -> String {
    coords
        .iter()
        .map(|c| format!("{c:.2}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats a registration error with five decimals.
#[must_use]
pub fn format_error_value(value: f64) -> String {
    format!("{value:.5}")
}

/// Detail extracted from an HTTP error, if any. Used by log lines.
#[must_use]
pub fn detail_of(error: &ApiError) -> Option<&ErrorDetail> {
    match error {
        ApiError::Http { detail, .. } => Some(detail),
        _ => None,
    }
}
