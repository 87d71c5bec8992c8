// SPDX-License-Identifier: MPL-2.0
//! State machine of the remote image fetch.
//!
//! One [`FetchLifecycle`] belongs to one viewer. Each change of plan id, view
//! name or refresh counter starts an *activation*:
//!
//! ```text
//! previous ──activate──► Loading ──complete──► Ready(handle) | Failed(error)
//!     └──────activate (invalid plan id)──────► Failed(Validation)
//! ```
//!
//! Starting an activation aborts the one still in flight, and completions
//! are matched by [`ActivationId`], so the last trigger always wins.

use super::request::{FetchRequest, PlanId};
use crate::api::{ViewEndpoint, ViewName};
use crate::error::FetchError;
use crate::media::{DecodedImage, ImageHandle};
use futures_util::future::{AbortHandle, AbortRegistration};
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Identifies one activation of a lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivationId(u64);

impl ActivationId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visible state of a lifecycle. Exactly one holds at a time.
#[derive(Debug, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready(ImageHandle),
    Failed(FetchError),
}

impl FetchStatus {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageHandle> {
        match self {
            FetchStatus::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Parameters of one viewer variant.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub endpoint: ViewEndpoint,
    /// Server root, ending with `/`.
    pub base_url: Url,
    /// Deadline of one request.
    pub timeout: Duration,
}

/// Everything the runner needs to perform one activation.
#[derive(Debug)]
pub struct Activation {
    pub id: ActivationId,
    pub plan_id: PlanId,
    pub view: ViewName,
    pub url: Url,
    pub timeout: Duration,
    pub registration: AbortRegistration,
}

/// Fetch lifecycle of one viewer.
#[derive(Debug)]
pub struct FetchLifecycle {
    config: FetchConfig,
    status: FetchStatus,
    last_id: u64,
    in_flight: Option<(ActivationId, AbortHandle)>,
}

impl FetchLifecycle {
    #[must_use]
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            status: FetchStatus::Idle,
            last_id: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Activation currently awaiting its result.
    #[must_use]
    pub fn in_flight(&self) -> Option<ActivationId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }

    /// Starts a new activation for `request`.
    ///
    /// Any activation still in flight is aborted. An invalid plan id moves
    /// straight to `Failed` and nothing has to be sent.
    ///
    /// # Errors
    ///
    /// Returns the failure already stored in the status when the activation
    /// cannot be sent.
    pub fn activate(&mut self, request: &FetchRequest) -> Result<Activation, FetchError> {
        self.last_id += 1;
        let id = ActivationId(self.last_id);

        if let Some((previous, handle)) = self.in_flight.take() {
            log::debug!("activation {previous} superseded by {id}");
            handle.abort();
        }

        let plan_id = match PlanId::parse(&request.plan_id) {
            Ok(plan_id) => plan_id,
            Err(err) => return Err(self.fail(id, err)),
        };
        let url = match self.config.endpoint.url(&self.config.base_url, plan_id, request.view) {
            Ok(url) => url,
            Err(cause) => return Err(self.fail(id, FetchError::Network(cause))),
        };

        // Replacing the status releases the previous image.
        self.status = FetchStatus::Loading;
        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some((id, handle));
        log::debug!("activation {id}: GET {url}");

        Ok(Activation {
            id,
            plan_id,
            view: request.view,
            url,
            timeout: self.config.timeout,
            registration,
        })
    }

    fn fail(&mut self, id: ActivationId, err: FetchError) -> FetchError {
        log::debug!("activation {id} rejected: {}", err.user_message());
        self.status = FetchStatus::Failed(err.clone());
        err
    }

    /// Stores the result of activation `id`.
    ///
    /// Returns `false` and leaves the state untouched when `id` is not the
    /// activation in flight.
    pub fn complete(&mut self, id: ActivationId, result: Result<DecodedImage, FetchError>) -> bool {
        if self.in_flight() != Some(id) {
            log::debug!("dropping stale result of activation {id}");
            return false;
        }
        self.in_flight = None;

        self.status = match result {
            Ok(decoded) => {
                log::debug!(
                    "activation {id}: image {}x{} ready",
                    decoded.width,
                    decoded.height
                );
                FetchStatus::Ready(ImageHandle::new(&decoded))
            }
            Err(err) => {
                log::debug!("activation {id} failed: {}", err.user_message());
                FetchStatus::Failed(err)
            }
        };
        true
    }

    /// Aborts in-flight work and releases the image.
    pub fn teardown(&mut self) {
        if let Some((id, handle)) = self.in_flight.take() {
            log::debug!("activation {id} aborted by teardown");
            handle.abort();
        }
        self.status = FetchStatus::Idle;
    }
}

impl Drop for FetchLifecycle {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}
