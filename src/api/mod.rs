// SPDX-License-Identifier: MPL-2.0
//! Client side of the planning server REST API.
//!
//! - [`auth`]: bearer and content-type headers on every request
//! - [`endpoint`]: the two view endpoint families and their view names
//! - [`transport`]: the [`ServerTransport`] seam and its `reqwest` adapter
//! - [`error_body`]: `{"detail": ...}` error bodies
//! - [`positioning`]: point status and positioning error endpoints

pub mod auth;
pub mod endpoint;
pub mod error_body;
pub mod positioning;
pub mod transport;

pub use auth::{auth_headers, authorized_request, RequestOptions};
pub use endpoint::{ViewEndpoint, ViewName};
pub use error_body::{parse_detail, ErrorDetail};
pub use positioning::{
    EvaluationError, EvaluationStep, PointKind, PointStatus, PositioningApi, PredictionError,
};
pub use transport::{ApiRequest, HttpTransport, RawResponse, ServerTransport, TransportError};
