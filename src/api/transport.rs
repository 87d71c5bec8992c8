// SPDX-License-Identifier: MPL-2.0
//! Transport port for talking to the planning server.
//!
//! [`ServerTransport`] is the seam between the fetch lifecycle and the
//! network. [`HttpTransport`] is the `reqwest` adapter used by the client.
//! Tests substitute in-memory implementations.
//!
//! The returned future owns everything it needs, so dropping it (deadline,
//! superseded activation) cancels the request in flight.

use super::auth::{self, RequestOptions};
use crate::error::Result;
use crate::session::Session;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::{Method, StatusCode, Url};
use std::fmt;
use std::time::Duration;

/// User agent announced to the server.
const USER_AGENT: &str = concat!("OrthoView/", env!("CARGO_PKG_VERSION"));

/// Connection establishment limit. The overall deadline is enforced by the
/// caller; this only bounds a hanging TCP connect.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One request to the server.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: Url,
    pub options: RequestOptions,
    pub session: Session,
}

impl ApiRequest {
    #[must_use]
    pub fn get(url: Url, session: Session) -> Self {
        Self::new(Method::GET, url, session)
    }

    #[must_use]
    pub fn new(method: Method, url: Url, session: Session) -> Self {
        Self {
            url,
            options: RequestOptions::method(method),
            session,
        }
    }
}

/// Status and fully read body of a response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Reason phrase of the status, e.g. "Not Found".
    #[must_use]
    pub fn status_text(&self) -> String {
        status_text(self.status)
    }
}

/// Reason phrase for a status code, empty when the code has none.
#[must_use]
pub fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

/// Transport-level failure: no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Sends requests to the planning server.
pub trait ServerTransport: Send + Sync + fmt::Debug {
    /// Sends `request` and reads the whole body.
    fn send(&self, request: ApiRequest) -> BoxFuture<'static, std::result::Result<RawResponse, TransportError>>;
}

/// `reqwest` implementation of [`ServerTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl ServerTransport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'static, std::result::Result<RawResponse, TransportError>> {
        let builder = auth::authorized_request(
            &self.client,
            request.url,
            request.options,
            &request.session,
        );
        async move {
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError(describe(&e)))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError(describe(&e)))?;
            Ok(RawResponse::new(status, body.to_vec()))
        }
        .boxed()
    }
}

/// Flattens the `reqwest` error chain into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
