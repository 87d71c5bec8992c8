// SPDX-License-Identifier: MPL-2.0
//! Asynchronous part of an activation.

use super::lifecycle::{Activation, ActivationId};
use crate::api::{self, ApiRequest, ServerTransport};
use crate::error::FetchError;
use crate::media::DecodedImage;
use crate::session::Session;
use futures_util::future::{Abortable, Aborted};
use std::sync::Arc;
use std::time::Duration;

/// How an activation ended.
#[derive(Debug, Clone)]
pub enum Completion {
    Finished {
        id: ActivationId,
        result: Result<DecodedImage, FetchError>,
    },
    /// Aborted because a newer activation started or the viewer went away.
    Aborted(ActivationId),
}

/// Sends `request` and turns the response into an image.
///
/// The whole exchange, body included, must finish within `deadline`;
/// otherwise the request future is dropped and [`FetchError::Timeout`] is
/// returned.
///
/// # Errors
///
/// Returns the [`FetchError`] classifying the failure.
pub async fn fetch_view(
    transport: Arc<dyn ServerTransport>,
    request: ApiRequest,
    deadline: Duration,
) -> Result<DecodedImage, FetchError> {
    let response = match tokio::time::timeout(deadline, transport.send(request)).await {
        Err(_elapsed) => return Err(FetchError::Timeout),
        Ok(Err(err)) => return Err(FetchError::Network(err.0)),
        Ok(Ok(response)) => response,
    };

    if !response.status.is_success() {
        let detail = api::parse_detail(&response.body);
        if let api::ErrorDetail::Undecodable(cause) = &detail {
            log::debug!("error body of HTTP {} is not JSON: {cause}", response.status);
        }
        return Err(FetchError::Http {
            status: response.status.as_u16(),
            status_text: response.status_text(),
            detail,
        });
    }

    DecodedImage::decode(&response.body)
}

/// Runs an activation until it finishes or is aborted.
pub async fn run(
    activation: Activation,
    transport: Arc<dyn ServerTransport>,
    session: Session,
) -> Completion {
    let Activation {
        id,
        url,
        timeout,
        registration,
        ..
    } = activation;
    let request = ApiRequest::get(url, session);

    match Abortable::new(fetch_view(transport, request, timeout), registration).await {
        Ok(result) => Completion::Finished { id, result },
        Err(Aborted) => Completion::Aborted(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ErrorDetail, RawResponse};
    use crate::test_utils::{png_bytes, FakeTransport, Reply};
    use reqwest::{StatusCode, Url};

    const DEADLINE: Duration = Duration::from_millis(30_000);

    fn request() -> ApiRequest {
        let url = Url::parse(
            "http://127.0.0.1:8000/operation_plan_models/get_view?i_operation_plan=42&view_name=front",
        )
        .expect("url");
        ApiRequest::get(url, Session::new(Some("tok".into())))
    }

    #[tokio::test]
    async fn success_decodes_image() {
        let transport = FakeTransport::new(vec![Reply::Response(RawResponse::new(
            StatusCode::OK,
            png_bytes(4, 3),
        ))]);
        let image = fetch_view(transport.clone(), request(), DEADLINE)
            .await
            .expect("image");
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.abandoned(), 0);
    }

    #[tokio::test]
    async fn not_found_with_detail() {
        let transport = FakeTransport::new(vec![Reply::status(
            StatusCode::NOT_FOUND,
            r#"{"detail":"not found"}"#,
        )]);
        let err = fetch_view(transport, request(), DEADLINE).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch image: Not Found - not found");
    }

    #[tokio::test]
    async fn non_json_error_body_is_explicit_and_status_only() {
        let transport = FakeTransport::new(vec![Reply::status(
            StatusCode::BAD_GATEWAY,
            "<html>upstream down</html>",
        )]);
        let err = fetch_view(transport, request(), DEADLINE).await.unwrap_err();

        match &err {
            FetchError::Http { status, detail, .. } => {
                assert_eq!(*status, 502);
                assert!(matches!(detail, ErrorDetail::Undecodable(_)));
            }
            other => panic!("expected Http, got {other:?}"),
        }
        assert_eq!(err.user_message(), "Failed to fetch image: Bad Gateway");
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        let transport = FakeTransport::new(vec![Reply::network("connection refused")]);
        let err = fetch_view(transport, request(), DEADLINE).await.unwrap_err();
        assert_eq!(err, FetchError::Network("connection refused".into()));
    }

    #[tokio::test]
    async fn success_with_non_image_body_is_decode_error() {
        let transport = FakeTransport::new(vec![Reply::ok("not a png")]);
        let err = fetch_view(transport, request(), DEADLINE).await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_times_out_and_drops_request() {
        let transport = FakeTransport::new(vec![Reply::Hang]);
        let started = tokio::time::Instant::now();

        let err = fetch_view(transport.clone(), request(), DEADLINE)
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout);
        assert_eq!(
            err.user_message(),
            "Request timed out. Server is taking too long to respond."
        );
        assert!(started.elapsed() >= DEADLINE);
        assert_eq!(transport.abandoned(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn response_just_before_deadline_succeeds() {
        let transport = FakeTransport::new(vec![Reply::After(
            DEADLINE - Duration::from_millis(1),
            RawResponse::new(StatusCode::OK, png_bytes(1, 1)),
        )]);
        assert!(fetch_view(transport.clone(), request(), DEADLINE).await.is_ok());
        assert_eq!(transport.abandoned(), 0);
    }

    #[tokio::test]
    async fn aborted_activation_reports_its_id() {
        use crate::api::{ViewEndpoint, ViewName};
        use crate::fetch::{FetchConfig, FetchLifecycle, FetchRequest};

        let mut lifecycle = FetchLifecycle::new(FetchConfig {
            endpoint: ViewEndpoint::OperationPlanModel,
            base_url: Url::parse("http://127.0.0.1:8000/").expect("url"),
            timeout: DEADLINE,
        });
        let transport = FakeTransport::new(vec![Reply::Hang]);
        let activation = lifecycle
            .activate(&FetchRequest::new("42", ViewName::Front))
            .expect("valid");
        let id = activation.id;
        let task = tokio::spawn(run(activation, transport.clone(), Session::anonymous()));
        tokio::task::yield_now().await;

        lifecycle.teardown();

        match task.await.expect("task completes") {
            Completion::Aborted(aborted) => assert_eq!(aborted, id),
            other => panic!("expected Aborted, got {other:?}"),
        }
        assert_eq!(transport.abandoned(), 1);
    }
}
