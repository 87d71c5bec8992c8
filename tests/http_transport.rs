// SPDX-License-Identifier: MPL-2.0
//! Requests through the real `reqwest` transport against an in-process
//! HTTP server.

use orthoview::api::{
    EvaluationStep, HttpTransport, PointKind, PositioningApi, ServerTransport, ViewEndpoint,
    ViewName,
};
use orthoview::error::FetchError;
use orthoview::fetch::{self, Completion, FetchConfig, FetchLifecycle, FetchRequest, FetchStatus, PlanId};
use orthoview::session::Session;
use reqwest::Url;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

struct Canned {
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Canned {
    fn png(width: u32, height: u32) -> Self {
        let image = image_rs::RgbaImage::from_pixel(width, height, image_rs::Rgba([0, 128, 255, 255]));
        let mut body = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut body), image_rs::ImageFormat::Png)
            .expect("encode png");
        Self {
            status: "200 OK",
            content_type: "image/png",
            body,
        }
    }

    fn json(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    fn html(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.as_bytes().to_vec(),
        }
    }
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serves one canned response per connection and reports each request head.
async fn serve(responses: Vec<Canned>) -> (Url, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for canned in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let head = read_head(&mut socket).await;
            let _ = tx.send(head);
            let header = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                canned.status,
                canned.content_type,
                canned.body.len()
            );
            let _ = socket.write_all(header.as_bytes()).await;
            let _ = socket.write_all(&canned.body).await;
            let _ = socket.shutdown().await;
        }
    });

    (Url::parse(&format!("http://{addr}/")).expect("url"), rx)
}

/// Accepts connections and never answers.
async fn serve_silently() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Url::parse(&format!("http://{addr}/")).expect("url")
}

fn transport() -> Arc<dyn ServerTransport> {
    Arc::new(HttpTransport::new().expect("http client"))
}

fn lifecycle(endpoint: ViewEndpoint, base_url: Url, timeout: Duration) -> FetchLifecycle {
    FetchLifecycle::new(FetchConfig {
        endpoint,
        base_url,
        timeout,
    })
}

async fn fetch_once<'a>(
    lifecycle: &'a mut FetchLifecycle,
    request: &FetchRequest,
    session: Session,
) -> &'a FetchStatus {
    let activation = lifecycle.activate(request).expect("valid request");
    match fetch::run(activation, transport(), session).await {
        Completion::Finished { id, result } => {
            assert!(lifecycle.complete(id, result), "completion should be current");
        }
        Completion::Aborted(id) => panic!("activation {id} aborted"),
    }
    lifecycle.status()
}

fn first_line(head: &str) -> &str {
    head.lines().next().unwrap_or_default()
}

#[tokio::test]
async fn model_view_request_carries_auth_and_query() {
    let (base, mut heads) = serve(vec![Canned::png(4, 3)]).await;
    let mut lifecycle = lifecycle(ViewEndpoint::OperationPlanModel, base, Duration::from_secs(5));

    let status = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("42", ViewName::Front),
        Session::new(Some("tok".into())),
    )
    .await;
    let image = status.image().expect("ready");
    assert_eq!(image.dimensions(), (4, 3));

    let head = heads.recv().await.expect("request head");
    assert_eq!(
        first_line(&head),
        "GET /operation_plan_models/get_view?i_operation_plan=42&view_name=front HTTP/1.1"
    );
    let lower = head.to_ascii_lowercase();
    assert!(lower.contains("authorization: bearer tok\r\n"), "{head}");
    assert!(lower.contains("content-type: application/json\r\n"), "{head}");
}

#[tokio::test]
async fn positioning_view_query_includes_render_size() {
    let (base, mut heads) = serve(vec![Canned::png(2, 2)]).await;
    let mut lifecycle = lifecycle(ViewEndpoint::bone_positioning(), base, Duration::from_secs(5));

    let status = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("7", ViewName::OtherSide),
        Session::new(Some("tok".into())),
    )
    .await;
    assert!(status.image().is_some());

    let head = heads.recv().await.expect("request head");
    assert_eq!(
        first_line(&head),
        "GET /preop_bone_positioning/get_view?i_operation_plan=7&view_name=other+side&width=1200&height=800 HTTP/1.1"
    );
}

#[tokio::test]
async fn missing_token_is_sent_as_bearer_null() {
    let (base, mut heads) = serve(vec![Canned::png(1, 1)]).await;
    let mut lifecycle = lifecycle(ViewEndpoint::OperationPlanModel, base, Duration::from_secs(5));

    let _ = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("1", ViewName::Top),
        Session::anonymous(),
    )
    .await;

    let head = heads.recv().await.expect("request head");
    assert!(head.to_ascii_lowercase().contains("authorization: bearer null\r\n"), "{head}");
}

#[tokio::test]
async fn json_error_detail_is_shown() {
    let (base, _heads) = serve(vec![Canned::json("404 Not Found", r#"{"detail":"not found"}"#)]).await;
    let mut lifecycle = lifecycle(ViewEndpoint::OperationPlanModel, base, Duration::from_secs(5));

    let status = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("42", ViewName::Front),
        Session::anonymous(),
    )
    .await;
    assert_eq!(
        status.error().map(FetchError::user_message).as_deref(),
        Some("Failed to fetch image: Not Found - not found")
    );
}

#[tokio::test]
async fn html_error_body_yields_status_text_only() {
    let (base, _heads) = serve(vec![Canned::html("502 Bad Gateway", "<html>bad gateway</html>")]).await;
    let mut lifecycle = lifecycle(ViewEndpoint::OperationPlanModel, base, Duration::from_secs(5));

    let status = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("42", ViewName::Back),
        Session::anonymous(),
    )
    .await;
    assert_eq!(
        status.error().map(FetchError::user_message).as_deref(),
        Some("Failed to fetch image: Bad Gateway")
    );
}

#[tokio::test]
async fn unresponsive_server_times_out() {
    let base = serve_silently().await;
    let mut lifecycle = lifecycle(
        ViewEndpoint::OperationPlanModel,
        base,
        Duration::from_millis(200),
    );

    let status = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("42", ViewName::Front),
        Session::anonymous(),
    )
    .await;
    assert_eq!(status.error(), Some(&FetchError::Timeout));
    assert!(lifecycle.in_flight().is_none());
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let base = Url::parse(&format!("http://{addr}/")).expect("url");
    let mut lifecycle = lifecycle(ViewEndpoint::OperationPlanModel, base, Duration::from_secs(5));

    let status = fetch_once(
        &mut lifecycle,
        &FetchRequest::new("42", ViewName::Front),
        Session::anonymous(),
    )
    .await;
    let message = status.error().map(FetchError::user_message).unwrap_or_default();
    assert!(message.starts_with("Error fetching image: "), "{message}");
}

#[tokio::test]
async fn points_status_is_decoded() {
    let body = r#"[
        {"index": 0, "type": "main", "model_coords": [1.0, 2.0, 3.0], "world_coords": [4.0, 5.0, 6.0]},
        {"index": 10, "type": "prediction", "model_coords": [0.5, 0.5, 0.5], "world_coords": null}
    ]"#;
    let (base, mut heads) = serve(vec![Canned::json("200 OK", body)]).await;
    let api = PositioningApi::new(transport(), base, Session::new(Some("tok".into())));

    let points = api
        .points_status(PlanId::parse("7").expect("numeric"))
        .await
        .expect("points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].kind, PointKind::Prediction);
    assert!(!points[1].is_registered());

    let head = heads.recv().await.expect("request head");
    assert_eq!(
        first_line(&head),
        "GET /preop_bone_positioning/get_points_status?i_operation_plan=7 HTTP/1.1"
    );
}

#[tokio::test]
async fn evaluation_runs_three_steps_in_order() {
    let (base, mut heads) = serve(vec![
        Canned::json(
            "200 OK",
            r#"{"prediction_indices":[10,11],"prediction_errors":[0.1,0.2],"mean_error":0.15}"#,
        ),
        Canned::json("200 OK", r#"{"message":"removed"}"#),
        Canned::json("200 OK", r#"{"message":"saved"}"#),
    ])
    .await;
    let api = PositioningApi::new(transport(), base, Session::new(Some("tok".into())));

    let prediction = api
        .evaluate_positioning_error(PlanId::parse("7").expect("numeric"))
        .await
        .expect("evaluation");
    assert_eq!(prediction.mean_error, 0.15);

    let mut methods = Vec::new();
    for _ in 0..3 {
        let head = heads.recv().await.expect("request head");
        methods.push(first_line(&head).split(' ').take(2).collect::<Vec<_>>().join(" "));
    }
    assert_eq!(
        methods,
        vec![
            "GET /preop_bone_positioning/get_mean_error?i_operation_plan=7",
            "DELETE /preop_bone_positioning/remove_registered_points?i_operation_plan=7",
            "POST /preop_bone_positioning/save_registered_points?i_operation_plan=7",
        ]
    );
}

#[tokio::test]
async fn evaluation_stops_at_failing_step() {
    let (base, mut heads) = serve(vec![
        Canned::json(
            "200 OK",
            r#"{"prediction_indices":[10],"prediction_errors":[0.1],"mean_error":0.1}"#,
        ),
        Canned::json("409 Conflict", r#"{"detail":"Points are locked."}"#),
    ])
    .await;
    let api = PositioningApi::new(transport(), base, Session::anonymous());

    let err = api
        .evaluate_positioning_error(PlanId::parse("7").expect("numeric"))
        .await
        .expect_err("delete step fails");
    assert_eq!(err.step, EvaluationStep::RemovePreviousPoints);
    assert_eq!(err.to_string(), "Points are locked.");

    let _ = heads.recv().await.expect("mean error request");
    let _ = heads.recv().await.expect("delete request");
    assert!(heads.try_recv().is_err(), "save step must not run");
}
