// SPDX-License-Identifier: MPL-2.0
//! Test helpers: a scripted in-memory transport and image fixtures.

use crate::api::{ApiRequest, RawResponse, ServerTransport, TransportError};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Encodes a solid `width`x`height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image_rs::RgbaImage::from_pixel(width, height, image_rs::Rgba([200, 120, 40, 255]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image_rs::ImageFormat::Png)
        .expect("PNG encoding succeeds");
    buffer.into_inner()
}

/// Scripted outcome of one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Response(RawResponse),
    Fail(String),
    /// Never answers.
    Hang,
    /// Answers after the given (tokio) delay.
    After(Duration, RawResponse),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Response(RawResponse::new(StatusCode::OK, body.as_bytes()))
    }

    pub fn png(width: u32, height: u32) -> Self {
        Reply::Response(RawResponse::new(StatusCode::OK, png_bytes(width, height)))
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Reply::Response(RawResponse::new(status, body.as_bytes()))
    }

    pub fn network(cause: &str) -> Self {
        Reply::Fail(cause.to_string())
    }
}

/// Counts request futures dropped before they produced a response.
struct AbandonGuard {
    counter: Arc<AtomicUsize>,
    finished: bool,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// [`ServerTransport`] answering from a script, in order.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
    abandoned: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Number of requests cancelled while in flight.
    pub fn abandoned(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }
}

impl ServerTransport for FakeTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'static, Result<RawResponse, TransportError>> {
        self.requests.lock().expect("requests lock").push(request);
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Reply::network("no scripted reply"));
        let guard = AbandonGuard {
            counter: Arc::clone(&self.abandoned),
            finished: false,
        };

        async move {
            // Binding the whole guard moves it into the future.
            let mut guard = guard;
            let result = match reply {
                Reply::Response(response) => Ok(response),
                Reply::Fail(cause) => Err(TransportError(cause)),
                Reply::Hang => futures_util::future::pending().await,
                Reply::After(delay, response) => {
                    tokio::time::sleep(delay).await;
                    Ok(response)
                }
            };
            guard.finished = true;
            result
        }
        .boxed()
    }
}

/// Records every log line emitted by the crate during tests.
struct CaptureLogger {
    records: Mutex<Vec<(log::Level, String)>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.target().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

/// Installs the capturing logger once per test binary.
pub fn capture_logs() {
    if log::set_logger(&CAPTURE).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}

/// Levels of the lines logged so far under `target`.
pub fn logged_levels(target: &str) -> Vec<log::Level> {
    CAPTURE
        .records
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(_, t)| t == target)
                .map(|(level, _)| *level)
                .collect()
        })
        .unwrap_or_default()
}
