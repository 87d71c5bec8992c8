// SPDX-License-Identifier: MPL-2.0
//! Authenticated request construction.
//!
//! Every request to the planning server carries a JSON content type and the
//! session's bearer token. Caller headers are kept, except that these two
//! names are always overwritten.

use crate::session::Session;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};

/// Per-request settings supplied by the caller.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Vec<u8>>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// Merges caller headers with the fixed content type and authorization.
#[must_use]
pub fn auth_headers(session: &Session, caller: &HeaderMap) -> HeaderMap {
    let mut headers = caller.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let bearer = match HeaderValue::from_str(&session.bearer()) {
        Ok(value) => value,
        Err(_) => {
            // Token with characters not allowed in a header value.
            log::warn!("session token is not a valid header value, sending placeholder");
            HeaderValue::from_static("Bearer null")
        }
    };
    headers.insert(AUTHORIZATION, bearer);
    headers
}

/// Builds an authenticated request. Dropping the future returned by `send`
/// cancels it.
#[must_use]
pub fn authorized_request(
    client: &reqwest::Client,
    url: Url,
    options: RequestOptions,
    session: &Session,
) -> RequestBuilder {
    let headers = auth_headers(session, &options.headers);
    let builder = client.request(options.method, url).headers(headers);
    match options.body {
        Some(body) => builder.body(body),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::ACCEPT;

    #[test]
    fn adds_content_type_and_bearer() {
        let session = Session::new(Some("tok".into()));
        let headers = auth_headers(&session, &HeaderMap::new());

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn keeps_caller_headers_but_overrides_fixed_ones() {
        let mut caller = HeaderMap::new();
        caller.insert(ACCEPT, HeaderValue::from_static("image/png"));
        caller.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        caller.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));

        let headers = auth_headers(&Session::new(Some("tok".into())), &caller);

        assert_eq!(headers[ACCEPT], "image/png");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer tok");
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn missing_token_is_not_a_local_error() {
        let headers = auth_headers(&Session::anonymous(), &HeaderMap::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer null");
    }

    #[test]
    fn invalid_token_characters_fall_back_to_placeholder() {
        let headers = auth_headers(&Session::new(Some("bad\ntoken".into())), &HeaderMap::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer null");
    }

    #[test]
    fn authorized_request_carries_method_and_headers() {
        let client = reqwest::Client::new();
        let url = Url::parse("http://127.0.0.1:8000/preop_bone_positioning/remove_registered_points")
            .expect("valid url");
        let request = authorized_request(
            &client,
            url.clone(),
            RequestOptions::method(Method::DELETE),
            &Session::new(Some("tok".into())),
        )
        .build()
        .expect("request builds");

        assert_eq!(request.method(), &Method::DELETE);
        assert_eq!(request.url(), &url);
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer tok");
        assert!(request.body().is_none());
    }
}
