// SPDX-License-Identifier: MPL-2.0
//! Parsing of `{"detail": ...}` error bodies.
//!
//! The planning server (FastAPI) reports failures as JSON with a `detail`
//! field. Bodies that are not JSON are a distinct outcome so callers can
//! tell "no detail" from "unreadable body".

use serde::Deserialize;

/// What could be extracted from an error response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Non-empty `detail` supplied by the server.
    Provided(String),
    /// Valid JSON without a usable `detail`.
    Missing,
    /// Body is not JSON. Carries the parser message.
    Undecodable(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extracts the `detail` of an error body.
///
/// String details are used as-is. Structured details (FastAPI validation
/// errors are arrays) are rendered as compact JSON. Falsy details (`""`,
/// `null`, `false`, `0`) count as missing.
#[must_use]
pub fn parse_detail(body: &[u8]) -> ErrorDetail {
    let parsed: ErrorBody = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(_) => return ErrorDetail::Missing,
        },
        Ok(_) => return ErrorDetail::Missing,
        Err(err) => return ErrorDetail::Undecodable(err.to_string()),
    };

    match parsed.detail {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => {
            ErrorDetail::Provided(detail)
        }
        Some(serde_json::Value::String(_) | serde_json::Value::Null) | None => {
            ErrorDetail::Missing
        }
        Some(serde_json::Value::Bool(false)) => ErrorDetail::Missing,
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => ErrorDetail::Missing,
        Some(other) => ErrorDetail::Provided(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_provided() {
        assert_eq!(
            parse_detail(br#"{"detail":"not found"}"#),
            ErrorDetail::Provided("not found".into())
        );
    }

    #[test]
    fn empty_or_null_detail_is_missing() {
        assert_eq!(parse_detail(br#"{"detail":""}"#), ErrorDetail::Missing);
        assert_eq!(parse_detail(br#"{"detail":null}"#), ErrorDetail::Missing);
        assert_eq!(parse_detail(br#"{"message":"x"}"#), ErrorDetail::Missing);
        assert_eq!(parse_detail(b"[1,2]"), ErrorDetail::Missing);
    }

    #[test]
    fn falsy_scalar_details_are_missing() {
        assert_eq!(parse_detail(br#"{"detail":false}"#), ErrorDetail::Missing);
        assert_eq!(parse_detail(br#"{"detail":0}"#), ErrorDetail::Missing);
        assert_eq!(parse_detail(br#"{"detail":0.0}"#), ErrorDetail::Missing);
        assert_eq!(
            parse_detail(br#"{"detail":7}"#),
            ErrorDetail::Provided("7".to_string())
        );
        assert_eq!(
            parse_detail(br#"{"detail":true}"#),
            ErrorDetail::Provided("true".to_string())
        );
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let detail = parse_detail(br#"{"detail":[{"loc":["query","i_operation_plan"]}]}"#);
        assert_eq!(
            detail,
            ErrorDetail::Provided(r#"[{"loc":["query","i_operation_plan"]}]"#.into())
        );
    }

    #[test]
    fn html_body_is_undecodable() {
        let detail = parse_detail(b"<html><body>Bad Gateway</body></html>");
        assert!(matches!(detail, ErrorDetail::Undecodable(_)));
    }

    #[test]
    fn empty_body_is_undecodable() {
        assert!(matches!(parse_detail(b""), ErrorDetail::Undecodable(_)));
    }
}
