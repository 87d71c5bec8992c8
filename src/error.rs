// SPDX-License-Identifier: MPL-2.0
//! Error types shared across the client.
//!
//! [`FetchError`] is the taxonomy of the remote image fetch lifecycle. Its
//! [`FetchError::user_message`] strings are shown verbatim in place of an
//! image. [`ApiError`] covers the JSON endpoints of the positioning review.
use crate::api::ErrorDetail;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Fetch(FetchError),
    Api(ApiError),
}

/// Message shown when the operation plan id is missing or not numeric.
pub const INVALID_PLAN_ID_MESSAGE: &str = "Invalid Operation Plan ID provided.";

/// Message shown when the request deadline expires.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Server is taking too long to respond.";

/// Terminal failure of one fetch activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Plan id empty or not numeric. No request was sent.
    Validation,

    /// The server answered with a non-success status.
    Http {
        status: u16,
        /// Reason phrase for the status (e.g. "Not Found").
        status_text: String,
        detail: ErrorDetail,
    },

    /// The deadline expired and the request was dropped.
    Timeout,

    /// Transport failure (DNS, connection refused, reset, invalid URL).
    Network(String),

    /// Success response whose body is not a decodable image.
    Decode(String),
}

impl FetchError {
    /// Text displayed to the user in place of the image.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Validation => INVALID_PLAN_ID_MESSAGE.to_string(),
            FetchError::Http {
                status_text,
                detail,
                ..
            } => match detail {
                ErrorDetail::Provided(detail) => {
                    format!("Failed to fetch image: {status_text} - {detail}")
                }
                ErrorDetail::Missing | ErrorDetail::Undecodable(_) => {
                    format!("Failed to fetch image: {status_text}")
                }
            },
            FetchError::Timeout => TIMEOUT_MESSAGE.to_string(),
            FetchError::Network(cause) | FetchError::Decode(cause) => {
                format!("Error fetching image: {cause}")
            }
        }
    }

    /// Short category name, used by diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Validation => "validation",
            FetchError::Http { .. } => "http",
            FetchError::Timeout => "timeout",
            FetchError::Network(_) => "network",
            FetchError::Decode(_) => "decode",
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for FetchError {}

/// Failure of a JSON endpoint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Http {
        status: u16,
        status_text: String,
        detail: ErrorDetail,
    },
    Network(String),
    /// Success response whose body does not match the expected JSON shape.
    Decode(String),
}

impl ApiError {
    /// The server supplied `detail`, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Http {
                detail: ErrorDetail::Provided(detail),
                ..
            } => Some(detail),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http {
                status_text,
                detail: ErrorDetail::Provided(detail),
                ..
            } => write!(f, "{status_text} - {detail}"),
            ApiError::Http {
                status,
                status_text,
                ..
            } => write!(f, "HTTP {status} {status_text}"),
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
            ApiError::Decode(msg) => write!(f, "Unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Fetch(e) => write!(f, "Fetch Error: {}", e),
            Error::Api(e) => write!(f, "API Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Error::Fetch(err)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
