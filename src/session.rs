// SPDX-License-Identifier: MPL-2.0
//! Explicit session context carrying the bearer token.
//!
//! The token is obtained by the login flow of the planning suite and handed
//! to this client on the command line or through the environment. It is
//! passed by value into every request; nothing reads it from global state.

use std::fmt;
use std::sync::Arc;

/// Environment variable consulted when no `--token` is given.
pub const ENV_TOKEN: &str = "ORTHOVIEW_TOKEN";

/// Token placeholder sent when the session has no token. The server answers
/// such requests with an authorization failure.
const MISSING_TOKEN: &str = "null";

/// Authenticated session. Cheap to clone.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<Arc<str>>,
}

impl Session {
    /// Creates a session. Empty or whitespace-only tokens count as absent.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Arc::from);
        Self { token }
    }

    /// Session without a token.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Uses the CLI token when given, else `ORTHOVIEW_TOKEN`.
    #[must_use]
    pub fn resolve(cli_token: Option<String>) -> Self {
        let session = Self::new(cli_token);
        if session.token.is_some() {
            return session;
        }
        Self::new(std::env::var(ENV_TOKEN).ok())
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token().unwrap_or(MISSING_TOKEN))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_uses_token() {
        let session = Session::new(Some("abc.def".into()));
        assert_eq!(session.bearer(), "Bearer abc.def");
        assert!(session.is_authenticated());
    }

    #[test]
    fn missing_token_sends_null_placeholder() {
        assert_eq!(Session::anonymous().bearer(), "Bearer null");
        assert_eq!(Session::new(Some("   ".into())).bearer(), "Bearer null");
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::new(Some("secret-token".into()));
        let printed = format!("{session:?}");
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("authenticated: true"));
    }

    #[test]
    fn cli_token_wins_over_environment() {
        let session = Session::resolve(Some("from-cli".into()));
        assert_eq!(session.token(), Some("from-cli"));
    }
}
