// SPDX-License-Identifier: MPL-2.0
//! Inputs of one fetch activation.

use crate::api::ViewName;
use crate::error::FetchError;
use std::fmt;

/// Validated operation plan identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanId(i64);

impl PlanId {
    /// Parses a plan id as typed by the user.
    ///
    /// Surrounding whitespace is ignored. The rest must be a finite number
    /// with no fractional part that fits in `i64`, so `"42"`, `" 42 "` and
    /// `"42.0"` are accepted while `""`, `"abc"`, `"4.5"` and `"1e400"` are
    /// not.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Validation`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FetchError::Validation);
        }
        if let Ok(id) = trimmed.parse::<i64>() {
            return Ok(Self(id));
        }

        let value: f64 = trimmed.parse().map_err(|_| FetchError::Validation)?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(FetchError::Validation);
        }
        // i64::MAX is not representable as f64; the bound is exclusive.
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(FetchError::Validation);
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(value as i64))
    }

    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptor of one activation: what to fetch and the cache-busting counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Plan id as entered, validated when the activation starts.
    pub plan_id: String,
    pub view: ViewName,
    /// Bumped by the refresh button; any change re-activates.
    pub refresh: u64,
}

impl FetchRequest {
    #[must_use]
    pub fn new(plan_id: impl Into<String>, view: ViewName) -> Self {
        Self {
            plan_id: plan_id.into(),
            view,
            refresh: 0,
        }
    }
}
