// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Server**: Base URL and request deadline
//! - **Positioning**: Render size and point status polling

// ==========================================================================
// Server Defaults
// ==========================================================================

/// Planning server used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Deadline before an image request is cancelled (in milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Minimum accepted request deadline (in milliseconds).
pub const MIN_TIMEOUT_MS: u64 = 1_000;

/// Maximum accepted request deadline (in milliseconds).
pub const MAX_TIMEOUT_MS: u64 = 600_000;

// ==========================================================================
// Positioning Defaults
// ==========================================================================

/// Width requested from the bone positioning renderer.
pub const DEFAULT_POSITIONING_WIDTH: u32 = 1200;

/// Height requested from the bone positioning renderer.
pub const DEFAULT_POSITIONING_HEIGHT: u32 = 800;

/// Interval between point registration status polls (in seconds).
pub const DEFAULT_STATUS_POLL_SECS: u64 = 15;

/// Minimum polling interval (in seconds).
pub const MIN_STATUS_POLL_SECS: u64 = 1;

/// Maximum polling interval (in seconds).
pub const MAX_STATUS_POLL_SECS: u64 = 600;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_TIMEOUT_MS > 0);
    assert!(DEFAULT_TIMEOUT_MS >= MIN_TIMEOUT_MS);
    assert!(DEFAULT_TIMEOUT_MS <= MAX_TIMEOUT_MS);

    assert!(DEFAULT_POSITIONING_WIDTH > 0);
    assert!(DEFAULT_POSITIONING_HEIGHT > 0);

    assert!(MIN_STATUS_POLL_SECS > 0);
    assert!(DEFAULT_STATUS_POLL_SECS >= MIN_STATUS_POLL_SECS);
    assert!(DEFAULT_STATUS_POLL_SECS <= MAX_STATUS_POLL_SECS);
};
