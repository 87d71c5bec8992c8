// SPDX-License-Identifier: MPL-2.0
//! This module handles the client configuration, loaded from a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - UI language
//! - `[server]` - Planning server base URL and request deadline
//! - `[positioning]` - Render size and point status polling interval
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()` with explicit path
//! 2. `--config-dir` on the command line
//! 3. Set `ORTHOVIEW_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use orthoview::config::{self, Config};
//!
//! let (config, _warning) = config::load();
//! let deadline = config.request_timeout();
//! let base_url = config.base_url().expect("invalid base URL");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// Warning key returned by [`load`] when an existing file cannot be parsed.
pub const LOAD_WARNING_KEY: &str = "notice-config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Planning server connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Base URL every endpoint path is resolved against.
    #[serde(default = "default_base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Deadline for one image request, in milliseconds.
    #[serde(default = "default_timeout_ms", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Bone positioning screen settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PositioningConfig {
    #[serde(default = "default_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default = "default_height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Seconds between point registration status polls.
    #[serde(
        default = "default_status_poll_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_poll_secs: Option<u64>,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            status_poll_secs: default_status_poll_secs(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Client configuration with logical sections.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub positioning: PositioningConfig,
}

impl Config {
    /// Parses the configured base URL, normalized to end with `/` so that
    /// endpoint paths are appended rather than replacing the last segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL cannot be parsed or cannot carry
    /// a path (e.g. `mailto:`).
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.server.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        parse_base_url(raw)
    }

    /// Request deadline, clamped into the supported range.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        let millis = self
            .server
            .timeout_ms
            .unwrap_or(DEFAULT_TIMEOUT_MS)
            .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        Duration::from_millis(millis)
    }

    /// Render size requested from the positioning endpoint.
    #[must_use]
    pub fn positioning_size(&self) -> (u32, u32) {
        let width = self
            .positioning
            .width
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_POSITIONING_WIDTH);
        let height = self
            .positioning
            .height
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_POSITIONING_HEIGHT);
        (width, height)
    }

    /// Interval between point status polls, clamped into the supported range.
    #[must_use]
    pub fn status_poll_interval(&self) -> Duration {
        let secs = self
            .positioning
            .status_poll_secs
            .unwrap_or(DEFAULT_STATUS_POLL_SECS)
            .clamp(MIN_STATUS_POLL_SECS, MAX_STATUS_POLL_SECS);
        Duration::from_secs(secs)
    }
}

/// Parses a server base URL and makes sure its path ends with `/`.
///
/// # Errors
///
/// Returns [`Error::Config`] when the URL is malformed or cannot be a base.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("invalid base_url '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("base_url '{raw}' cannot be a base")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_base_url() -> Option<String> {
    Some(DEFAULT_BASE_URL.to_string())
}

fn default_timeout_ms() -> Option<u64> {
    Some(DEFAULT_TIMEOUT_MS)
}

fn default_width() -> Option<u32> {
    Some(DEFAULT_POSITIONING_WIDTH)
}

fn default_height() -> Option<u32> {
    Some(DEFAULT_POSITIONING_HEIGHT)
}

fn default_status_poll_secs() -> Option<u64> {
    Some(DEFAULT_STATUS_POLL_SECS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("ignoring unreadable config {}: {err}", path.display());
                    return (Config::default(), Some(LOAD_WARNING_KEY.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================
