// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for the configuration directory.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI argument** (`--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variable** (`ORTHOVIEW_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs` crate
//!
//! CLI overrides should be initialized once at startup:
//! ```ignore
//! paths::init_cli_overrides(flags.config_dir);
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "OrthoView";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "ORTHOVIEW_CONFIG_DIR";

/// Global CLI override for config directory (set once at startup).
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Initializes the CLI override for the config directory.
///
/// Only the first call has an effect; later calls are logged and ignored.
pub fn init_cli_overrides(config_dir: Option<String>) {
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        log::warn!("config dir override already initialized, ignoring");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

/// Returns the application config directory path.
///
/// - Linux: `~/.config/OrthoView/`
/// - macOS: `~/Library/Application Support/OrthoView/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\OrthoView\`
///
/// Returns `None` if the config directory cannot be determined.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory path with an optional override.
///
/// `override_path` takes precedence over every other source.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = get_cli_config_dir() {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel tests from interfering with each other's env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn app_config_dir_contains_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_CONFIG_DIR);

        if let Some(path) = get_app_config_dir() {
            assert!(
                path.to_string_lossy().contains(APP_NAME),
                "App config dir should contain app name"
            );
        }
    }

    #[test]
    fn override_path_takes_precedence_for_config_dir() {
        let override_path = PathBuf::from("/custom/config/path");
        let result = get_app_config_dir_with_override(Some(override_path.clone()));
        assert_eq!(result, Some(override_path));
    }

    #[test]
    fn env_var_overrides_default_config_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let test_path = "/test/config/dir";
        std::env::set_var(ENV_CONFIG_DIR, test_path);

        let result = get_app_config_dir();
        assert_eq!(result, Some(PathBuf::from(test_path)));

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn empty_env_var_uses_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(path) = get_app_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }
}
