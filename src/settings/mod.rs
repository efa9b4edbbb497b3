//! Configuration store for the single persisted setting.
//!
//! The application keeps exactly one key, [`URL_KEY`], in a local INI file.
//! [`KeyValueStore`] is the seam the setup flow writes through; [`IniSettings`]
//! is the on-disk implementation.

mod error;
mod ini_store;

pub use error::SettingsError;
pub use ini_store::IniSettings;

use std::path::PathBuf;

/// Key holding the configured webmail URL.
pub const URL_KEY: &str = "url";

/// Directory name used under the platform config directory.
pub const SETTINGS_DIR_NAME: &str = "webmail-shell";

/// File name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.ini";

/// Minimal key-value persistence used by the shell.
pub trait KeyValueStore {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` and persists it.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Resolves the default settings file location.
///
/// Priority:
/// 1. `<platform config dir>/webmail-shell/settings.ini`
/// 2. `settings.ini` in the working directory
#[must_use]
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(SETTINGS_FILE_NAME),
        |dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME),
    )
}
