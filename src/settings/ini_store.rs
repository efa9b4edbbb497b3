//! INI-file backed settings store.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::{debug, info, warn};

use super::KeyValueStore;
use super::error::SettingsError;

/// Section older installs stored their keys under.
const LEGACY_SECTION: &str = "General";

/// Settings persisted in an INI file.
///
/// Keys live in the section-less (general) area. A file that cannot be read or
/// parsed is treated as empty so the caller falls back to first-run setup;
/// the next successful [`set`](KeyValueStore::set) rewrites it.
#[derive(Debug)]
pub struct IniSettings {
    path: PathBuf,
    ini: Ini,
}

impl IniSettings {
    /// Opens the settings file at `path`, tolerating a missing or corrupt file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let ini = match Self::load(&path) {
            Ok(Some(ini)) => {
                debug!("settings loaded");
                ini
            }
            Ok(None) => {
                info!("no settings file yet");
                Ini::new()
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable settings file");
                Ini::new()
            }
        };
        Self { path, ini }
    }

    /// Loads the file strictly, distinguishing "absent" from "broken".
    ///
    /// Returns `Ok(None)` when no file exists at `path`.
    pub fn load(path: &Path) -> Result<Option<Ini>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        Ini::load_from_file(path)
            .map(Some)
            .map_err(|e| SettingsError::from_load(path, e))
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for IniSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.ini
            .get_from(None::<String>, key)
            .or_else(|| self.ini.get_from(Some(LEGACY_SECTION), key))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.ini.with_section(None::<String>).set(key, value);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| SettingsError::write(&self.path, e))?;
        }
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| SettingsError::write(&self.path, e))?;
        debug!(key, path = %self.path.display(), "setting persisted");
        Ok(())
    }
}
