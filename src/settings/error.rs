//! Error types for the settings store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("could not read settings file {path}: {source}")]
    Read {
        /// Location of the settings file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid INI.
    #[error("settings file {path} is corrupt: {reason}")]
    Parse {
        /// Location of the settings file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// The settings file could not be written.
    #[error("could not write settings file {path}: {source}")]
    Write {
        /// Location of the settings file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    /// Maps a `rust-ini` load failure onto the matching variant.
    #[must_use]
    pub fn from_load(path: impl Into<PathBuf>, error: ini::Error) -> Self {
        let path = path.into();
        match error {
            ini::Error::Io(source) => Self::Read { path, source },
            ini::Error::Parse(parse) => Self::Parse {
                path,
                reason: parse.to_string(),
            },
        }
    }

    /// Creates a write error.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
