//! Webmail Shell Library
//!
//! Policy core of a single-window desktop client for a webmail portal. The
//! binary embeds a webview and forwards its events here; nothing in this
//! library depends on a running rendering engine.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`guard`] - URL syntax checks and host-boundary decisions
//! - [`settings`] - Persisted configuration (the webmail URL)
//! - [`setup`] - First-run setup state machine
//! - [`shell`] - Per-window routing state, JS bridge, download destinations

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod guard;
pub mod settings;
pub mod setup;
pub mod shell;

/// Name shown in window titles and dialogs.
pub const APPLICATION_NAME: &str = "E-mail App";

/// Window icon file name, looked up next to the executable and in the working directory.
pub const ICON_FILE_NAME: &str = "logo.ico";

// Re-export commonly used types
pub use guard::{
    GuardError, NavigationDecision, NavigationRequest, PopupDecision, decide_navigation,
    decide_popup, is_external_scheme, is_same_host, normalize_first_run_url, validate_url_syntax,
};
pub use settings::{IniSettings, KeyValueStore, SettingsError, URL_KEY, default_settings_path};
pub use setup::{FirstRunSetup, SetupInput, SetupPrompter, SetupState, SetupStep};
pub use shell::bridge::{BridgeError, BridgeMessage, parse_bridge_message};
pub use shell::{Session, StartupTarget, window_title};
