//! View shell policy state.
//!
//! Everything the window does that is not rendering lives here, independent of
//! the webview so it can be driven from tests: what to load at startup, how
//! the window title reads, and the per-window [`Session`] that routes link
//! clicks and popup requests through the domain guard.

pub mod bridge;
pub mod download;

use tracing::{debug, info};
use url::Url;

use crate::APPLICATION_NAME;
use crate::guard::{
    NavigationDecision, NavigationRequest, PopupDecision, decide_navigation, decide_popup,
};
use crate::settings::{KeyValueStore, URL_KEY};

/// Title shown until the first page reports its own.
#[must_use]
pub fn loading_title() -> String {
    window_title("Loading")
}

/// Formats the window title for a page title.
#[must_use]
pub fn window_title(page_title: &str) -> String {
    format!("{APPLICATION_NAME}: {page_title}")
}

/// What the window shows first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupTarget {
    /// A URL is configured; load it.
    Load(String),
    /// Nothing configured; run first-run setup.
    FirstRun,
}

impl StartupTarget {
    /// Reads the configured URL once and decides.
    pub fn resolve<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(URL_KEY) {
            Some(url) => {
                info!(url = %url, "configured URL found");
                Self::Load(url)
            }
            None => {
                info!("no configured URL, starting first-run setup");
                Self::FirstRun
            }
        }
    }
}

/// A link click waiting for the navigation it should cause.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingClick {
    url: String,
    main_frame: bool,
}

/// Per-window routing state.
///
/// Holds the trusted configured URL, the most recently hovered link and the
/// last unhandled link click. Engine callbacks feed it events and act on the
/// decisions it returns.
#[derive(Debug, Default)]
pub struct Session {
    configured_url: Option<String>,
    hovered_url: Option<String>,
    pending_click: Option<PendingClick>,
}

impl Session {
    /// Creates a session, optionally with the configured URL already known.
    #[must_use]
    pub fn new(configured_url: Option<String>) -> Self {
        Self {
            configured_url,
            ..Self::default()
        }
    }

    /// The trusted URL, once setup has finished.
    #[must_use]
    pub fn configured_url(&self) -> Option<&str> {
        self.configured_url.as_deref()
    }

    /// Records the URL accepted by first-run setup.
    pub fn set_configured_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        debug!(url = %url, "configured URL set for session");
        self.configured_url = Some(url);
    }

    /// Records the link under the pointer; an empty URL clears it.
    pub fn record_hover(&mut self, url: &str) {
        self.hovered_url = (!url.is_empty()).then(|| url.to_string());
    }

    /// The most recently hovered link, if the pointer is on one.
    #[must_use]
    pub fn hovered_url(&self) -> Option<&str> {
        self.hovered_url.as_deref()
    }

    /// Records an unhandled link click reported by the page.
    pub fn record_click(&mut self, url: &str, main_frame: bool) {
        self.pending_click = Some(PendingClick {
            url: url.to_string(),
            main_frame,
        });
    }

    /// Classifies a navigation the engine is about to start and decides on it.
    ///
    /// The navigation counts as user-initiated when it targets the pending
    /// click, which is consumed either way.
    pub fn on_navigation(&mut self, target_url: &str) -> NavigationDecision {
        let request = match self.pending_click.take() {
            Some(click) if same_url(&click.url, target_url) => {
                NavigationRequest::link_click(target_url, click.main_frame)
            }
            _ => NavigationRequest::automatic(target_url),
        };
        let decision = decide_navigation(&request, self.configured_url().unwrap_or_default());
        if decision == NavigationDecision::Divert {
            info!(url = target_url, "diverting external link to system handler");
        }
        decision
    }

    /// Decides what to do with a new-window request.
    ///
    /// The last hovered link is the popup target when there is one; otherwise
    /// the URL the engine attached to the request is used.
    pub fn on_new_window(&self, requested_url: &str) -> PopupDecision {
        let Some(configured) = self.configured_url() else {
            debug!(url = requested_url, "popup before setup finished, denying");
            return PopupDecision::Deny;
        };
        let target = self.hovered_url().unwrap_or(requested_url);
        decide_popup(target, configured)
    }
}

fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
