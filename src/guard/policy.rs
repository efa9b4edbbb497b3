//! Host-boundary decisions for navigations and popup requests.
//!
//! Everything here is a pure function of its inputs so the policy can be
//! exercised without a running webview.

use tracing::debug;
use url::Url;

/// A navigation the rendering engine is about to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Absolute URL the engine wants to load
    pub target_url: String,
    /// Whether the navigation comes from the user clicking a link
    pub is_user_initiated: bool,
    /// Whether the navigation targets the top-level document
    pub is_main_frame: bool,
}

impl NavigationRequest {
    /// Creates a request triggered by a link click.
    #[must_use]
    pub fn link_click(target_url: impl Into<String>, is_main_frame: bool) -> Self {
        Self {
            target_url: target_url.into(),
            is_user_initiated: true,
            is_main_frame,
        }
    }

    /// Creates a request the page or engine started on its own (redirects, scripts, reloads).
    #[must_use]
    pub fn automatic(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            is_user_initiated: false,
            is_main_frame: true,
        }
    }
}

/// Outcome of [`decide_navigation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the engine render the target in-app.
    Allow,
    /// Cancel the in-app navigation and hand the URL to the OS handler.
    Divert,
}

/// Outcome of [`decide_popup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupDecision {
    /// Do not create a window; open the contained URL with the OS handler instead.
    SuppressAndDivert(String),
    /// Do not create a window and do nothing else.
    Deny,
}

/// Returns `true` when both URLs parse and carry the same host.
///
/// Scheme, port, path and query are ignored. Host names compare
/// case-insensitively; a side without a host (`mailto:`, garbage) never matches.
#[must_use]
pub fn is_same_host(configured_url: &str, requested_url: &str) -> bool {
    match (host_of(configured_url), host_of(requested_url)) {
        (Some(configured), Some(requested)) => configured.eq_ignore_ascii_case(&requested),
        _ => false,
    }
}

/// URL schemes the OS handler may be asked to open.
pub const EXTERNAL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Returns `true` when `url` parses and its scheme is one of [`EXTERNAL_SCHEMES`].
///
/// Anything else (`file:`, `javascript:`, `about:`, custom protocol handlers)
/// is never handed to the OS handler.
#[must_use]
pub fn is_external_scheme(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| EXTERNAL_SCHEMES.contains(&parsed.scheme()))
}

fn host_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(host.trim_end_matches('.').to_string())
}

/// Decides whether a navigation may render in-app.
///
/// Anything the user did not start by clicking a link is allowed (redirects,
/// single sign-on hops, scripted loads). A clicked link is allowed only when it
/// stays on the configured host; otherwise it is diverted to the OS handler.
#[must_use]
pub fn decide_navigation(requested: &NavigationRequest, configured_url: &str) -> NavigationDecision {
    let decision = if !requested.is_user_initiated
        || is_same_host(configured_url, &requested.target_url)
    {
        NavigationDecision::Allow
    } else {
        NavigationDecision::Divert
    };
    debug!(
        url = %requested.target_url,
        user_initiated = requested.is_user_initiated,
        main_frame = requested.is_main_frame,
        ?decision,
        "navigation decided"
    );
    decision
}

/// Decides what happens when the page asks for a new window or tab.
///
/// The application never opens a second in-app window. When the link that was
/// last hovered leads off the configured host it is handed to the OS handler;
/// a target without a host (`mailto:`) counts as off-host. Empty targets,
/// unparseable ones and schemes outside [`EXTERNAL_SCHEMES`] are denied.
#[must_use]
pub fn decide_popup(hovered_url: &str, configured_url: &str) -> PopupDecision {
    let decision = if !is_external_scheme(hovered_url) || is_same_host(configured_url, hovered_url)
    {
        PopupDecision::Deny
    } else {
        PopupDecision::SuppressAndDivert(hovered_url.to_string())
    };
    debug!(url = hovered_url, ?decision, "popup decided");
    decision
}
