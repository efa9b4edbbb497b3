//! Main window and embedded webview.
//!
//! Engine callbacks only talk to the shared [`Session`] and post [`UserEvent`]s;
//! anything that needs the window or the webview itself happens on the event
//! loop in `main`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use tao::event_loop::{EventLoop, EventLoopProxy};
use tao::window::{Icon, Window, WindowBuilder};
use tracing::{debug, info, warn};
use webmail_shell::shell::bridge::{BRIDGE_SCRIPT, setup_page_html};
use webmail_shell::shell::download::{download_destination, suggested_filename};
use webmail_shell::shell::loading_title;
use webmail_shell::{
    BridgeMessage, ICON_FILE_NAME, NavigationDecision, PopupDecision, Session, SetupInput,
    StartupTarget, is_external_scheme, parse_bridge_message,
};
use wry::{NewWindowResponse, WebView, WebViewBuilder};

use crate::dialogs;

/// Routing state shared between the event loop and engine callbacks.
pub type SharedSession = Arc<Mutex<Session>>;

/// Events delivered to the main event loop.
#[derive(Debug)]
pub enum UserEvent {
    /// The page title changed.
    TitleChanged(String),
    /// The setup form produced an input.
    Setup(SetupInput),
    /// A URL must be opened by the OS handler.
    OpenExternal(String),
}

/// Runs `f` on the session, recovering the state if a callback panicked mid-update.
pub fn with_session<R>(session: &SharedSession, f: impl FnOnce(&mut Session) -> R) -> R {
    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Hands `url` to the operating system's default handler.
///
/// Only web and mail URLs are handed over; page-supplied bridge messages pick
/// the URL, so anything else is dropped.
pub fn open_external(url: &str) {
    if !is_external_scheme(url) {
        warn!(url, "refusing to open URL with system handler");
        return;
    }
    match open::that(url) {
        Ok(()) => info!(url, "opened with system handler"),
        Err(e) => warn!(url, error = %e, "system handler failed to open URL"),
    }
}

/// Creates the maximized main window with the loading title and icon.
pub fn build_window(event_loop: &EventLoop<UserEvent>) -> Result<Window> {
    let mut builder = WindowBuilder::new()
        .with_title(loading_title())
        .with_maximized(true);
    if let Some(icon) = load_icon() {
        builder = builder.with_window_icon(Some(icon));
    }
    builder
        .build(event_loop)
        .context("failed to create main window")
}

/// Creates the webview showing either the configured URL or the setup page.
pub fn build_webview(
    window: &Window,
    target: &StartupTarget,
    session: &SharedSession,
    proxy: &EventLoopProxy<UserEvent>,
) -> Result<WebView> {
    let ipc_session = Arc::clone(session);
    let ipc_proxy = proxy.clone();
    let nav_session = Arc::clone(session);
    let nav_proxy = proxy.clone();
    let popup_session = Arc::clone(session);
    let popup_proxy = proxy.clone();
    let title_proxy = proxy.clone();

    let builder = WebViewBuilder::new()
        .with_devtools(cfg!(debug_assertions))
        .with_initialization_script_for_main_only(BRIDGE_SCRIPT, false)
        .with_ipc_handler(move |request: wry::http::Request<String>| {
            handle_ipc(request.body(), &ipc_session, &ipc_proxy);
        })
        .with_navigation_handler(move |url: String| {
            match with_session(&nav_session, |s| s.on_navigation(&url)) {
                NavigationDecision::Allow => true,
                NavigationDecision::Divert => {
                    send(&nav_proxy, UserEvent::OpenExternal(url));
                    false
                }
            }
        })
        .with_new_window_req_handler(move |url: String, _features| {
            if let PopupDecision::SuppressAndDivert(target) =
                with_session(&popup_session, |s| s.on_new_window(&url))
            {
                send(&popup_proxy, UserEvent::OpenExternal(target));
            }
            NewWindowResponse::Deny
        })
        .with_document_title_changed_handler(move |title: String| {
            send(&title_proxy, UserEvent::TitleChanged(title));
        })
        .with_download_started_handler(on_download_started)
        .with_download_completed_handler(|url: String, path: Option<PathBuf>, success: bool| {
            if success {
                info!(url = %url, path = ?path, "download finished");
            } else {
                warn!(url = %url, path = ?path, "download failed");
            }
        });

    let builder = match target {
        StartupTarget::Load(url) => builder.with_url(url),
        StartupTarget::FirstRun => builder.with_html(setup_page_html()),
    };

    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        builder.build_gtk(window.gtk_window())
    };

    #[cfg(not(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    )))]
    let webview = builder.build(window);

    webview.context("failed to create webview")
}

fn send(proxy: &EventLoopProxy<UserEvent>, event: UserEvent) {
    if let Err(e) = proxy.send_event(event) {
        debug!(error = %e, "event loop gone, dropping event");
    }
}

fn handle_ipc(body: &str, session: &SharedSession, proxy: &EventLoopProxy<UserEvent>) {
    let message = match parse_bridge_message(body) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "ignoring bridge message");
            return;
        }
    };

    match message {
        BridgeMessage::LinkHovered { url } => with_session(session, |s| s.record_hover(&url)),
        BridgeMessage::LinkClicked { url, main_frame } => {
            with_session(session, |s| s.record_click(&url, main_frame));
        }
        BridgeMessage::SetupSubmitted { url } => send(proxy, UserEvent::Setup(SetupInput::Submit(url))),
        BridgeMessage::SetupCancelled => send(proxy, UserEvent::Setup(SetupInput::Cancel)),
    }
}

fn on_download_started(url: String, destination: &mut PathBuf) -> bool {
    let filename = suggested_filename(&url, destination);
    info!(url = %url, filename = %filename, "download requested");

    let Some(folder) = dialogs::pick_download_folder() else {
        info!(url = %url, "no folder chosen, download not accepted");
        return false;
    };

    *destination = download_destination(&folder, &filename);
    info!(path = %destination.display(), "download accepted");
    true
}

fn load_icon() -> Option<Icon> {
    let path = icon_candidates().into_iter().find(|p| p.is_file())?;
    match decode_icon(&path) {
        Ok(icon) => Some(icon),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not load window icon");
            None
        }
    }
}

fn icon_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(ICON_FILE_NAME));
    }
    candidates.push(PathBuf::from(ICON_FILE_NAME));
    candidates
}

fn decode_icon(path: &Path) -> Result<Icon> {
    let rgba = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    Icon::from_rgba(rgba.into_raw(), width, height).context("building window icon")
}
