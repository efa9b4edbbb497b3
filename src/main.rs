//! Desktop entry point: one window showing the configured webmail portal.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tracing::{debug, error, info};
use webmail_shell::shell::bridge::REFOCUS_SETUP_SCRIPT;
use webmail_shell::{
    FirstRunSetup, IniSettings, Session, SetupStep, StartupTarget, default_settings_path,
    window_title,
};

mod dialogs;
mod window;

use dialogs::NativePrompter;
use window::{UserEvent, open_external, with_session};

fn main() -> Result<()> {
    // Priority: RUST_LOG env var > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Webmail shell starting");

    let settings_path = default_settings_path();
    debug!(path = %settings_path.display(), "settings location");
    let mut settings = IniSettings::open(&settings_path);

    let target = StartupTarget::resolve(&settings);
    let configured = match &target {
        StartupTarget::Load(url) => Some(url.clone()),
        StartupTarget::FirstRun => None,
    };
    let mut setup = configured.is_none().then(FirstRunSetup::new);
    let session = Arc::new(Mutex::new(Session::new(configured)));

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    let main_window = window::build_window(&event_loop)?;
    let webview = window::build_webview(&main_window, &target, &session, &proxy)?;
    let mut prompter = NativePrompter;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(UserEvent::TitleChanged(title)) => {
                main_window.set_title(&window_title(&title));
            }
            Event::UserEvent(UserEvent::OpenExternal(url)) => open_external(&url),
            Event::UserEvent(UserEvent::Setup(input)) => {
                let Some(flow) = setup.as_mut() else {
                    debug!(?input, "setup input without a running setup");
                    return;
                };
                match flow.handle(input, &mut settings, &mut prompter) {
                    SetupStep::RePrompt => {
                        if let Err(e) = webview.evaluate_script(REFOCUS_SETUP_SCRIPT) {
                            debug!(error = %e, "could not refocus setup field");
                        }
                    }
                    SetupStep::Accepted { url, .. } => {
                        with_session(&session, |s| s.set_configured_url(url.clone()));
                        if let Err(e) = webview.load_url(&url) {
                            error!(url = %url, error = %e, "failed to load configured URL");
                        }
                    }
                    SetupStep::Quit => *control_flow = ControlFlow::ExitWithCode(0),
                    SetupStep::Ignored => {}
                }
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Main window closed");
                *control_flow = ControlFlow::Exit;
            }
            _ => {}
        }
    })
}
