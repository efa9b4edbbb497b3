//! First-run setup: establishes the configured URL when none is stored.
//!
//! The flow is driven by user input arriving one event at a time (the setup
//! form lives inside the webview), so [`FirstRunSetup`] is an explicit state
//! machine rather than a blocking loop:
//!
//! ```text
//! PromptingUrl --submit--> ValidatingUrl --invalid--> (warn) PromptingUrl
//!                                        --valid----> Accepted
//! PromptingUrl --cancel--> UserCancelled --confirm--> quit
//!                                        --decline--> PromptingUrl
//! ```
//!
//! Blocking dialogs (warning, quit confirmation) go through [`SetupPrompter`].

use tracing::{debug, error, info};

use crate::guard::{GuardError, check_url_syntax, normalize_first_run_url};
use crate::settings::{KeyValueStore, URL_KEY};

/// Where the setup flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    /// Waiting for the user to submit or cancel.
    PromptingUrl,
    /// A submission is being checked.
    ValidatingUrl,
    /// A valid URL was accepted and stored. Terminal.
    Accepted,
    /// The user cancelled and is being asked whether to quit.
    UserCancelled,
}

/// One user action on the setup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupInput {
    /// The user pressed OK with this text.
    Submit(String),
    /// The user pressed Cancel.
    Cancel,
}

/// What the shell must do after an input was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStep {
    /// Keep showing the form.
    RePrompt,
    /// Load `url`; `persisted` is false when writing the settings file failed.
    Accepted {
        /// Normalized webmail URL
        url: String,
        /// Whether the URL reached the settings file
        persisted: bool,
    },
    /// The user confirmed they want to quit.
    Quit,
    /// Input arrived after the flow finished and was ignored.
    Ignored,
}

/// Blocking dialogs the setup flow needs from the host.
pub trait SetupPrompter {
    /// Shows a blocking warning explaining why `error`'s submission was rejected.
    fn warn_invalid_url(&mut self, error: &GuardError);

    /// Asks "really quit?"; returns `true` for Yes.
    fn confirm_quit(&mut self) -> bool;
}

/// State machine for the one-time URL configuration.
#[derive(Debug)]
pub struct FirstRunSetup {
    state: SetupState,
    rejected: u32,
    finished: bool,
}

impl Default for FirstRunSetup {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstRunSetup {
    /// Starts the flow in [`SetupState::PromptingUrl`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SetupState::PromptingUrl,
            rejected: 0,
            finished: false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SetupState {
        self.state
    }

    /// Number of submissions rejected so far.
    #[must_use]
    pub fn rejected_submissions(&self) -> u32 {
        self.rejected
    }

    /// Whether the flow reached a terminal outcome (accepted or quit).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Handles one user action.
    ///
    /// A valid submission is normalized and written to `store` under
    /// [`URL_KEY`] exactly once. Invalid submissions and declined quits return
    /// to [`SetupState::PromptingUrl`]; there is no retry bound.
    pub fn handle<S, P>(&mut self, input: SetupInput, store: &mut S, prompter: &mut P) -> SetupStep
    where
        S: KeyValueStore + ?Sized,
        P: SetupPrompter + ?Sized,
    {
        if self.finished {
            debug!(?input, "setup already finished, ignoring input");
            return SetupStep::Ignored;
        }

        match input {
            SetupInput::Submit(candidate) => self.submit(candidate.trim(), store, prompter),
            SetupInput::Cancel => self.cancel(prompter),
        }
    }

    fn submit<S, P>(&mut self, candidate: &str, store: &mut S, prompter: &mut P) -> SetupStep
    where
        S: KeyValueStore + ?Sized,
        P: SetupPrompter + ?Sized,
    {
        self.transition(SetupState::ValidatingUrl);

        if let Err(e) = check_url_syntax(candidate) {
            self.rejected += 1;
            info!(error = %e, rejected = self.rejected, "setup URL rejected");
            prompter.warn_invalid_url(&e);
            self.transition(SetupState::PromptingUrl);
            return SetupStep::RePrompt;
        }

        let url = normalize_first_run_url(candidate);
        let persisted = match store.set(URL_KEY, &url) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "could not persist configured URL; continuing for this session");
                false
            }
        };
        info!(url = %url, persisted, "setup URL accepted");
        self.transition(SetupState::Accepted);
        self.finished = true;
        SetupStep::Accepted { url, persisted }
    }

    fn cancel<P>(&mut self, prompter: &mut P) -> SetupStep
    where
        P: SetupPrompter + ?Sized,
    {
        self.transition(SetupState::UserCancelled);
        if prompter.confirm_quit() {
            info!("setup cancelled, quitting");
            self.finished = true;
            SetupStep::Quit
        } else {
            self.transition(SetupState::PromptingUrl);
            SetupStep::RePrompt
        }
    }

    fn transition(&mut self, next: SetupState) {
        debug!(from = ?self.state, to = ?next, "setup transition");
        self.state = next;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::settings::SettingsError;

    #[derive(Default)]
    struct MapStore {
        values: HashMap<String, String>,
        writes: usize,
        fail: bool,
    }

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
            if self.fail {
                return Err(SettingsError::write(
                    "settings.ini",
                    std::io::Error::other("read-only"),
                ));
            }
            self.writes += 1;
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Answers {
        quit: bool,
        warnings: Vec<GuardError>,
        confirmations: usize,
    }

    impl SetupPrompter for Answers {
        fn warn_invalid_url(&mut self, error: &GuardError) {
            self.warnings.push(error.clone());
        }

        fn confirm_quit(&mut self) -> bool {
            self.confirmations += 1;
            self.quit
        }
    }

    // ==================== Submissions ====================

    #[test]
    fn test_valid_submission_is_normalized_and_stored() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore::default();
        let mut prompter = Answers::default();

        let step = setup.handle(
            SetupInput::Submit("https://mail.example.com".to_string()),
            &mut store,
            &mut prompter,
        );

        assert_eq!(
            step,
            SetupStep::Accepted {
                url: "https://mail.example.com/webmail".to_string(),
                persisted: true,
            }
        );
        assert_eq!(setup.state(), SetupState::Accepted);
        assert!(setup.is_finished());
        assert_eq!(store.get(URL_KEY).as_deref(), Some("https://mail.example.com/webmail"));
    }

    #[test]
    fn test_invalid_submission_warns_and_reprompts() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore::default();
        let mut prompter = Answers::default();

        let step = setup.handle(
            SetupInput::Submit("example.com".to_string()),
            &mut store,
            &mut prompter,
        );

        assert_eq!(step, SetupStep::RePrompt);
        assert_eq!(setup.state(), SetupState::PromptingUrl);
        assert_eq!(prompter.warnings.len(), 1);
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_submission_is_trimmed() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore::default();
        let mut prompter = Answers::default();

        let step = setup.handle(
            SetupInput::Submit("  https://mail.example.com/  \n".to_string()),
            &mut store,
            &mut prompter,
        );

        assert!(matches!(step, SetupStep::Accepted { ref url, .. } if url == "https://mail.example.com/webmail"));
    }

    #[test]
    fn test_persist_failure_still_accepts_for_session() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore {
            fail: true,
            ..MapStore::default()
        };
        let mut prompter = Answers::default();

        let step = setup.handle(
            SetupInput::Submit("https://mail.example.com".to_string()),
            &mut store,
            &mut prompter,
        );

        assert_eq!(
            step,
            SetupStep::Accepted {
                url: "https://mail.example.com/webmail".to_string(),
                persisted: false,
            }
        );
    }

    // ==================== Cancellation ====================

    #[test]
    fn test_cancel_confirmed_quits() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore::default();
        let mut prompter = Answers {
            quit: true,
            ..Answers::default()
        };

        assert_eq!(setup.handle(SetupInput::Cancel, &mut store, &mut prompter), SetupStep::Quit);
        assert_eq!(setup.state(), SetupState::UserCancelled);
        assert!(setup.is_finished());
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_cancel_declined_returns_to_prompt() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore::default();
        let mut prompter = Answers::default();

        assert_eq!(
            setup.handle(SetupInput::Cancel, &mut store, &mut prompter),
            SetupStep::RePrompt
        );
        assert_eq!(setup.state(), SetupState::PromptingUrl);
        assert_eq!(prompter.confirmations, 1);
        assert!(!setup.is_finished());
    }

    #[test]
    fn test_input_after_finish_is_ignored() {
        let mut setup = FirstRunSetup::new();
        let mut store = MapStore::default();
        let mut prompter = Answers::default();

        setup.handle(
            SetupInput::Submit("https://mail.example.com".to_string()),
            &mut store,
            &mut prompter,
        );
        let step = setup.handle(
            SetupInput::Submit("https://other.example.com".to_string()),
            &mut store,
            &mut prompter,
        );

        assert_eq!(step, SetupStep::Ignored);
        assert_eq!(store.writes, 1);
    }
}
