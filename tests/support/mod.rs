//! Shared fakes for integration tests: an in-memory settings store and a
//! scripted setup prompter.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use webmail_shell::{GuardError, KeyValueStore, SettingsError, SetupPrompter};

/// In-memory store that counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct CountingStore {
    values: HashMap<String, String>,
    pub writes: usize,
    pub fail_writes: bool,
}

impl CountingStore {
    pub fn with_url(url: &str) -> Self {
        let mut store = Self::default();
        store.values.insert("url".to_string(), url.to_string());
        store
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.writes += 1;
        if self.fail_writes {
            return Err(SettingsError::Write {
                path: PathBuf::from("settings.ini"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Prompter answering quit confirmations from a script and recording warnings.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    quit_answers: VecDeque<bool>,
    pub warnings: Vec<String>,
    pub quit_questions: usize,
}

impl ScriptedPrompter {
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            quit_answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl SetupPrompter for ScriptedPrompter {
    fn warn_invalid_url(&mut self, error: &GuardError) {
        self.warnings.push(error.user_message());
    }

    fn confirm_quit(&mut self) -> bool {
        self.quit_questions += 1;
        self.quit_answers.pop_front().unwrap_or(false)
    }
}
