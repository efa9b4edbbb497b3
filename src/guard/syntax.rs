//! URL syntax validation and first-run normalization.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::error::GuardError;

/// Path segment every configured URL must point at.
pub const WEBMAIL_SEGMENT: &str = "webmail";

/// Accepted shape for a webmail address typed during setup.
///
/// `scheme://[www.]host.tld[path]` with scheme http or https, 2..=256 host
/// characters and a 2..=6 letter TLD followed by a word boundary. The match is
/// case-insensitive and must cover the whole candidate.
#[allow(clippy::expect_used)]
static URL_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:http|https)://)(?:www.)?[a-z0-9@:%._+~#?&/=]{2,256}\.[a-z]{2,6}\b(?:[-a-z0-9@:%._+~#?&/=]*)$",
    )
    .expect("URL syntax regex is valid") // Static pattern, safe to panic
});

/// Returns `true` when `candidate` is a syntactically acceptable webmail address.
///
/// Empty strings, missing or non-web schemes, malformed TLDs and embedded
/// whitespace are all rejected.
///
/// # Examples
///
/// ```
/// use webmail_shell::guard::validate_url_syntax;
///
/// assert!(validate_url_syntax("https://mail.example.com"));
/// assert!(!validate_url_syntax("ftp://mail.example.com"));
/// assert!(!validate_url_syntax("example.com"));
/// ```
#[must_use]
pub fn validate_url_syntax(candidate: &str) -> bool {
    let valid = URL_SYNTAX.is_match(candidate);
    trace!(candidate, valid, "checked URL syntax");
    valid
}

/// Validates `candidate`, returning a descriptive error on rejection.
pub fn check_url_syntax(candidate: &str) -> Result<(), GuardError> {
    if candidate.is_empty() {
        return Err(GuardError::empty());
    }
    if validate_url_syntax(candidate) {
        Ok(())
    } else {
        debug!(candidate, "URL rejected by syntax check");
        Err(GuardError::syntax(candidate))
    }
}

/// Points a freshly entered address at the webmail path.
///
/// Candidates already containing `webmail` are returned unchanged, so the
/// function is idempotent. Otherwise `webmail` is appended with exactly one
/// slash between it and what precedes it.
///
/// # Examples
///
/// ```
/// use webmail_shell::guard::normalize_first_run_url;
///
/// assert_eq!(
///     normalize_first_run_url("https://mail.example.com/"),
///     "https://mail.example.com/webmail"
/// );
/// ```
#[must_use]
pub fn normalize_first_run_url(candidate: &str) -> String {
    if candidate.contains(WEBMAIL_SEGMENT) {
        return candidate.to_string();
    }
    if candidate.ends_with('/') {
        format!("{candidate}{WEBMAIL_SEGMENT}")
    } else {
        format!("{candidate}/{WEBMAIL_SEGMENT}")
    }
}
