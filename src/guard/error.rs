//! Error types for the domain guard.

use thiserror::Error;

/// Example shown to the user after a rejected submission.
pub const URL_EXAMPLE: &str = "https://www.example.com";

/// Errors raised while checking a candidate webmail URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// Candidate does not match the accepted `scheme://[www.]host.tld[/path]` shape.
    #[error("invalid URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrlSyntax {
        /// The rejected candidate, as submitted
        url: String,
        /// Why the candidate was rejected
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },
}

impl GuardError {
    /// Creates an `InvalidUrlSyntax` error for an empty submission.
    #[must_use]
    pub fn empty() -> Self {
        Self::InvalidUrlSyntax {
            url: String::new(),
            reason: "no URL was entered".to_string(),
            suggestion: format!("Type the webmail address, e.g. {URL_EXAMPLE}"),
        }
    }

    /// Creates an `InvalidUrlSyntax` error for a candidate that failed the pattern.
    #[must_use]
    pub fn syntax(url: &str) -> Self {
        let reason = if url.contains(char::is_whitespace) {
            "URL contains whitespace".to_string()
        } else if !url.contains("://") {
            "URL has no http:// or https:// scheme".to_string()
        } else {
            "URL does not look like scheme://host.tld[/path]".to_string()
        };
        Self::InvalidUrlSyntax {
            url: url.to_string(),
            reason,
            suggestion: format!("Enter a full address such as {URL_EXAMPLE}"),
        }
    }

    /// Message shown in the blocking warning dialog.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrlSyntax { .. } => {
                format!("Please enter a valid URL!\nEx: {URL_EXAMPLE}")
            }
        }
    }
}
