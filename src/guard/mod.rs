//! Domain guard: decides what may render inside the application.
//!
//! Two concerns live here:
//!
//! - [`syntax`](validate_url_syntax) checks and normalizes the address the user
//!   types during first-run setup;
//! - [`policy`](decide_navigation) keeps the single window on the configured
//!   host by diverting clicked external links and popups to the OS handler.
//!
//! # Example
//!
//! ```
//! use webmail_shell::guard::{NavigationDecision, NavigationRequest, decide_navigation};
//!
//! let configured = "https://mail.example.com/webmail";
//! let click = NavigationRequest::link_click("https://example.org/", true);
//! assert_eq!(decide_navigation(&click, configured), NavigationDecision::Divert);
//! ```

mod error;
mod policy;
mod syntax;

pub use error::{GuardError, URL_EXAMPLE};
pub use policy::{
    EXTERNAL_SCHEMES, NavigationDecision, NavigationRequest, PopupDecision, decide_navigation,
    decide_popup, is_external_scheme, is_same_host,
};
pub use syntax::{WEBMAIL_SEGMENT, check_url_syntax, normalize_first_run_url, validate_url_syntax};
