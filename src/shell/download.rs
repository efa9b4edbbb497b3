//! Download destination resolution.
//!
//! The engine asks where to save every download; the shell lets the user pick
//! a folder and saves the file there under its suggested name.

use std::path::{Component, Path, PathBuf};

use tracing::debug;
use url::Url;

/// Name used when neither the engine nor the URL suggests one.
pub const FALLBACK_FILENAME: &str = "download";

/// Title of the folder picker.
pub const CHOOSE_FOLDER_TITLE: &str = "Choose where to save";

/// Picks the file name a download should be saved under.
///
/// Priority:
/// 1. the file name the engine already put in its proposed destination
/// 2. the last path segment of the download URL, percent-decoded
/// 3. [`FALLBACK_FILENAME`]
///
/// The result is always sanitized into a single safe path segment.
#[must_use]
pub fn suggested_filename(download_url: &str, engine_proposal: &Path) -> String {
    let from_engine = engine_proposal
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let raw = from_engine
        .or_else(|| filename_from_url(download_url))
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

    let name = sanitize_filename(&raw);
    debug!(url = download_url, filename = %name, "resolved suggested filename");
    name
}

/// Joins the chosen folder with the suggested filename.
#[must_use]
pub fn download_destination(folder: &Path, suggested: &str) -> PathBuf {
    folder.join(sanitize_filename(suggested))
}

fn filename_from_url(download_url: &str) -> Option<String> {
    let parsed = Url::parse(download_url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last)
        .map_or_else(|_| last.to_string(), std::borrow::Cow::into_owned);
    Some(decoded)
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |`) and control characters, and rewrites `.`/`..` so the
/// name can never leave the folder it is joined to.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_proposal_wins() {
        let name = suggested_filename(
            "https://mail.example.com/webmail/?_action=get&_uid=4",
            Path::new("/home/user/Downloads/invoice.pdf"),
        );
        assert_eq!(name, "invoice.pdf");
    }

    #[test]
    fn test_falls_back_to_url_segment() {
        let name = suggested_filename(
            "https://mail.example.com/files/report%20Q1.xlsx",
            Path::new(""),
        );
        assert_eq!(name, "report Q1.xlsx");
    }

    #[test]
    fn test_falls_back_to_default_name() {
        assert_eq!(
            suggested_filename("https://mail.example.com/", Path::new("")),
            FALLBACK_FILENAME
        );
        assert_eq!(suggested_filename("blob:opaque", Path::new("")), FALLBACK_FILENAME);
    }

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file/name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file\\name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file:name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file<name>.pdf"), "file_name_.pdf");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_sanitize_filename_blank_gets_fallback() {
        assert_eq!(sanitize_filename("   "), FALLBACK_FILENAME);
    }

    #[test]
    fn test_destination_stays_inside_folder() {
        let folder = Path::new("/home/user/Downloads");
        for hostile in ["../../etc/passwd", "..", "/etc/shadow", "a\\..\\b"] {
            let dest = download_destination(folder, hostile);
            assert_eq!(dest.parent(), Some(folder), "escaped via {hostile}");
        }
    }

    #[test]
    fn test_destination_joins_folder_and_name() {
        let dest = download_destination(Path::new("/tmp/out"), "photo.png");
        assert_eq!(dest, PathBuf::from("/tmp/out/photo.png"));
    }
}
