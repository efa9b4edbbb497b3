//! Integration tests for the INI settings store on disk.

use std::fs;

use tempfile::TempDir;
use webmail_shell::{IniSettings, KeyValueStore, StartupTarget, URL_KEY};

#[test]
fn test_corrupt_file_reads_absent_then_rewrite_recovers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.ini");
    fs::write(&path, "[General\nurl=https://mail.example.com/webmail\n").unwrap();

    assert!(IniSettings::load(&path).is_err(), "file should not parse");

    let mut settings = IniSettings::open(&path);
    assert_eq!(settings.get(URL_KEY), None);
    assert_eq!(StartupTarget::resolve(&settings), StartupTarget::FirstRun);

    settings
        .set(URL_KEY, "https://mail.example.com/webmail")
        .unwrap();

    assert!(IniSettings::load(&path).unwrap().is_some());
    let reopened = IniSettings::open(&path);
    assert_eq!(
        reopened.get(URL_KEY).as_deref(),
        Some("https://mail.example.com/webmail")
    );
}

#[test]
fn test_file_written_by_older_install_is_honoured() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.ini");
    fs::write(&path, "[General]\nurl=https://mail.example.com/webmail\n").unwrap();

    let settings = IniSettings::open(&path);

    assert_eq!(
        StartupTarget::resolve(&settings),
        StartupTarget::Load("https://mail.example.com/webmail".to_string())
    );
}

#[test]
fn test_stored_url_is_written_without_section() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.ini");

    let mut settings = IniSettings::open(&path);
    settings
        .set(URL_KEY, "https://mail.example.com/webmail")
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(
        content.contains("url=https://mail.example.com/webmail"),
        "unexpected file content: {content}"
    );
    assert!(!content.contains('['), "no section header expected: {content}");
}
