//! Page-to-shell messaging.
//!
//! The webview reports link hovers, link clicks and setup-form actions by
//! posting JSON through `window.ipc.postMessage`. [`BRIDGE_SCRIPT`] is injected
//! into every page to produce them; [`parse_bridge_message`] decodes them.

use serde::Deserialize;
use thiserror::Error;

use crate::APPLICATION_NAME;

/// A message posted by injected page script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BridgeMessage {
    /// Pointer entered a link (`url` non-empty) or left one (`url` empty).
    LinkHovered {
        /// Absolute href of the hovered anchor
        url: String,
    },
    /// The user clicked a link and the page did not handle the click itself.
    LinkClicked {
        /// Absolute href of the clicked anchor
        url: String,
        /// Whether the anchor lives in the top-level document
        #[serde(default = "default_main_frame")]
        main_frame: bool,
    },
    /// The setup form was submitted.
    SetupSubmitted {
        /// Raw text from the URL field
        url: String,
    },
    /// The setup form was cancelled.
    SetupCancelled,
}

fn default_main_frame() -> bool {
    true
}

/// Errors decoding a bridge message.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Body was not a recognised JSON message.
    #[error("malformed bridge message ({len} bytes): {source}")]
    Malformed {
        /// Size of the rejected body
        len: usize,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes one IPC body.
pub fn parse_bridge_message(body: &str) -> Result<BridgeMessage, BridgeError> {
    serde_json::from_str(body).map_err(|source| BridgeError::Malformed {
        len: body.len(),
        source,
    })
}

/// Script injected into every page and every sub-frame: reports hovers and
/// unhandled link clicks.
///
/// Clicks are reported from a bubbling listener on `window`, so pages that
/// handle their own anchors (`preventDefault`) are left alone. Modified clicks
/// and `target="_blank"` anchors go through the popup path instead.
pub const BRIDGE_SCRIPT: &str = r#"(function () {
  if (window.__webmailBridge) { return; }
  window.__webmailBridge = true;

  function post(message) {
    try { window.ipc.postMessage(JSON.stringify(message)); } catch (e) {}
  }

  function anchorOf(node) {
    while (node && node !== document) {
      if ((node.tagName === "A" || node.tagName === "AREA") && node.href) { return node; }
      node = node.parentNode;
    }
    return null;
  }

  var hovered = "";
  document.addEventListener("mouseover", function (event) {
    var anchor = anchorOf(event.target);
    var url = anchor ? String(anchor.href) : "";
    if (url !== hovered) {
      hovered = url;
      post({ kind: "link-hovered", url: url });
    }
  }, true);

  window.addEventListener("click", function (event) {
    if (event.defaultPrevented || event.button !== 0) { return; }
    if (event.ctrlKey || event.metaKey || event.shiftKey || event.altKey) { return; }
    var anchor = anchorOf(event.target);
    if (!anchor) { return; }
    var target = (anchor.getAttribute("target") || "").toLowerCase();
    if (target === "_blank" || anchor.hasAttribute("download")) { return; }
    post({ kind: "link-clicked", url: String(anchor.href), main_frame: window.top === window });
  }, false);
})();"#;

/// Script run after a rejected submission to put the cursor back in the field.
pub const REFOCUS_SETUP_SCRIPT: &str =
    "(function () { var f = document.getElementById('url'); if (f) { f.focus(); f.select(); } })();";

/// Local page shown while the webmail URL is being configured.
#[must_use]
pub fn setup_page_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{APPLICATION_NAME}</title>
<style>
  body {{ margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
         font-family: -apple-system, "Segoe UI", Roboto, sans-serif; background: #f3f4f6; }}
  form {{ background: #fff; padding: 28px 32px; border-radius: 8px; box-shadow: 0 2px 12px rgba(0,0,0,.12);
         min-width: 380px; }}
  label {{ display: block; margin-bottom: 10px; color: #111827; }}
  input {{ width: 100%; box-sizing: border-box; padding: 8px; font-size: 15px; }}
  .buttons {{ margin-top: 18px; text-align: right; }}
  button {{ margin-left: 8px; padding: 6px 18px; }}
</style>
</head>
<body>
<form id="setup">
  <label for="url">Configure domain</label>
  <input id="url" name="url" type="text" autofocus placeholder="https://www.example.com">
  <div class="buttons">
    <button type="submit">OK</button>
    <button type="button" id="cancel">Cancel</button>
  </div>
</form>
<script>
  document.getElementById("setup").addEventListener("submit", function (event) {{
    event.preventDefault();
    window.ipc.postMessage(JSON.stringify({{ kind: "setup-submitted", url: document.getElementById("url").value }}));
  }});
  document.getElementById("cancel").addEventListener("click", function () {{
    window.ipc.postMessage(JSON.stringify({{ kind: "setup-cancelled" }}));
  }});
</script>
</body>
</html>"#
    )
}
