//! Embedded content host for the remote chat page.
//!
//! Owns everything that touches the popup webview's content: the fixed chat
//! URL, the navigation policy that sends external links to the system
//! browser, the keydown interceptor bridge (`surface_key`), clipboard/editing
//! actions executed in-page, and the asynchronous page-URL query used by
//! "Open Current Chat in Browser". Window lifecycle lives in `popup`; the
//! key-to-action mapping lives in `keymap`.
//!
//! Right-click editing (copy, paste, select all) comes from the platform
//! webview's native context menu; nothing here installs a custom one or
//! disables the built-in one.

use std::sync::Mutex;
use std::time::Duration;

use tauri::Manager;
use tauri_plugin_opener::OpenerExt;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::keymap::{self, SurfaceAction};
use crate::popup;
use crate::zoom::{self, ZoomChange};

/// The chat page hosted in the popup.
pub const CHAT_URL: &str = "https://chat.openai.com/chat";

/// How long a page-URL query waits before giving up.
pub const PAGE_URL_TIMEOUT: Duration = Duration::from_secs(2);

// --- Navigation policy ---

/// Where a top-level navigation request should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    /// Chat-site navigation, stays in the popup.
    AllowInPlace,
    /// Anything else is handed to the system browser; no in-app window.
    OpenExternal,
}

/// Hosts allowed to load inside the popup: the chat site itself and its
/// sign-in flow.
fn is_chat_host(host: &str) -> bool {
    host == "chatgpt.com"
        || host.ends_with(".chatgpt.com")
        || host == "openai.com"
        || host.ends_with(".openai.com")
}

pub fn decide_navigation(url: &tauri::Url) -> NavDecision {
    match url.host_str() {
        Some(host) if is_chat_host(host) => NavDecision::AllowInPlace,
        _ => NavDecision::OpenExternal,
    }
}

/// Opens a URL in the system's default browser. Failures are delegated to the
/// OS shell and only logged here.
pub fn open_external<R: tauri::Runtime>(app: &tauri::AppHandle<R>, url: &str) {
    info!(url, "Opening in system browser");
    if let Err(e) = app.opener().open_url(url, None::<&str>) {
        warn!(error = %e, url, "Failed to open URL externally");
    }
}

/// Navigation hook for the popup webview. Returning false cancels the
/// navigation after the URL has been handed to the browser.
pub fn navigation_handler<R: tauri::Runtime>(
    app: tauri::AppHandle<R>,
) -> impl Fn(&tauri::Url) -> bool + Send + 'static {
    move |url| match decide_navigation(url) {
        NavDecision::AllowInPlace => true,
        NavDecision::OpenExternal => {
            open_external(&app, url.as_str());
            false
        }
    }
}

// --- Key interception bridge ---

/// Builds the script injected before the page loads: forwards
/// Ctrl/Cmd-modified keydowns for the bound keys to `surface_key` and
/// suppresses their default handling so they never reach the page as input.
/// The bound key list comes from `keymap::INTERCEPTED_KEYS`.
pub fn key_intercept_script() -> String {
    let bound = keymap::INTERCEPTED_KEYS
        .iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
(() => {{
  const bound = new Set([{bound}]);
  window.addEventListener('keydown', (e) => {{
    if (!e.ctrlKey && !e.metaKey) return;
    const key = e.key.length === 1 ? e.key.toLowerCase() : e.key;
    if (!bound.has(key)) return;
    e.preventDefault();
    e.stopPropagation();
    const internals = window.__TAURI_INTERNALS__;
    if (internals && internals.invoke) {{
      internals.invoke('surface_key', {{ ctrl: e.ctrlKey, meta: e.metaKey, key }});
    }}
  }}, true);
}})();
"#
    )
}

/// Receives intercepted keydowns from the page and runs the bound action.
#[tauri::command]
pub fn surface_key(app: tauri::AppHandle, ctrl: bool, meta: bool, key: String) {
    match keymap::map_key(ctrl, meta, &key) {
        Some(action) => run_action(&app, action),
        None => debug!(key, "Unbound surface key"),
    }
}

/// Runs a surface action against the popup webview.
pub fn run_action<R: tauri::Runtime>(app: &tauri::AppHandle<R>, action: SurfaceAction) {
    debug!(?action, "Surface action");
    match action {
        SurfaceAction::ZoomIn => zoom::apply_change(app, ZoomChange::In),
        SurfaceAction::ZoomOut => zoom::apply_change(app, ZoomChange::Out),
        SurfaceAction::ZoomReset => zoom::apply_change(app, ZoomChange::Reset),
        SurfaceAction::Copy => eval_in_page(app, "document.execCommand('copy');"),
        SurfaceAction::Paste => eval_in_page(app, "document.execCommand('paste');"),
        SurfaceAction::SelectAll => eval_in_page(app, "document.execCommand('selectAll');"),
        SurfaceAction::Undo => eval_in_page(app, "document.execCommand('undo');"),
        SurfaceAction::Redo => eval_in_page(app, "document.execCommand('redo');"),
        SurfaceAction::Quit => app.exit(0),
        SurfaceAction::Reload => popup::reload(app),
    }
}

fn eval_in_page<R: tauri::Runtime>(app: &tauri::AppHandle<R>, script: &str) {
    let Some(window) = app.get_webview_window(popup::POPUP_LABEL) else {
        warn!("Popup window not found for page script");
        return;
    };
    if let Err(e) = window.eval(script) {
        warn!(error = %e, "Failed to run page script");
    }
}

/// Clicks the chat site's new-chat affordance, falling back to navigating to
/// the chat root when the page layout offers no link.
const NEW_CHAT_SCRIPT: &str = r#"
(() => {
  const link = document.querySelector('nav a');
  if (link) { link.click(); } else { window.location.href = 'https://chat.openai.com/chat'; }
})();
"#;

/// Triggers the in-page "new chat" action.
pub fn new_chat<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    eval_in_page(app, NEW_CHAT_SCRIPT);
}

// --- Page-URL query ---

#[derive(Debug, Error)]
pub enum PageQueryError {
    #[error("popup window not found")]
    WindowMissing,
    #[error("failed to inject page script: {0}")]
    Eval(#[from] tauri::Error),
    #[error("page did not report its URL in time")]
    Timeout,
    #[error("a newer page-URL query superseded this one")]
    Superseded,
}

/// Pending page-URL query, managed in Tauri state. At most one query is in
/// flight; a new query supersedes an unanswered one.
#[derive(Default)]
pub struct PageQueryState(Mutex<Option<oneshot::Sender<String>>>);

fn begin_query(state: &PageQueryState) -> oneshot::Receiver<String> {
    let (tx, rx) = oneshot::channel();
    if let Ok(mut guard) = state.0.lock() {
        *guard = Some(tx);
    }
    rx
}

fn fulfil_query(state: &PageQueryState, url: String) -> bool {
    let sender = state.0.lock().ok().and_then(|mut guard| guard.take());
    match sender {
        Some(tx) => tx.send(url).is_ok(),
        None => false,
    }
}

async fn await_query(
    rx: oneshot::Receiver<String>,
    timeout: Duration,
) -> Result<String, PageQueryError> {
    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(url)) => Ok(url),
        Ok(Err(_)) => Err(PageQueryError::Superseded),
        Err(_) => Err(PageQueryError::Timeout),
    }
}

const REPORT_URL_SCRIPT: &str = r#"
(() => {
  const internals = window.__TAURI_INTERNALS__;
  if (internals && internals.invoke) {
    internals.invoke('report_page_url', { url: window.location.href });
  }
})();
"#;

/// Asks the page for its current URL: injects a script that reports back
/// through `report_page_url` and waits at most `PAGE_URL_TIMEOUT`. If the
/// page never answers, the caller's browser-open simply does not happen.
pub async fn current_page_url<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
) -> Result<String, PageQueryError> {
    let state = app.state::<PageQueryState>();
    let rx = begin_query(&state);

    let window = app
        .get_webview_window(popup::POPUP_LABEL)
        .ok_or(PageQueryError::WindowMissing)?;
    window.eval(REPORT_URL_SCRIPT)?;

    await_query(rx, PAGE_URL_TIMEOUT).await
}

/// Completes a pending page-URL query. Invoked by the injected script.
#[tauri::command]
pub fn report_page_url(state: tauri::State<PageQueryState>, url: String) {
    if !fulfil_query(&state, url) {
        debug!("Page URL reported with no query pending");
    }
}

/// Opens the live page URL in the system browser; on query failure the open
/// is skipped with a warning.
pub fn open_current_page_in_browser<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        match current_page_url(&app).await {
            Ok(url) => open_external(&app, &url),
            Err(e) => warn!(error = %e, "Could not resolve current page URL"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> tauri::Url {
        s.parse().expect("test url")
    }

    #[test]
    fn chat_site_stays_in_place() {
        assert_eq!(
            decide_navigation(&url("https://chat.openai.com/chat")),
            NavDecision::AllowInPlace
        );
        assert_eq!(
            decide_navigation(&url("https://chatgpt.com/c/123")),
            NavDecision::AllowInPlace
        );
        assert_eq!(
            decide_navigation(&url("https://auth.openai.com/authorize")),
            NavDecision::AllowInPlace
        );
    }

    #[test]
    fn external_urls_go_to_the_browser() {
        assert_eq!(
            decide_navigation(&url("https://example.com/x")),
            NavDecision::OpenExternal
        );
        assert_eq!(
            decide_navigation(&url("https://github.com/some/repo")),
            NavDecision::OpenExternal
        );
    }

    #[test]
    fn lookalike_hosts_are_not_chat_hosts() {
        assert_eq!(
            decide_navigation(&url("https://notopenai.com/")),
            NavDecision::OpenExternal
        );
        assert_eq!(
            decide_navigation(&url("https://openai.com.evil.example/")),
            NavDecision::OpenExternal
        );
    }

    #[test]
    fn external_navigation_is_cancelled_after_one_open() {
        // The handler contract: external URLs return false (cancel) so no
        // in-app window or in-place load ever happens for them.
        let target = url("https://example.com/x");
        assert_eq!(decide_navigation(&target), NavDecision::OpenExternal);
    }

    #[tokio::test]
    async fn page_query_resolves_when_fulfilled() {
        let state = PageQueryState::default();
        let rx = begin_query(&state);
        assert!(fulfil_query(&state, "https://chat.openai.com/c/1".into()));
        let url = await_query(rx, Duration::from_millis(100)).await.unwrap();
        assert_eq!(url, "https://chat.openai.com/c/1");
    }

    #[tokio::test]
    async fn page_query_times_out_without_answer() {
        let state = PageQueryState::default();
        let rx = begin_query(&state);
        let result = await_query(rx, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(PageQueryError::Timeout)));
    }

    #[tokio::test]
    async fn newer_query_supersedes_pending_one() {
        let state = PageQueryState::default();
        let first = begin_query(&state);
        let _second = begin_query(&state);
        let result = await_query(first, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(PageQueryError::Superseded)));
    }

    #[test]
    fn intercept_script_covers_every_bound_key() {
        let script = key_intercept_script();
        for key in crate::keymap::INTERCEPTED_KEYS {
            assert!(script.contains(&format!("'{key}'")));
        }
        assert!(script.contains("preventDefault"));
        assert!(script.contains("surface_key"));
    }

    #[test]
    fn fulfil_without_pending_query_reports_false() {
        let state = PageQueryState::default();
        assert!(!fulfil_query(&state, "https://chat.openai.com".into()));
    }
}
