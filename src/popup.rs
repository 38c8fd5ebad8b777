//! Popup window lifecycle: create, show, hide, toggle, reload.
//!
//! The popup is a single borderless always-on-top window created hidden at
//! startup and never recreated. Showing anchors it under the tray icon via
//! the positioner plugin and brings the app to the foreground on macOS;
//! hiding on macOS also hides the application so OS focus returns to
//! whatever was active before. Excluded from the taskbar/Dock everywhere so
//! it behaves as a transient utility surface.

use tauri::{Manager, WebviewUrl, WebviewWindowBuilder};
use tauri_plugin_positioner::{Position, WindowExt};
use tracing::{debug, info, warn};

use crate::surface;

#[cfg(target_os = "macos")]
use crate::macos_app;

/// Label of the popup webview window.
pub const POPUP_LABEL: &str = "popup";

/// Popup size in logical pixels.
const POPUP_WIDTH: f64 = 450.0;
const POPUP_HEIGHT: f64 = 550.0;

/// What a visibility toggle should do given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    Show,
    Hide,
}

pub fn toggle_decision(currently_visible: bool) -> VisibilityChange {
    if currently_visible {
        VisibilityChange::Hide
    } else {
        VisibilityChange::Show
    }
}

/// Creates the popup window pointed at the chat site, hidden. Called once
/// from setup.
pub fn create_popup_window<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url: tauri::Url = surface::CHAT_URL.parse()?;

    let window = WebviewWindowBuilder::new(app, POPUP_LABEL, WebviewUrl::External(url))
        .title("ChatBar")
        .inner_size(POPUP_WIDTH, POPUP_HEIGHT)
        .resizable(false)
        .visible(false)
        .decorations(false)
        .always_on_top(true)
        .skip_taskbar(true)
        .accept_first_mouse(true)
        .initialization_script(&surface::key_intercept_script())
        .on_navigation(surface::navigation_handler(app.clone()))
        .build()?;

    debug!(label = window.label(), "Popup window created");
    Ok(())
}

/// Shows the popup anchored under the tray icon and focuses it.
pub fn show<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let Some(window) = app.get_webview_window(POPUP_LABEL) else {
        warn!("Popup window not found");
        return;
    };

    // Anchor under the tray icon; the positioner needs the plain window.
    if let Err(e) = window.as_ref().window().move_window(Position::TrayBottomCenter) {
        debug!(error = %e, "TrayBottomCenter failed, trying TrayCenter");
        if let Err(e2) = window.as_ref().window().move_window(Position::TrayCenter) {
            warn!(error = %e2, "Failed to position popup at tray");
        }
    }

    if let Err(e) = window.show() {
        warn!(error = %e, "Failed to show popup");
        return;
    }
    if let Err(e) = window.set_focus() {
        warn!(error = %e, "Failed to focus popup");
    }

    #[cfg(target_os = "macos")]
    macos_app::activate_application();

    info!("Popup shown");
}

/// Hides the popup. On macOS also hides the application so focus returns to
/// the previously active app.
pub fn hide<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let Some(window) = app.get_webview_window(POPUP_LABEL) else {
        warn!("Popup window not found");
        return;
    };

    if let Err(e) = window.hide() {
        warn!(error = %e, "Failed to hide popup");
        return;
    }

    #[cfg(target_os = "macos")]
    macos_app::hide_application();

    info!("Popup hidden");
}

/// Toggles popup visibility. Shared by the global hotkey and tray click.
pub fn toggle<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let visible = app
        .get_webview_window(POPUP_LABEL)
        .and_then(|w| w.is_visible().ok())
        .unwrap_or(false);

    match toggle_decision(visible) {
        VisibilityChange::Show => show(app),
        VisibilityChange::Hide => hide(app),
    }
}

/// Reloads the embedded chat page.
pub fn reload<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    let Some(window) = app.get_webview_window(POPUP_LABEL) else {
        warn!("Popup window not found");
        return;
    };
    if let Err(e) = window.reload() {
        warn!(error = %e, "Failed to reload popup");
    }
}
