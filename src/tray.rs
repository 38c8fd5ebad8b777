//! System tray icon: the app's only always-visible affordance.
//!
//! Creates the single tray icon at startup with the context menu from
//! `menu::TRAY_MENU`. Left click toggles the popup (same path as the global
//! hotkey); right click shows the menu. Tray events are forwarded to the
//! positioner plugin so the popup can anchor under the icon.

use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tracing::{debug, info};

use crate::menu;
use crate::popup;

/// Tray icon id.
pub const TRAY_ICON_ID: &str = "main";

/// Tray icon: template logo at 32x32 (icons/trayTemplate.png). Template mode
/// lets macOS tint it for light/dark menu bars.
pub const TRAY_ICON_PNG: &[u8] = include_bytes!("../icons/trayTemplate.png");

/// Builds the tray icon with its context menu. Called once from setup.
pub fn setup_tray<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> Result<(), tauri::Error> {
    let context_menu = menu::build_menu(app, menu::TRAY_MENU)?;

    let _tray = TrayIconBuilder::with_id(TRAY_ICON_ID)
        .tooltip("ChatBar")
        .icon(tauri::image::Image::from_bytes(TRAY_ICON_PNG)?)
        .icon_as_template(true)
        .menu(&context_menu)
        .show_menu_on_left_click(false)
        // Menu clicks are handled by the app-level menu event listener.
        .on_tray_icon_event(|tray, event| {
            // The positioner plugin tracks the icon rect from these events.
            tauri_plugin_positioner::on_tray_event(tray.app_handle(), &event);

            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                debug!("Tray icon clicked");
                popup::toggle(tray.app_handle());
            }
        })
        .build(app)?;

    info!("Tray icon created");
    Ok(())
}
