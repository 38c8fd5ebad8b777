//! ChatBar: a tray-resident shell around a remote chat page.
//!
//! Wires the pieces together: logging, plugins, managed state, the tray
//! icon, the popup webview, the application menu, the global toggle hotkey,
//! and the startup update check and telemetry ping. All behavior lives in
//! the per-concern modules; this file only owns startup order and the
//! process exit policy.

mod config;
mod hotkeys;
mod keymap;
mod machine_id;
#[cfg(target_os = "macos")]
mod macos_app;
mod menu;
mod popup;
mod surface;
mod telemetry;
mod tray;
mod updater;
mod zoom;

use std::sync::{Arc, Mutex};

use tauri::Manager;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit requests with no code come from the last window closing. Only the
/// primary (tray-resident) platform survives those; explicit quits always
/// exit.
fn should_prevent_exit(tray_resident: bool, exit_code: Option<i32>) -> bool {
    tray_resident && exit_code.is_none()
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let default_level = config::load_log_level().as_str().to_lowercase();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let hotkey_state: hotkeys::ToggleHotkeyState = Arc::new(Mutex::new(None));
    let hotkey_state_for_handler = hotkey_state.clone();

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_positioner::init())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(move |app, shortcut, event| {
                    hotkeys::handle_global_shortcut_event(
                        app,
                        shortcut,
                        event.state(),
                        &hotkey_state_for_handler,
                    );
                })
                .build(),
        )
        .manage(zoom::ZoomState::default())
        .manage(surface::PageQueryState::default())
        .invoke_handler(tauri::generate_handler![
            surface::surface_key,
            surface::report_page_url,
        ])
        .setup(move |app| {
            // Tray-resident: no Dock icon on macOS.
            #[cfg(target_os = "macos")]
            app.set_activation_policy(tauri::ActivationPolicy::Accessory);

            let handle = app.handle();

            tray::setup_tray(handle)?;
            popup::create_popup_window(handle)?;

            let app_menu = menu::build_app_menu(handle)?;
            app.set_menu(app_menu)?;
            app.on_menu_event(|app, event| menu::handle_menu_event(app, event));

            hotkeys::register_toggle_hotkey(handle, &hotkey_state);

            updater::check_for_updates(handle.clone());
            telemetry::send_init_ping(app.package_info().version.to_string());

            info!("ChatBar ready");
            Ok(())
        })
        .build(tauri::generate_context!());

    match result {
        Ok(app) => app.run(|_app, event| {
            if let tauri::RunEvent::ExitRequested { code, api, .. } = event {
                if should_prevent_exit(cfg!(target_os = "macos"), code) {
                    api.prevent_exit();
                }
            }
        }),
        Err(e) => {
            error!(error = %e, "Error while running Tauri application");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::should_prevent_exit;

    #[test]
    fn tray_resident_platform_survives_window_close() {
        assert!(should_prevent_exit(true, None));
    }

    #[test]
    fn other_platforms_exit_when_last_window_closes() {
        assert!(!should_prevent_exit(false, None));
    }

    #[test]
    fn explicit_quit_always_exits() {
        assert!(!should_prevent_exit(true, Some(0)));
        assert!(!should_prevent_exit(false, Some(0)));
    }
}
