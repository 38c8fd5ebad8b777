//! Startup auto-update check.
//!
//! Asks the updater plugin for a newer release once at startup and installs
//! it in the background when found. The update service is an opaque
//! collaborator: every failure path is logged and otherwise ignored.

use tauri_plugin_updater::UpdaterExt;
use tracing::{info, warn};

/// Spawns the update check on the async runtime. Never blocks startup.
pub fn check_for_updates(app: tauri::AppHandle) {
    tauri::async_runtime::spawn(async move {
        let updater = match app.updater() {
            Ok(updater) => updater,
            Err(e) => {
                warn!(error = %e, "Updater unavailable");
                return;
            }
        };

        let update = match updater.check().await {
            Ok(Some(update)) => update,
            Ok(None) => {
                info!("No update available");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Update check failed");
                return;
            }
        };

        info!(version = %update.version, "Update found, downloading");
        let result = update
            .download_and_install(
                |_chunk, _total| {},
                || info!("Update downloaded, installing"),
            )
            .await;
        if let Err(e) = result {
            warn!(error = %e, "Update install failed");
        }
    });
}
