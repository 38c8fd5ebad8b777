//! Startup telemetry ping.
//!
//! One fire-and-forget POST when the app starts, carrying the fixed project
//! id, app version, platform, and a best-effort OS machine id. The service is
//! an opaque collaborator: failures are logged at debug and never affect the
//! app. URL override via CHATBAR_TELEMETRY_URL is for development.

use serde::Serialize;
use tracing::debug;

use crate::machine_id;

/// Fixed project identifier for the telemetry service.
const TELEMETRY_PROJECT_ID: &str = "638d9ccf4a5ed2dae43ce122";

const TELEMETRY_BASE_URL: &str = "https://app.nucleus.sh";

#[derive(Debug, Serialize)]
struct InitEvent<'a> {
    project: &'a str,
    event: &'a str,
    version: &'a str,
    platform: &'a str,
    machine_id: Option<String>,
}

/// Sends the startup event on the async runtime. Never blocks startup.
pub fn send_init_ping(app_version: String) {
    tauri::async_runtime::spawn(async move {
        let base = std::env::var("CHATBAR_TELEMETRY_URL")
            .unwrap_or_else(|_| TELEMETRY_BASE_URL.to_string());
        let url = format!("{}/app/{}/track", base.trim_end_matches('/'), TELEMETRY_PROJECT_ID);

        let event = InitEvent {
            project: TELEMETRY_PROJECT_ID,
            event: "init",
            version: &app_version,
            platform: std::env::consts::OS,
            machine_id: machine_id::get_machine_id(),
        };

        let client = match reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                debug!(error = %e, "Telemetry: HTTP client build failed");
                return;
            }
        };

        match client.post(&url).json(&event).send().await {
            Ok(resp) => debug!(status = %resp.status(), "Telemetry init ping sent"),
            Err(e) => debug!(error = %e, "Telemetry init ping failed"),
        }
    });
}
