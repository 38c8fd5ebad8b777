//! Global keyboard shortcut registration and handling.
//!
//! Reads hotkey config (enabled, modifiers, key), builds the toggle shortcut
//! (Ctrl+Cmd+C on macOS, Ctrl+Alt+C elsewhere by default), and registers it
//! with the Tauri global shortcut plugin for the process lifetime. On Wayland
//! native global hotkeys are not supported, so registration is skipped with a
//! log line. The registered shortcut is kept in Tauri state so the plugin
//! handler can match incoming events against it.

use std::sync::{Arc, Mutex};

use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Modifiers, Shortcut, ShortcutState};
use tracing::{info, warn};

use crate::config;
use crate::popup;

/// The shortcut registered to toggle the popup, if any.
pub type ToggleHotkeyState = Arc<Mutex<Option<Shortcut>>>;

fn parse_modifier_token(token: &str) -> Option<Modifiers> {
    match token {
        "control" | "ctrl" => Some(Modifiers::CONTROL),
        "shift" => Some(Modifiers::SHIFT),
        "alt" | "option" => Some(Modifiers::ALT),
        "command" | "cmd" | "super" | "meta" => Some(Modifiers::SUPER),
        _ => None,
    }
}

fn parse_modifiers(raw: &str) -> Result<Option<Modifiers>, String> {
    let mut modifiers = Modifiers::empty();
    for token in raw
        .split(|c: char| c == '+' || c == ',' || c.is_whitespace())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
    {
        let parsed = parse_modifier_token(&token)
            .ok_or_else(|| format!("Unsupported modifier token: {token}"))?;
        modifiers |= parsed;
    }

    if modifiers.is_empty() {
        Ok(None)
    } else {
        Ok(Some(modifiers))
    }
}

fn parse_key_code(raw: &str) -> Result<Code, String> {
    let normalized = raw.trim().to_uppercase();
    let mut chars = normalized.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(format!("Unsupported hotkey key: {raw}"));
    };
    match c {
        'A' => Ok(Code::KeyA),
        'B' => Ok(Code::KeyB),
        'C' => Ok(Code::KeyC),
        'D' => Ok(Code::KeyD),
        'E' => Ok(Code::KeyE),
        'F' => Ok(Code::KeyF),
        'G' => Ok(Code::KeyG),
        'H' => Ok(Code::KeyH),
        'I' => Ok(Code::KeyI),
        'J' => Ok(Code::KeyJ),
        'K' => Ok(Code::KeyK),
        'L' => Ok(Code::KeyL),
        'M' => Ok(Code::KeyM),
        'N' => Ok(Code::KeyN),
        'O' => Ok(Code::KeyO),
        'P' => Ok(Code::KeyP),
        'Q' => Ok(Code::KeyQ),
        'R' => Ok(Code::KeyR),
        'S' => Ok(Code::KeyS),
        'T' => Ok(Code::KeyT),
        'U' => Ok(Code::KeyU),
        'V' => Ok(Code::KeyV),
        'W' => Ok(Code::KeyW),
        'X' => Ok(Code::KeyX),
        'Y' => Ok(Code::KeyY),
        'Z' => Ok(Code::KeyZ),
        '0' => Ok(Code::Digit0),
        '1' => Ok(Code::Digit1),
        '2' => Ok(Code::Digit2),
        '3' => Ok(Code::Digit3),
        '4' => Ok(Code::Digit4),
        '5' => Ok(Code::Digit5),
        '6' => Ok(Code::Digit6),
        '7' => Ok(Code::Digit7),
        '8' => Ok(Code::Digit8),
        '9' => Ok(Code::Digit9),
        _ => Err(format!("Unsupported hotkey key: {raw}")),
    }
}

fn build_shortcut(modifiers: &str, key: &str) -> Result<Shortcut, String> {
    let mods = parse_modifiers(modifiers)?;
    let code = parse_key_code(key)?;
    Ok(Shortcut::new(mods, code))
}

/// Human-readable shortcut label for logs, e.g. "Ctrl+Cmd+C".
fn shortcut_label(modifiers: &str, key: &str) -> String {
    let mod_label = modifiers
        .split(|c: char| c == '+' || c == ',' || c.is_whitespace())
        .filter_map(|token| {
            let normalized = token.trim().to_lowercase();
            if normalized.is_empty() {
                return None;
            }
            let label = match normalized.as_str() {
                "control" | "ctrl" => "Ctrl",
                "shift" => "Shift",
                "alt" | "option" => "Alt",
                "command" | "cmd" => "Cmd",
                "super" | "meta" => "Super",
                _ => token.trim(),
            };
            Some(label.to_string())
        })
        .collect::<Vec<_>>()
        .join("+");
    let upper_key = key.trim().to_uppercase();
    if mod_label.is_empty() {
        upper_key
    } else {
        format!("{mod_label}+{upper_key}")
    }
}

fn is_wayland_session() -> bool {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_SESSION_TYPE")
            .map(|s| s.to_lowercase() == "wayland")
            .unwrap_or(false)
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

/// Registers the toggle shortcut from config. Called once from setup; the
/// shortcut stays registered until the process exits.
pub fn register_toggle_hotkey<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    state: &ToggleHotkeyState,
) {
    let cfg = config::load_hotkey_config();
    let label = shortcut_label(&cfg.modifiers, &cfg.key);

    if !cfg.enabled {
        info!("Global hotkey disabled in config");
        return;
    }
    if is_wayland_session() {
        info!("Wayland session: native global hotkeys unavailable, skipping registration");
        return;
    }

    let shortcut = match build_shortcut(&cfg.modifiers, &cfg.key) {
        Ok(shortcut) => shortcut,
        Err(e) => {
            warn!(error = %e, "Failed to build toggle shortcut");
            return;
        }
    };

    if let Err(e) = app.global_shortcut().register(shortcut) {
        warn!(error = %e, shortcut = %label, "Failed to register toggle shortcut");
        return;
    }

    if let Ok(mut guard) = state.lock() {
        *guard = Some(shortcut);
    }
    info!(shortcut = %label, "Global toggle hotkey registered");
}

/// Called by the global shortcut plugin on key events. Toggles the popup when
/// the registered toggle shortcut is pressed.
pub fn handle_global_shortcut_event<R: tauri::Runtime>(
    app: &tauri::AppHandle<R>,
    shortcut: &Shortcut,
    event_state: ShortcutState,
    hotkey_state: &ToggleHotkeyState,
) {
    if event_state != ShortcutState::Pressed {
        return;
    }

    let is_toggle = hotkey_state
        .lock()
        .map(|guard| guard.as_ref() == Some(shortcut))
        .unwrap_or(false);

    if is_toggle {
        popup::toggle(app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_macos_modifiers() {
        let mods = parse_modifiers("control+command").unwrap().unwrap();
        assert!(mods.contains(Modifiers::CONTROL));
        assert!(mods.contains(Modifiers::SUPER));
        assert!(!mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn rejects_unknown_modifier() {
        assert!(parse_modifiers("hyper").is_err());
    }

    #[test]
    fn empty_modifiers_mean_none() {
        assert_eq!(parse_modifiers("").unwrap(), None);
    }

    #[test]
    fn parses_letter_and_digit_keys() {
        assert_eq!(parse_key_code("c").unwrap(), Code::KeyC);
        assert_eq!(parse_key_code("0").unwrap(), Code::Digit0);
        assert!(parse_key_code("F5").is_err());
        assert!(parse_key_code("").is_err());
    }

    #[test]
    fn label_formats_default_hotkey() {
        assert_eq!(shortcut_label("control+command", "c"), "Ctrl+Cmd+C");
        assert_eq!(shortcut_label("control+alt", "c"), "Ctrl+Alt+C");
        assert_eq!(shortcut_label("", "c"), "C");
    }

    #[test]
    fn builds_shortcut_from_default_config() {
        let cfg = config::HotkeyConfig::default();
        assert!(build_shortcut(&cfg.modifiers, &cfg.key).is_ok());
    }
}
