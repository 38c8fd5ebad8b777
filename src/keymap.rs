//! Raw keystroke mapping for the embedded chat page.
//!
//! The native application menu cannot route its accelerators into the
//! embedded webview, so an initialization script forwards Ctrl/Cmd-modified
//! keydown events to the `surface_key` command before the page sees them.
//! This module is the pure half: it maps a forwarded key to a `SurfaceAction`
//! and says which keys the script must preventDefault. Execution lives in
//! `surface`.

/// Action triggered by an intercepted modifier+key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Copy,
    Paste,
    SelectAll,
    Undo,
    Redo,
    Quit,
    Reload,
}

/// Maps a keydown forwarded from the page to an action. `key` is the DOM
/// `KeyboardEvent.key` value. Returns `None` when no platform modifier is
/// held or the key is not bound.
pub fn map_key(ctrl: bool, meta: bool, key: &str) -> Option<SurfaceAction> {
    if !ctrl && !meta {
        return None;
    }

    match key {
        "=" | "+" => Some(SurfaceAction::ZoomIn),
        "-" => Some(SurfaceAction::ZoomOut),
        "0" => Some(SurfaceAction::ZoomReset),
        "c" => Some(SurfaceAction::Copy),
        "v" => Some(SurfaceAction::Paste),
        "a" => Some(SurfaceAction::SelectAll),
        "z" => Some(SurfaceAction::Undo),
        "y" => Some(SurfaceAction::Redo),
        "q" => Some(SurfaceAction::Quit),
        "r" => Some(SurfaceAction::Reload),
        _ => None,
    }
}

/// Keys the interceptor script suppresses so they never reach the page as
/// literal input. Must stay in sync with `map_key`.
pub const INTERCEPTED_KEYS: &[&str] = &["=", "+", "-", "0", "c", "v", "a", "z", "y", "q", "r"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_c_is_copy() {
        assert_eq!(map_key(false, true, "c"), Some(SurfaceAction::Copy));
        assert_eq!(map_key(true, false, "c"), Some(SurfaceAction::Copy));
    }

    #[test]
    fn unmodified_keys_pass_through() {
        assert_eq!(map_key(false, false, "c"), None);
        assert_eq!(map_key(false, false, "="), None);
    }

    #[test]
    fn zoom_keys_map_to_zoom_actions() {
        assert_eq!(map_key(false, true, "="), Some(SurfaceAction::ZoomIn));
        assert_eq!(map_key(false, true, "+"), Some(SurfaceAction::ZoomIn));
        assert_eq!(map_key(false, true, "-"), Some(SurfaceAction::ZoomOut));
        assert_eq!(map_key(false, true, "0"), Some(SurfaceAction::ZoomReset));
    }

    #[test]
    fn unbound_modifier_keys_pass_through() {
        assert_eq!(map_key(false, true, "x"), None);
        assert_eq!(map_key(true, false, "F5"), None);
    }

    #[test]
    fn every_mapped_key_is_intercepted() {
        for key in INTERCEPTED_KEYS {
            assert!(
                map_key(false, true, key).is_some(),
                "{key} listed but unmapped"
            );
        }
        // And nothing mapped is missing from the suppression list.
        for key in ["=", "+", "-", "0", "c", "v", "a", "z", "y", "q", "r"] {
            assert!(INTERCEPTED_KEYS.contains(&key));
        }
    }
}
