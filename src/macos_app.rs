//! macOS application-level focus helpers.
//!
//! The popup is a transient surface: hiding it should give focus back to
//! whatever app was active before, and showing it should bring us forward.
//! Tauri has no API for either, so we talk to NSApplication directly.

use objc::msg_send;
use objc::runtime::{Class, Object, BOOL, YES};

/// Hides the application (`[NSApp hide:]`); macOS restores focus to the
/// previously active app. Call after hiding the popup.
pub fn hide_application() {
    unsafe {
        let Some(ns_app_class) = Class::get("NSApplication") else {
            tracing::warn!("NSApplication class not found");
            return;
        };
        let ns_app: *mut Object = msg_send![ns_app_class, sharedApplication];
        let nil: *mut Object = std::ptr::null_mut();
        let _: () = msg_send![ns_app, hide: nil];
    }
}

/// Activates the application so the popup comes to the foreground even when
/// another app currently has focus. Call after showing the popup.
pub fn activate_application() {
    unsafe {
        let Some(ns_app_class) = Class::get("NSApplication") else {
            tracing::warn!("NSApplication class not found");
            return;
        };
        let ns_app: *mut Object = msg_send![ns_app_class, sharedApplication];
        let flag: BOOL = YES;
        let _: () = msg_send![ns_app, activateIgnoringOtherApps: flag];
    }
}
