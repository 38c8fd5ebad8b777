//! Zoom factor state and step math for the embedded chat page.
//!
//! The webview cannot receive the native menu accelerators, so zoom is driven
//! from the key interceptor and the tray menu. The factor lives in Tauri
//! managed state (`ZoomState`) and is applied with `WebviewWindow::set_zoom`.
//! Not persisted across restarts.

use std::sync::Mutex;

use tauri::Manager;
use tracing::warn;

use crate::popup;

/// Per-step zoom change.
pub const ZOOM_STEP: f64 = 0.1;
/// Smallest factor zoom-out can reach.
pub const ZOOM_MIN: f64 = 0.3;
/// Factor restored by zoom reset.
pub const ZOOM_DEFAULT: f64 = 1.0;

/// Current zoom factor, managed in Tauri state.
pub struct ZoomState(Mutex<f64>);

impl Default for ZoomState {
    fn default() -> Self {
        Self(Mutex::new(ZOOM_DEFAULT))
    }
}

// Steps round to one decimal so repeated zoom-out lands exactly on ZOOM_MIN
// instead of drifting through float residue.
fn round_step(factor: f64) -> f64 {
    (factor * 10.0).round() / 10.0
}

/// One zoom-in step from `factor`.
pub fn stepped_in(factor: f64) -> f64 {
    round_step(factor + ZOOM_STEP)
}

/// One zoom-out step from `factor`, clamped to `ZOOM_MIN`.
pub fn stepped_out(factor: f64) -> f64 {
    round_step(factor - ZOOM_STEP).max(ZOOM_MIN)
}

/// Requested zoom change, from the key interceptor or the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomChange {
    In,
    Out,
    Reset,
}

/// Applies a zoom change to the managed factor and the popup webview.
/// Missing state or webview degrades to a warning; the factor is unchanged.
pub fn apply_change<R: tauri::Runtime>(app: &tauri::AppHandle<R>, change: ZoomChange) {
    let Some(state) = app.try_state::<ZoomState>() else {
        warn!("Zoom: state not managed");
        return;
    };

    let factor = {
        let Ok(mut guard) = state.0.lock() else {
            warn!("Zoom: state lock poisoned");
            return;
        };
        *guard = match change {
            ZoomChange::In => stepped_in(*guard),
            ZoomChange::Out => stepped_out(*guard),
            ZoomChange::Reset => ZOOM_DEFAULT,
        };
        *guard
    };

    let Some(win) = app.get_webview_window(popup::POPUP_LABEL) else {
        warn!("Zoom: popup window not found");
        return;
    };
    if let Err(e) = win.set_zoom(factor) {
        warn!(error = %e, factor, "Zoom: set_zoom failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_adds_one_step() {
        assert_eq!(stepped_in(1.0), 1.1);
        assert_eq!(stepped_in(0.3), 0.4);
    }

    #[test]
    fn zoom_out_subtracts_one_step() {
        assert_eq!(stepped_out(1.0), 0.9);
        assert_eq!(stepped_out(0.5), 0.4);
    }

    #[test]
    fn zoom_out_clamps_at_floor() {
        assert_eq!(stepped_out(0.4), 0.3);
        assert_eq!(stepped_out(0.3), 0.3);
        assert_eq!(stepped_out(0.35), 0.3);
    }

    #[test]
    fn zoom_out_converges_to_exact_floor() {
        let mut factor = 0.5;
        factor = stepped_out(factor);
        assert_eq!(factor, 0.4);
        factor = stepped_out(factor);
        assert_eq!(factor, 0.3);
        factor = stepped_out(factor);
        assert_eq!(factor, 0.3);
    }

    #[test]
    fn repeated_steps_stay_on_tenths() {
        let mut factor = ZOOM_DEFAULT;
        for _ in 0..7 {
            factor = stepped_out(factor);
        }
        assert_eq!(factor, ZOOM_MIN);
        for _ in 0..3 {
            factor = stepped_in(factor);
        }
        assert_eq!(factor, 0.6);
    }

    #[test]
    fn default_state_starts_at_one() {
        let state = ZoomState::default();
        assert_eq!(*state.0.lock().unwrap(), ZOOM_DEFAULT);
    }
}
