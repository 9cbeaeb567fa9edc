//! Handler für Uhr, Debounce-Flush, Kamera-Sync und Diagnose.

use crate::app::use_cases::camera_sync;
use crate::app::{AppState, Ports};
use crate::core::CameraPose;

/// Setzt die Uhr der Surface (monoton, Rücksprünge werden ignoriert).
pub fn advance_clock(state: &mut AppState, now_ms: u64) {
    state.clock_ms = state.clock_ms.max(now_ms);
}

/// Arbeitet fällige Debounce-Fenster ab.
pub fn flush(state: &mut AppState, ports: &mut Ports) {
    camera_sync::flush(state, ports);
}

/// Öffnet das Sammelfenster; angewendet wird erst beim Flush.
pub fn schedule_host_camera_apply(state: &mut AppState) {
    camera_sync::schedule_inbound(state);
}

/// Übernimmt die Host-Pose sofort (Startzustand).
pub fn apply_host_camera(state: &mut AppState, ports: &mut Ports) {
    camera_sync::apply_host_pose(state, ports);
}

pub fn queue_camera_publish(state: &mut AppState, pose: CameraPose) {
    camera_sync::queue_publish(state, pose);
}

pub fn set_camera_sync_enabled(state: &mut AppState, enabled: bool) {
    camera_sync::set_enabled(state, enabled);
}

/// Schaltet ausführliches Logging um.
pub fn set_debug_logging(state: &mut AppState, enabled: bool) {
    state.diagnostics.set_verbose(enabled);
}
