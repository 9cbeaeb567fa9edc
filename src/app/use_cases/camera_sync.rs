//! Bidirektionale Kamera-Synchronisation mit Debouncing.
//!
//! Host → Engine: Änderungen der sechs Kamera-Felder öffnen ein kurzes
//! festes Sammelfenster; erst an dessen Ende wird die komplette Pose neu
//! gelesen und einmal an die Engine gegeben.
//! Engine → Host: Kamerabewegungen werden mit Trailing-Debounce gesammelt und
//! nur bei aktivem `cameraSyncEnabled` geschrieben.

use serde_json::json;

use crate::app::{AppState, Ports};
use crate::core::{CameraPose, ValidationError};
use crate::host::{push_batch, read_f64, HostModel, HostProperty};
use crate::shared::options::CAMERA_ECHO_EPSILON;

/// Liest die Kamera-Pose aus den sechs Host-Feldern.
pub fn read_host_pose(host: &dyn HostModel) -> Result<CameraPose, ValidationError> {
    let field = |p: HostProperty| read_f64(host, p).unwrap_or(f64::NAN);
    let pose = CameraPose {
        latitude: field(HostProperty::Latitude),
        longitude: field(HostProperty::Longitude),
        altitude: field(HostProperty::Altitude),
        heading: field(HostProperty::Heading),
        pitch: field(HostProperty::Pitch),
        roll: field(HostProperty::Roll),
    };
    pose.validate()?;
    Ok(pose)
}

/// Host-Werte einer Pose als ein Batch.
pub fn pose_host_values(pose: &CameraPose) -> [(HostProperty, serde_json::Value); 6] {
    [
        (HostProperty::Latitude, json!(pose.latitude)),
        (HostProperty::Longitude, json!(pose.longitude)),
        (HostProperty::Altitude, json!(pose.altitude)),
        (HostProperty::Heading, json!(pose.heading)),
        (HostProperty::Pitch, json!(pose.pitch)),
        (HostProperty::Roll, json!(pose.roll)),
    ]
}

/// Merkt eine Host-Änderung der Kamera-Felder vor.
pub fn schedule_inbound(state: &mut AppState) {
    let now = state.clock_ms;
    state.sync.inbound.push(now, ());
}

/// Übernimmt die Host-Pose in die Engine (ungültige Werte werden verworfen).
pub fn apply_host_pose(state: &mut AppState, ports: &mut Ports) {
    let pose = match read_host_pose(&*ports.host) {
        Ok(pose) => pose,
        Err(e) => {
            log::warn!("Kamera-Update vom Host verworfen: {}", e);
            return;
        }
    };
    if ports.engine.camera_pose().approx_eq(&pose, CAMERA_ECHO_EPSILON) {
        state.sync.last_synced = Some(pose);
        return;
    }
    ports.engine.set_camera_pose(pose);
    state.sync.last_synced = Some(pose);
    log::debug!(
        "Kamera vom Host übernommen: {:.5}/{:.5} @ {:.1} m",
        pose.latitude,
        pose.longitude,
        pose.altitude
    );
}

/// Nimmt eine Engine-Kamerapose in das Trailing-Fenster auf.
pub fn queue_publish(state: &mut AppState, pose: CameraPose) {
    if !state.sync.enabled {
        return;
    }
    if let Err(e) = pose.validate() {
        log::warn!("Kamera-Pose der Engine verworfen: {}", e);
        return;
    }
    let now = state.clock_ms;
    state.sync.outbound.push(now, pose);
}

/// Schreibt eine Pose als einen Batch an den Host.
pub fn publish(state: &mut AppState, ports: &mut Ports, pose: CameraPose) {
    if !state.sync.enabled {
        return;
    }
    let echo = state
        .sync
        .last_synced
        .is_some_and(|last| last.approx_eq(&pose, CAMERA_ECHO_EPSILON));
    if echo {
        return;
    }
    push_batch(ports.host, pose_host_values(&pose));
    state.sync.last_synced = Some(pose);
    log::debug!("Kamera an Host gemeldet");
}

/// Arbeitet fällige Debounce-Fenster in beide Richtungen ab.
pub fn flush(state: &mut AppState, ports: &mut Ports) {
    let now = state.clock_ms;
    if state.sync.inbound.poll(now).is_some() {
        apply_host_pose(state, ports);
    }
    if let Some(pose) = state.sync.outbound.poll(now) {
        publish(state, ports, pose);
    }
}

/// Schaltet Kamera → Host ein oder aus; beim Ausschalten verfallen offene Werte.
pub fn set_enabled(state: &mut AppState, enabled: bool) {
    state.sync.enabled = enabled;
    if !enabled {
        state.sync.outbound.cancel();
    }
    log::info!(
        "Kamera-Sync {}",
        if enabled { "aktiviert" } else { "deaktiviert" }
    );
}
