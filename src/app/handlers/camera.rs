//! Handler für Kamera-Kommandos vom Host.

use serde_json::Value;

use crate::app::use_cases::camera_command;
use crate::app::{AppState, Ports};

/// Führt ein `cameraCommand` genau einmal pro Token aus.
///
/// Ungültige Parameter werden verworfen und geloggt, die Kamera bleibt unverändert.
pub fn execute(state: &mut AppState, ports: &mut Ports, payload: Value) -> anyhow::Result<()> {
    let current = ports.engine.camera_pose();
    let Some(directive) = camera_command::parse(&payload, &current, &state.options)? else {
        return Ok(());
    };
    if directive.token.is_some() && directive.token == state.sync.last_command_token {
        log::debug!("Kamera-Kommando mit bekanntem Token ignoriert");
        return Ok(());
    }
    state.sync.last_command_token = directive.token.clone();

    if let Err(e) = camera_command::execute(ports.engine, &directive) {
        log::warn!("Kamera-Kommando verworfen: {}", e);
    }
    Ok(())
}
