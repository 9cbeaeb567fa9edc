//! Registry-Reload aus Snapshots und Übernahme externer Registry-Änderungen.

use anyhow::Context;
use serde_json::Value;

use super::measurement_session;
use super::presentation::{rebuild_rows, registry_changed};
use super::visuals;
use crate::app::{AppState, Ports};
use crate::core::registry::MeasurementSnapshot;
use crate::core::{Measurement, MeasurementRegistry};
use crate::engine::RenderEngine;

/// Verarbeitet `loadMeasurementsTrigger {measurements, timestamp}`.
///
/// Ungültige Einträge werden einzeln übersprungen; der Rest ersetzt die
/// Registry komplett.
pub fn load_snapshot(state: &mut AppState, ports: &mut Ports, payload: Value) -> anyhow::Result<()> {
    if payload.is_null() {
        return Ok(());
    }
    let token = payload.get("timestamp").cloned();
    if token.is_some() && token == state.sync.last_load_token {
        log::debug!("Snapshot-Trigger bereits verarbeitet");
        return Ok(());
    }
    let snapshot: MeasurementSnapshot =
        serde_json::from_value(payload).context("loadMeasurementsTrigger ist kein gültiger Snapshot")?;
    state.sync.last_load_token = token;

    let granularity = state.options.area_granularity;
    let mut loaded = MeasurementRegistry::new();
    for (position, entry) in snapshot.measurements.iter().enumerate() {
        let default_name = loaded.next_default_name(entry.kind);
        match entry.to_measurement(default_name, granularity) {
            Ok(measurement) => {
                loaded.push(measurement);
            }
            Err(e) => log::warn!("Snapshot-Eintrag {} übersprungen: {}", position, e),
        }
    }

    reset_interaction(state, ports.engine);
    state.registry.replace_all(loaded.as_slice().to_vec());
    visuals::rebuild_all(state, ports.engine);
    log::info!("{} Messungen aus Snapshot geladen", state.registry.len());
    registry_changed(state, ports)
}

/// Übernimmt eine extern geschriebene `measurementResults`-Liste.
///
/// Echos des eigenen Stands werden ignoriert; sonst werden alle Visuals
/// neu abgeleitet statt gediffed.
pub fn apply_host_registry(state: &mut AppState, ports: &mut Ports, value: Value) -> anyhow::Result<()> {
    let mut incoming: Vec<Measurement> = if value.is_null() {
        Vec::new()
    } else {
        match serde_json::from_value(value) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("measurementResults verworfen: {}", e);
                return Ok(());
            }
        }
    };
    if incoming.as_slice() == state.registry.as_slice() {
        return Ok(());
    }

    let granularity = state.options.area_granularity;
    incoming.retain(|m| {
        let checked = m
            .validate_points()
            .and_then(|()| m.points.iter().try_for_each(|p| p.validate()));
        match checked {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Messung '{}' vom Host verworfen: {}", m.name, e);
                false
            }
        }
    });
    for measurement in &mut incoming {
        measurement.recompute(granularity);
        measurement.is_active = false;
    }

    reset_interaction(state, ports.engine);
    state.registry.replace_all(incoming);
    visuals::rebuild_all(state, ports.engine);
    rebuild_rows(state);
    log::debug!("Registry vom Host übernommen: {} Einträge", state.registry.len());
    Ok(())
}

/// Verwirft laufende Session-Geometrie und die Punkt-Selektion.
///
/// Die Registry wird danach ersetzt, deshalb wird hier nichts publiziert.
fn reset_interaction(state: &mut AppState, engine: &mut dyn RenderEngine) {
    measurement_session::drop_pending_geometry(state, engine);
    if let Some(edit) = state.edit.as_mut() {
        if edit.dragging {
            engine.set_camera_rotate_enabled(true);
        }
        *edit = Default::default();
    }
    state.presentation.coordinate_editor = None;
}
