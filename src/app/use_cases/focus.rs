//! Kamera auf eine Messung ausrichten.

use serde_json::Value;

use crate::app::{AppState, Ports};
use crate::core::{BoundingSphere, HeadingPitchRange};

/// Fliegt die Kamera so, dass die Bounding-Sphere der Messung im Bild liegt.
pub fn focus_measurement(state: &AppState, ports: &mut Ports, index: usize) {
    let Some(measurement) = state.registry.get(index) else {
        log::warn!("Fokus: Messung {} existiert nicht", index);
        return;
    };
    let Some(sphere) = BoundingSphere::from_points(&measurement.points) else {
        return;
    };
    let options = &state.options;
    let offset = HeadingPitchRange::new(
        0.0,
        options.focus_pitch_deg,
        options.focus_range(sphere.radius),
    );
    ports
        .engine
        .fly_to_bounding_sphere(sphere, offset, options.focus_duration_s);
    log::debug!("Fokus auf '{}' (r = {:.1} m)", measurement.name, sphere.radius);
}

/// Verarbeitet `focusMeasurementTrigger {index, timestamp}` genau einmal.
pub fn apply_focus_trigger(state: &mut AppState, ports: &mut Ports, payload: Value) {
    if payload.is_null() {
        return;
    }
    let token = payload.get("timestamp").cloned();
    if token.is_some() && token == state.sync.last_focus_token {
        log::debug!("Fokus-Trigger bereits verarbeitet");
        return;
    }
    let Some(index) = payload.get("index").and_then(Value::as_u64) else {
        log::warn!("focusMeasurementTrigger ohne gültigen Index: {}", payload);
        return;
    };
    state.sync.last_focus_token = token;
    focus_measurement(state, ports, index as usize);
}
