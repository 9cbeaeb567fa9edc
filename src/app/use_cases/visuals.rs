//! Scene-Darstellung der Mess-Records: Marker, Linien/Polygone und Labels.
//!
//! Die Visuals sind parallel zur Registry indiziert und werden bei externen
//! Änderungen komplett neu abgeleitet statt gediffed.

use crate::app::state::MeasurementVisuals;
use crate::app::AppState;
use crate::core::geo::{centroid, chord_distance, midpoint};
use crate::core::{format_distance, format_measurement_value, Cartographic, Measurement, MeasurementKind};
use crate::engine::{EntityHandle, RenderEngine, TerrainRequestId};
use crate::shared::SessionOptions;

/// Zeichnet einen Record komplett (Marker + Geometrie + Labels).
pub fn draw_measurement(
    engine: &mut dyn RenderEngine,
    measurement: &Measurement,
    options: &SessionOptions,
    marker_size: f32,
) -> MeasurementVisuals {
    let color = options.color_for(measurement.kind);
    let mut visuals = MeasurementVisuals {
        markers: measurement
            .points
            .iter()
            .map(|p| engine.add_point_marker(*p, color, marker_size))
            .collect(),
        ..Default::default()
    };
    draw_geometry(engine, measurement, options, &mut visuals);
    visuals
}

/// Zeichnet Linien und Labels eines Records, ohne die Marker anzufassen.
fn draw_geometry(
    engine: &mut dyn RenderEngine,
    measurement: &Measurement,
    options: &SessionOptions,
    visuals: &mut MeasurementVisuals,
) {
    let color = options.color_for(measurement.kind);
    let points = &measurement.points;

    match measurement.kind {
        MeasurementKind::Distance | MeasurementKind::Height => {
            if let [a, b, ..] = points.as_slice() {
                visuals.lines.push(engine.add_polyline(&[*a, *b], color));
                let text = format_measurement_value(measurement.kind, measurement.value);
                visuals.labels.push(engine.add_label(midpoint(a, b), &text));
            }
        }
        MeasurementKind::MultiDistance => {
            if points.len() < 2 {
                return;
            }
            visuals.lines.push(engine.add_polyline(points, color));
            for pair in points.windows(2) {
                let text = format_distance(chord_distance(&pair[0], &pair[1]));
                visuals
                    .labels
                    .push(engine.add_label(midpoint(&pair[0], &pair[1]), &text));
            }
            if let Some(last) = points.last() {
                let text = format!("Total: {}", format_distance(measurement.value));
                visuals.labels.push(engine.add_label(*last, &text));
            }
        }
        MeasurementKind::Area => {
            if points.len() < 3 {
                if points.len() == 2 {
                    visuals.lines.push(engine.add_polyline(points, color));
                }
                return;
            }
            visuals
                .lines
                .push(engine.add_polygon(points, options.area_fill_color, color));
            let mut outline = points.clone();
            outline.push(points[0]);
            visuals.lines.push(engine.add_polyline(&outline, color));
            // Label folgt asynchron, sobald die Geländehöhe am Schwerpunkt da ist
            visuals.pending_label = centroid(points).map(|c| engine.request_terrain_height(c));
        }
    }
}

/// Entfernt alle Entities eines Records.
pub fn remove_visuals(engine: &mut dyn RenderEngine, visuals: &MeasurementVisuals) {
    for handle in visuals.handles() {
        engine.remove_entity(handle);
    }
}

/// Ersetzt Linien und Labels nach einer Punktänderung; Marker bleiben erhalten.
pub fn redraw_geometry(state: &mut AppState, engine: &mut dyn RenderEngine, index: usize) {
    let Some(measurement) = state.registry.get(index) else {
        return;
    };
    let Some(visuals) = state.scene.visuals.get_mut(index) else {
        return;
    };
    for handle in visuals.lines.drain(..).chain(visuals.labels.drain(..)) {
        engine.remove_entity(handle);
    }
    visuals.pending_label = None;
    draw_geometry(engine, measurement, &state.options, visuals);
}

/// Zeichnet einen einzelnen Record neu (z.B. nach Einfügen eines Punkts).
pub fn redraw_measurement(state: &mut AppState, engine: &mut dyn RenderEngine, index: usize) {
    let Some(measurement) = state.registry.get(index) else {
        return;
    };
    let fresh = draw_measurement(engine, measurement, &state.options, state.marker_size());
    match state.scene.visuals.get_mut(index) {
        Some(old) => {
            remove_visuals(engine, old);
            *old = fresh;
        }
        None => state.scene.visuals.push(fresh),
    }
}

/// Leitet alle Visuals neu aus der Registry ab.
pub fn rebuild_all(state: &mut AppState, engine: &mut dyn RenderEngine) {
    for visuals in state.scene.visuals.drain(..) {
        remove_visuals(engine, &visuals);
    }
    let marker_size = state.marker_size();
    let fresh: Vec<MeasurementVisuals> = state
        .registry
        .iter()
        .map(|m| draw_measurement(engine, m, &state.options, marker_size))
        .collect();
    state.scene.visuals = fresh;
    log::debug!("Visuals neu aufgebaut: {} Messungen", state.scene.visuals.len());
}

/// Setzt die Größe aller Mess-Marker (Bearbeiten-Modus vergrößert sie).
pub fn restyle_markers(state: &AppState, engine: &mut dyn RenderEngine) {
    let size = state.marker_size();
    for (visuals, measurement) in state.scene.visuals.iter().zip(state.registry.iter()) {
        let color = state.options.color_for(measurement.kind);
        for handle in &visuals.markers {
            engine.set_marker_style(*handle, color, size);
        }
    }
}

/// Platziert das Flächen-Label, wenn die Terrain-Abfrage zurückkommt.
///
/// Antworten für inzwischen neu gezeichnete oder entfernte Visuals werden verworfen.
pub fn place_area_label(
    state: &mut AppState,
    engine: &mut dyn RenderEngine,
    request: TerrainRequestId,
    result: Result<f64, String>,
) {
    let Some(index) = state
        .scene
        .visuals
        .iter()
        .position(|v| v.pending_label == Some(request))
    else {
        log::debug!("Veraltete Terrain-Antwort {:?} verworfen", request);
        return;
    };
    state.scene.visuals[index].pending_label = None;

    let height = match result {
        Ok(height) if height.is_finite() => height,
        Ok(height) => {
            log::warn!("Terrain-Höhe {} ungültig, Flächen-Label entfällt", height);
            return;
        }
        Err(e) => {
            log::warn!("Terrain-Abfrage fehlgeschlagen: {}", e);
            return;
        }
    };
    let Some(measurement) = state.registry.get(index) else {
        return;
    };
    let Some(center) = centroid(&measurement.points) else {
        return;
    };
    let text = format_measurement_value(measurement.kind, measurement.value);
    let label = engine.add_label(center.with_altitude(height), &text);
    state.scene.visuals[index].labels.push(label);
}

/// Vorschau-Entities einer noch nicht registrierten Messung.
pub fn draw_preview(
    engine: &mut dyn RenderEngine,
    kind: MeasurementKind,
    points: &[Cartographic],
    options: &SessionOptions,
    marker_size: f32,
) -> Vec<EntityHandle> {
    let color = options.color_for(kind);
    let mut handles: Vec<EntityHandle> = points
        .iter()
        .map(|p| engine.add_point_marker(*p, color, marker_size))
        .collect();
    if points.len() >= 2 {
        handles.push(engine.add_polyline(points, color));
    }
    handles
}

/// Entfernt Vorschau-Entities.
pub fn remove_preview(engine: &mut dyn RenderEngine, handles: &[EntityHandle]) {
    for handle in handles {
        engine.remove_entity(*handle);
    }
}
