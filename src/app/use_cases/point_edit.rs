//! Bearbeiten-Modus: Messpunkte selektieren, ziehen, per Feld editieren
//! und in Segmente von Multi-Distanzen/Flächen einfügen.

use glam::{DVec3, Vec2};

use super::measurement_session;
use super::presentation::{registry_changed, set_status_hint};
use super::{picked_points, visuals};
use crate::app::state::{CoordinateFields, EditSession, PointRef};
use crate::app::{AppState, Ports};
use crate::core::geo::closest_point_on_segment;
use crate::core::{Cartographic, MeasurementMode};
use crate::engine::{PickingHandlerKind, RenderEngine};

/// Schaltet den Bearbeiten-Modus ein oder aus.
pub fn set_edit_mode(state: &mut AppState, ports: &mut Ports, enabled: bool) -> anyhow::Result<()> {
    if enabled == state.is_editing() {
        return Ok(());
    }
    if !enabled {
        leave(state, ports.engine);
        return Ok(());
    }

    if !state.session.mode.is_off() || state.session.has_in_progress() {
        measurement_session::set_mode(state, ports, MeasurementMode::OFF, true)?;
    }
    if state.picking.enabled {
        picked_points::set_enabled(state, ports, false, true)?;
    }
    state.edit = Some(EditSession::default());
    visuals::restyle_markers(state, ports.engine);
    state.picking_slot.install(ports.engine, PickingHandlerKind::Edit);
    log::info!("Bearbeiten-Modus aktiviert");
    Ok(())
}

/// Verlässt den Bearbeiten-Modus (no-op, wenn nicht aktiv).
///
/// Ein nicht abgeschlossener Drag wird auf den Registry-Stand zurückgesetzt.
pub fn leave(state: &mut AppState, engine: &mut dyn RenderEngine) {
    let Some(edit) = state.edit.take() else {
        return;
    };
    if let (true, Some(selected)) = (edit.dragging, edit.selected) {
        visuals::redraw_measurement(state, engine, selected.measurement);
    }
    state.presentation.coordinate_editor = None;
    visuals::restyle_markers(state, engine);
    state
        .picking_slot
        .release_kind(engine, PickingHandlerKind::Edit);
    engine.set_camera_rotate_enabled(true);
    log::info!("Bearbeiten-Modus beendet");
}

/// Schaltet den Einfügen-Modus; die Selektion wird dabei aufgehoben.
pub fn set_add_point_mode(state: &mut AppState, engine: &mut dyn RenderEngine, enabled: bool) {
    if state.edit.is_none() {
        return;
    }
    deselect(state, engine);
    if let Some(edit) = state.edit.as_mut() {
        edit.add_point_mode = enabled;
    }
}

/// Klick im Bearbeiten-Modus: selektieren oder Punkt einfügen.
pub fn click(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    let Some(edit) = state.edit.as_ref() else {
        return Ok(());
    };
    if edit.add_point_mode {
        return insert_point(state, ports, screen);
    }
    select_at(state, ports.engine, screen);
    Ok(())
}

/// Löst den Marker unter dem Cursor über die flache Marker-Liste auf.
fn select_at(state: &mut AppState, engine: &mut dyn RenderEngine, screen: Vec2) {
    let resolved = engine.pick_entity(screen).and_then(|handle| {
        let flat = state.scene.flat_markers().iter().position(|h| *h == handle)?;
        state.registry.resolve_flat_index(flat)
    });
    match resolved {
        Some((measurement, point)) => select(state, engine, PointRef { measurement, point }),
        None => deselect(state, engine),
    }
}

fn marker_handle(state: &AppState, point: PointRef) -> Option<crate::engine::EntityHandle> {
    state
        .scene
        .visuals
        .get(point.measurement)?
        .markers
        .get(point.point)
        .copied()
}

/// Selektiert einen Punkt und füllt den Koordinaten-Editor.
pub fn select(state: &mut AppState, engine: &mut dyn RenderEngine, point: PointRef) {
    let Some(position) = state
        .registry
        .get(point.measurement)
        .and_then(|m| m.points.get(point.point))
        .copied()
    else {
        return;
    };
    deselect(state, engine);
    if let Some(handle) = marker_handle(state, point) {
        engine.set_marker_style(handle, state.options.selected_point_color, state.marker_size());
    }
    if let Some(edit) = state.edit.as_mut() {
        edit.selected = Some(point);
    }
    state.presentation.coordinate_editor = Some(position.into());
    log::debug!(
        "Punkt {} von Messung {} selektiert",
        point.point,
        point.measurement
    );
}

/// Hebt die Selektion auf und setzt die Markerfarbe zurück.
pub fn deselect(state: &mut AppState, engine: &mut dyn RenderEngine) {
    let Some(previous) = state.edit.as_mut().and_then(|e| e.selected.take()) else {
        return;
    };
    if let (Some(handle), Some(m)) = (
        marker_handle(state, previous),
        state.registry.get(previous.measurement),
    ) {
        engine.set_marker_style(handle, state.options.color_for(m.kind), state.marker_size());
    }
    state.presentation.coordinate_editor = None;
}

/// Pointer-Down auf dem selektierten Marker startet den Drag.
pub fn begin_drag(state: &mut AppState, engine: &mut dyn RenderEngine, screen: Vec2) {
    let Some(selected) = state.edit.as_ref().and_then(|e| e.selected) else {
        return;
    };
    let Some(handle) = marker_handle(state, selected) else {
        return;
    };
    if engine.pick_entity(screen) != Some(handle) {
        return;
    }
    engine.set_camera_rotate_enabled(false);
    if let Some(edit) = state.edit.as_mut() {
        edit.dragging = true;
        edit.drag_position = None;
    }
}

/// Pointer-Move während des Drags: Marker folgt live.
pub fn drag(state: &mut AppState, engine: &mut dyn RenderEngine, screen: Vec2) {
    let Some(selected) = state.edit.as_ref().and_then(|e| e.selected) else {
        return;
    };
    let Some(position) = engine.pick_world_position(screen) else {
        return;
    };
    if let Some(handle) = marker_handle(state, selected) {
        engine.set_entity_position(handle, position);
    }
    if let Some(edit) = state.edit.as_mut() {
        edit.drag_position = Some(position);
    }
}

/// Pointer-Up: Drag beenden, Kamera-Rotation freigeben, Position übernehmen.
pub fn end_drag(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    let Some(edit) = state.edit.as_mut() else {
        return Ok(());
    };
    let last_known = edit.drag_position.take();
    edit.dragging = false;
    let selected = edit.selected;
    ports.engine.set_camera_rotate_enabled(true);

    let position = ports.engine.pick_world_position(screen).or(last_known);
    match (selected, position) {
        (Some(point), Some(position)) => commit_point(state, ports, point, position),
        _ => Ok(()),
    }
}

/// Übernimmt die Werte des Koordinaten-Editors.
pub fn commit_coordinates(
    state: &mut AppState,
    ports: &mut Ports,
    fields: CoordinateFields,
) -> anyhow::Result<()> {
    let Some(point) = state.edit.as_ref().and_then(|e| e.selected) else {
        return Ok(());
    };
    commit_point(state, ports, point, fields.into())
}

/// Versetzt einen Punkt, berechnet den Wert neu und aktualisiert die Geometrie.
fn commit_point(
    state: &mut AppState,
    ports: &mut Ports,
    point: PointRef,
    position: Cartographic,
) -> anyhow::Result<()> {
    if let Err(e) = position.validate() {
        log::warn!("Koordinaten verworfen: {}", e);
        visuals::redraw_measurement(state, ports.engine, point.measurement);
        return Ok(());
    }
    let granularity = state.options.area_granularity;
    let moved = state.registry.update(point.measurement, |m| match m.points.get_mut(point.point) {
        Some(p) => {
            *p = position;
            m.recompute(granularity);
            true
        }
        None => false,
    });
    if moved != Some(true) {
        return Ok(());
    }
    if let Some(handle) = marker_handle(state, point) {
        ports.engine.set_entity_position(handle, position);
    }
    visuals::redraw_geometry(state, ports.engine, point.measurement);
    state.presentation.coordinate_editor = Some(position.into());
    registry_changed(state, ports)
}

/// Nächstgelegenes Segment einer offenen Messart zum Klickpunkt.
///
/// Liefert (Messung, Startindex des Segments, Abstand in Metern).
pub fn nearest_segment(state: &AppState, click: &Cartographic) -> Option<(usize, usize, f64)> {
    let target = click.to_ecef();
    let mut best: Option<(usize, usize, f64)> = None;
    for (index, measurement) in state.registry.iter().enumerate() {
        if !measurement.kind.is_open_ended() {
            continue;
        }
        let ecef: Vec<DVec3> = measurement.points.iter().map(|p| p.to_ecef()).collect();
        for (a, b) in measurement.segments() {
            let distance = closest_point_on_segment(target, ecef[a], ecef[b]).distance(target);
            if best.is_none_or(|(_, _, d)| distance < d) {
                best = Some((index, a, distance));
            }
        }
    }
    best
}

/// Fügt den Klickpunkt hinter dem Startpunkt des nächsten Segments ein.
fn insert_point(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    let Some(position) = ports.engine.pick_world_position(screen) else {
        set_status_hint(state, "Kein Punkt unter dem Cursor gefunden");
        return Ok(());
    };
    let Some((index, start, distance)) = nearest_segment(state, &position) else {
        return Ok(());
    };
    if distance > state.options.add_point_threshold_m {
        log::debug!("Nächstes Segment {:.1} m entfernt, kein Einfügen", distance);
        set_status_hint(state, "Zu weit von jeder Linie entfernt");
        return Ok(());
    }

    let granularity = state.options.area_granularity;
    state.registry.update(index, |m| {
        m.points.insert(start + 1, position);
        m.recompute(granularity);
    });
    visuals::redraw_measurement(state, ports.engine, index);
    state.presentation.status_hint = None;
    log::info!("Punkt in Messung {} nach Index {} eingefügt", index, start);
    registry_changed(state, ports)
}
