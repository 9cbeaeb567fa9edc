//! Mess-Session: Punkte sammeln je Messart, Abschluss, Verwerfen, Löschen.
//!
//! Distanz sammelt zwei Punkte, Höhe schließt mit einem Klick ab
//! (Bodenpunkt aus der geladenen Geländehöhe). Multi-Distanz und Fläche
//! sammeln bis zum Ende-Signal; ab der Mindestpunktzahl existiert ein aktiver
//! Record, der mit jedem Punkt in-place aktualisiert wird.

use glam::Vec2;
use serde_json::{json, Value};

use super::presentation::{registry_changed, set_status_hint};
use super::{picked_points, point_edit, visuals};
use crate::app::state::SessionPhase;
use crate::app::{AppState, Ports};
use crate::core::{Cartographic, Measurement, MeasurementKind, MeasurementMode};
use crate::engine::{PickingHandlerKind, RenderEngine};
use crate::host::{push_property, HostProperty};

const PICK_MISS_HINT: &str = "Kein Punkt unter dem Cursor gefunden";

/// Wechselt den Messmodus; laufende, unfertige Geometrie wird verworfen.
pub fn set_mode(
    state: &mut AppState,
    ports: &mut Ports,
    mode: MeasurementMode,
    publish: bool,
) -> anyhow::Result<()> {
    discard_in_progress(state, ports)?;

    if !mode.is_off() {
        point_edit::leave(state, ports.engine);
        if state.picking.enabled {
            picked_points::set_enabled(state, ports, false, true)?;
        }
    }

    state.session.mode = mode;
    state.session.phase = state.session.rest_phase();
    if mode.is_off() {
        state
            .picking_slot
            .release_kind(ports.engine, PickingHandlerKind::Measurement);
    } else {
        state
            .picking_slot
            .install(ports.engine, PickingHandlerKind::Measurement);
    }

    if publish {
        push_property(ports.host, HostProperty::MeasurementMode, json!(mode.as_wire()));
    }
    log::info!("Messmodus: '{}'", mode.as_wire());
    Ok(())
}

/// Übernimmt `measurementMode` vom Host (ungültige Werte werden verworfen).
pub fn apply_host_mode(state: &mut AppState, ports: &mut Ports, value: Value) -> anyhow::Result<()> {
    let raw = match &value {
        Value::String(s) => s.as_str(),
        Value::Null => "",
        other => {
            log::warn!("measurementMode ist kein String: {}", other);
            return Ok(());
        }
    };
    let mode = match MeasurementMode::parse(raw) {
        Ok(mode) => mode,
        Err(e) => {
            log::warn!("{}", e);
            return Ok(());
        }
    };
    if mode == state.session.mode {
        return Ok(());
    }
    set_mode(state, ports, mode, false)
}

/// Verwirft unfertige Geometrie der aktuellen Session.
///
/// Ein bereits registrierter, noch aktiver Record wird aus der Registry
/// entfernt statt als fertige Messung stehen zu bleiben.
pub fn discard_in_progress(state: &mut AppState, ports: &mut Ports) -> anyhow::Result<()> {
    match std::mem::take(&mut state.session.phase) {
        SessionPhase::AwaitingPoint2 { marker, .. } => {
            ports.engine.remove_entity(marker);
        }
        SessionPhase::Collecting {
            preview, record, ..
        } => {
            visuals::remove_preview(ports.engine, &preview);
            if let Some(index) = record {
                if state.registry.active_index() == Some(index) {
                    state.registry.discard_active();
                    if index < state.scene.visuals.len() {
                        let removed = state.scene.visuals.remove(index);
                        visuals::remove_visuals(ports.engine, &removed);
                    }
                    log::debug!("Unfertige Messung {} verworfen", index);
                    registry_changed(state, ports)?;
                }
            }
        }
        SessionPhase::Idle | SessionPhase::AwaitingPoint1 => {}
    }
    state.session.phase = state.session.rest_phase();
    Ok(())
}

/// Entfernt Vorschau-Entities der Session, ohne die Registry anzufassen.
///
/// Für Pfade, die die Registry ohnehin komplett ersetzen.
pub fn drop_pending_geometry(state: &mut AppState, engine: &mut dyn RenderEngine) {
    match std::mem::take(&mut state.session.phase) {
        SessionPhase::AwaitingPoint2 { marker, .. } => engine.remove_entity(marker),
        SessionPhase::Collecting { preview, .. } => visuals::remove_preview(engine, &preview),
        SessionPhase::Idle | SessionPhase::AwaitingPoint1 => {}
    }
    state.session.phase = state.session.rest_phase();
}

/// Verarbeitet einen Klick im Messmodus.
pub fn add_point(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    let Some(kind) = state.session.kind() else {
        return Ok(());
    };
    let Some(position) = ports.engine.pick_world_position(screen) else {
        log::debug!("Fehlpick bei ({:.1}, {:.1})", screen.x, screen.y);
        set_status_hint(state, PICK_MISS_HINT);
        return Ok(());
    };
    if let Err(e) = position.validate() {
        log::warn!("Gepickter Punkt verworfen: {}", e);
        return Ok(());
    }
    state.presentation.status_hint = None;

    match kind {
        MeasurementKind::Distance => add_distance_point(state, ports, position),
        MeasurementKind::Height => add_height_point(state, ports, position),
        MeasurementKind::MultiDistance | MeasurementKind::Area => {
            add_collecting_point(state, ports, kind, position)
        }
    }
}

fn add_distance_point(
    state: &mut AppState,
    ports: &mut Ports,
    position: Cartographic,
) -> anyhow::Result<()> {
    match std::mem::take(&mut state.session.phase) {
        SessionPhase::AwaitingPoint2 { first, marker } => {
            ports.engine.remove_entity(marker);
            state.session.phase = SessionPhase::AwaitingPoint1;
            finalize_record(state, ports, MeasurementKind::Distance, vec![first, position])
        }
        _ => {
            let color = state.options.color_for(MeasurementKind::Distance);
            let marker = ports
                .engine
                .add_point_marker(position, color, state.marker_size());
            state.session.phase = SessionPhase::AwaitingPoint2 {
                first: position,
                marker,
            };
            Ok(())
        }
    }
}

fn add_height_point(
    state: &mut AppState,
    ports: &mut Ports,
    position: Cartographic,
) -> anyhow::Result<()> {
    let ground_altitude = ports.engine.globe_height(position).unwrap_or_else(|| {
        log::debug!("Keine Geländehöhe geladen, Bodenpunkt auf 0 m");
        0.0
    });
    let ground = position.with_altitude(ground_altitude);
    state.session.phase = SessionPhase::AwaitingPoint1;
    finalize_record(state, ports, MeasurementKind::Height, vec![ground, position])
}

fn add_collecting_point(
    state: &mut AppState,
    ports: &mut Ports,
    kind: MeasurementKind,
    position: Cartographic,
) -> anyhow::Result<()> {
    let (mut points, preview, record) = match std::mem::take(&mut state.session.phase) {
        SessionPhase::Collecting {
            points,
            preview,
            record,
        } => (points, preview, record),
        _ => (Vec::new(), Vec::new(), None),
    };
    points.push(position);
    visuals::remove_preview(ports.engine, &preview);
    let granularity = state.options.area_granularity;

    let record = match record {
        Some(index) => {
            let updated = points.clone();
            state.registry.update(index, |m| {
                m.points = updated;
                m.recompute(granularity);
            });
            visuals::redraw_measurement(state, ports.engine, index);
            registry_changed(state, ports)?;
            Some(index)
        }
        None if points.len() >= kind.min_points() => {
            let name = state.registry.next_default_name(kind);
            let mut measurement = Measurement::new(kind, points.clone(), name, granularity);
            measurement.is_active = true;
            let index = state.registry.push(measurement);
            visuals::redraw_measurement(state, ports.engine, index);
            registry_changed(state, ports)?;
            log::info!("{} begonnen", kind.label());
            Some(index)
        }
        None => {
            let preview = visuals::draw_preview(
                ports.engine,
                kind,
                &points,
                &state.options,
                state.marker_size(),
            );
            state.session.phase = SessionPhase::Collecting {
                points,
                preview,
                record: None,
            };
            return Ok(());
        }
    };

    state.session.phase = SessionPhase::Collecting {
        points,
        preview: Vec::new(),
        record,
    };
    Ok(())
}

/// Legt einen fertigen Zwei-Punkt-Record an.
fn finalize_record(
    state: &mut AppState,
    ports: &mut Ports,
    kind: MeasurementKind,
    points: Vec<Cartographic>,
) -> anyhow::Result<()> {
    let name = state.registry.next_default_name(kind);
    let measurement = Measurement::new(kind, points, name, state.options.area_granularity);
    log::info!(
        "{} abgeschlossen: {:.3}",
        measurement.name,
        measurement.value
    );
    let index = state.registry.push(measurement);
    visuals::redraw_measurement(state, ports.engine, index);
    registry_changed(state, ports)
}

/// Ende-Signal (Rechtsklick): schließt die offene Messung ab.
///
/// Unterhalb der Mindestpunktzahl wird die Vorschau verworfen.
pub fn end(state: &mut AppState, ports: &mut Ports) -> anyhow::Result<()> {
    let SessionPhase::Collecting {
        points,
        preview,
        record,
    } = std::mem::take(&mut state.session.phase)
    else {
        state.session.phase = state.session.rest_phase();
        return Ok(());
    };

    visuals::remove_preview(ports.engine, &preview);
    state.session.phase = state.session.rest_phase();
    match record {
        Some(index) => {
            state.registry.update(index, |m| m.is_active = false);
            log::info!("Messung {} abgeschlossen ({} Punkte)", index, points.len());
            registry_changed(state, ports)
        }
        None => {
            log::debug!("Messung mit {} Punkten verworfen", points.len());
            Ok(())
        }
    }
}

/// Löscht alle Messungen und ihre Visuals.
pub fn clear(state: &mut AppState, ports: &mut Ports) -> anyhow::Result<()> {
    drop_pending_geometry(state, ports.engine);
    for removed in state.scene.visuals.drain(..) {
        visuals::remove_visuals(ports.engine, &removed);
    }
    if let Some(edit) = state.edit.as_mut() {
        edit.selected = None;
        edit.dragging = false;
        edit.drag_position = None;
    }
    state.presentation.coordinate_editor = None;
    state.registry.clear();
    log::info!("Alle Messungen gelöscht");
    registry_changed(state, ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::chord_distance;
    use crate::engine::RecordingEngine;
    use crate::host::{HostModel, InMemoryHost};
    use approx::assert_relative_eq;

    struct Fixture {
        state: AppState,
        engine: RecordingEngine,
        host: InMemoryHost,
    }

    impl Fixture {
        fn new(mode: MeasurementKind) -> Self {
            let mut fx = Self {
                state: AppState::default(),
                engine: RecordingEngine::new(),
                host: InMemoryHost::with_defaults(),
            };
            let mut ports = Ports::new(&mut fx.engine, &mut fx.host);
            set_mode(&mut fx.state, &mut ports, MeasurementMode(Some(mode)), true).unwrap();
            fx
        }

        fn click(&mut self, x: f32, world: Cartographic) {
            let screen = Vec2::new(x, 0.0);
            self.engine.script_pick(screen, world);
            let mut ports = Ports::new(&mut self.engine, &mut self.host);
            add_point(&mut self.state, &mut ports, screen).unwrap();
        }

        fn end(&mut self) {
            let mut ports = Ports::new(&mut self.engine, &mut self.host);
            end(&mut self.state, &mut ports).unwrap();
        }
    }

    fn east(meters: f64) -> Cartographic {
        Cartographic::new(meters / 111_319.490_793, 0.0, 0.0)
    }

    #[test]
    fn distance_finalizes_on_second_point() {
        let mut fx = Fixture::new(MeasurementKind::Distance);
        fx.click(1.0, east(0.0));
        assert!(fx.state.registry.is_empty());
        fx.click(2.0, east(1500.0));

        assert_eq!(fx.state.registry.len(), 1);
        let m = fx.state.registry.get(0).unwrap();
        assert_relative_eq!(m.value, chord_distance(&east(0.0), &east(1500.0)));
        assert_eq!(m.name, "Distance 1");
        assert_eq!(fx.state.presentation.rows[0].value_text, "1.50 km");
        assert_eq!(fx.state.session.phase, SessionPhase::AwaitingPoint1);
        assert_eq!(fx.host.get("measurementMode"), Some(json!("distance")));
    }

    #[test]
    fn multi_distance_updates_single_active_record_until_end() {
        let mut fx = Fixture::new(MeasurementKind::MultiDistance);
        fx.click(1.0, east(0.0));
        fx.click(2.0, east(400.0));
        fx.click(3.0, east(1000.0));

        assert_eq!(fx.state.registry.len(), 1);
        assert!(fx.state.registry.get(0).unwrap().is_active);
        assert_relative_eq!(fx.state.registry.get(0).unwrap().value, 1000.0, epsilon = 1e-3);

        fx.end();
        assert!(!fx.state.registry.get(0).unwrap().is_active);

        fx.click(4.0, east(2000.0));
        fx.click(5.0, east(2100.0));
        assert_eq!(fx.state.registry.len(), 2);
        assert_eq!(fx.state.registry.get(1).unwrap().name, "Multi-Distance 2");
    }

    #[test]
    fn area_below_three_points_stays_a_preview() {
        let mut fx = Fixture::new(MeasurementKind::Area);
        fx.click(1.0, east(0.0));
        fx.click(2.0, east(500.0));
        assert!(fx.state.registry.is_empty());
        assert_eq!(fx.engine.markers().len(), 2);

        fx.end();
        assert!(fx.state.registry.is_empty());
        assert_eq!(fx.engine.entity_count(), 0);
    }

    #[test]
    fn switching_mode_discards_active_area() {
        let mut fx = Fixture::new(MeasurementKind::Area);
        fx.click(1.0, Cartographic::new(0.0, 0.0, 0.0));
        fx.click(2.0, Cartographic::new(0.01, 0.0, 0.0));
        fx.click(3.0, Cartographic::new(0.0, 0.01, 0.0));
        assert_eq!(fx.state.registry.len(), 1);

        let mut ports = Ports::new(&mut fx.engine, &mut fx.host);
        set_mode(&mut fx.state, &mut ports, MeasurementMode(Some(MeasurementKind::Distance)), true)
            .unwrap();

        assert!(fx.state.registry.is_empty());
        assert_eq!(fx.engine.entity_count(), 0);
        assert_eq!(fx.host.get("measurementResults"), Some(json!([])));
    }

    #[test]
    fn height_uses_loaded_terrain_as_ground() {
        let mut fx = Fixture::new(MeasurementKind::Height);
        fx.engine.set_globe_height(Some(12.0));
        fx.click(1.0, Cartographic::new(8.0, 47.0, 52.5));

        let m = fx.state.registry.get(0).unwrap();
        assert_eq!(m.points[0].altitude, 12.0);
        assert_relative_eq!(m.value, 40.5);
        assert_eq!(fx.engine.markers().len(), 2);
    }

    #[test]
    fn pick_miss_sets_hint_and_changes_nothing() {
        let mut fx = Fixture::new(MeasurementKind::Distance);
        let mut ports = Ports::new(&mut fx.engine, &mut fx.host);
        add_point(&mut fx.state, &mut ports, Vec2::new(99.0, 99.0)).unwrap();

        assert_eq!(fx.state.presentation.status_hint.as_deref(), Some(PICK_MISS_HINT));
        assert_eq!(fx.state.session.phase, SessionPhase::AwaitingPoint1);
        assert_eq!(fx.engine.entity_count(), 0);
    }

    #[test]
    fn invalid_host_mode_is_ignored() {
        let mut fx = Fixture::new(MeasurementKind::Distance);
        let mut ports = Ports::new(&mut fx.engine, &mut fx.host);
        apply_host_mode(&mut fx.state, &mut ports, json!("volume")).unwrap();
        assert_eq!(fx.state.session.kind(), Some(MeasurementKind::Distance));

        apply_host_mode(&mut fx.state, &mut ports, json!("")).unwrap();
        assert!(fx.state.session.mode.is_off());
        assert!(fx.engine.installed_handlers().is_empty());
    }
}
