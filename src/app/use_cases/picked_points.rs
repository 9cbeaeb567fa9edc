//! Kalibrierpunkte picken und mit der Host-Liste abgleichen.
//!
//! Der Core hängt nur an; entfernt wird ausschließlich per ID-Abgleich
//! gegen eine neue Liste vom Host.

use anyhow::Context;
use glam::Vec2;
use serde_json::{json, Value};

use super::measurement_session;
use super::point_edit;
use super::presentation::set_status_hint;
use crate::app::{AppState, Ports};
use crate::core::picked_point::{added_points, next_point_id, removed_ids};
use crate::core::{Cartographic, MeasurementMode, PickedPoint, PointPickingConfig};
use crate::engine::{PickingHandlerKind, RenderEngine};
use crate::host::{push_property, HostProperty};

/// Schaltet den Pick-Modus; er belegt den Picking-Slot exklusiv.
pub fn set_enabled(
    state: &mut AppState,
    ports: &mut Ports,
    enabled: bool,
    publish: bool,
) -> anyhow::Result<()> {
    if enabled == state.picking.enabled {
        return Ok(());
    }
    if enabled {
        if !state.session.mode.is_off() || state.session.has_in_progress() {
            measurement_session::set_mode(state, ports, MeasurementMode::OFF, true)?;
        }
        point_edit::leave(state, ports.engine);
        state
            .picking_slot
            .install(ports.engine, PickingHandlerKind::PointPicking);
    } else {
        state
            .picking_slot
            .release_kind(ports.engine, PickingHandlerKind::PointPicking);
    }
    state.picking.enabled = enabled;
    if publish {
        push_property(ports.host, HostProperty::PointPickingMode, json!(enabled));
    }
    log::info!(
        "Punkt-Picking {}",
        if enabled { "aktiviert" } else { "deaktiviert" }
    );
    Ok(())
}

/// Übernimmt `pointPickingConfig` (fehlende Felder → Defaults).
pub fn set_config(state: &mut AppState, payload: Value) {
    if payload.is_null() {
        return;
    }
    match serde_json::from_value::<PointPickingConfig>(payload) {
        Ok(config) => state.picking.config = config,
        Err(e) => log::warn!("pointPickingConfig verworfen: {}", e),
    }
}

/// Pickt einen Kalibrierpunkt und meldet die neue Liste an den Host.
pub fn pick(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    let Some(position) = ports.engine.pick_world_position(screen) else {
        log::debug!("Fehlpick beim Punkt-Picking");
        set_status_hint(state, "Kein Punkt unter dem Cursor gefunden");
        return Ok(());
    };
    if let Err(e) = position.validate() {
        log::warn!("Gepickter Punkt verworfen: {}", e);
        return Ok(());
    }

    let config = &state.picking.config;
    let point = PickedPoint {
        id: next_point_id(&state.picking.points),
        latitude: position.latitude,
        longitude: position.longitude,
        altitude_ellipsoidal: position.altitude,
        altitude_approx: ports.engine.globe_height(position).unwrap_or(position.altitude),
        color: config.color.clone(),
        label: format!("{} {}", config.label_prefix, state.picking.points.len() + 1),
        timestamp: state.clock_ms as f64,
    };
    draw_point(state, ports.engine, &point);
    log::info!("{} gepickt ({})", point.label, point.id);
    state.picking.points.push(point);

    let list = serde_json::to_value(&state.picking.points)
        .context("Punktliste konnte nicht serialisiert werden")?;
    push_property(ports.host, HostProperty::PickedPoints, list);

    if !state.picking.config.continuous {
        set_enabled(state, ports, false, true)?;
    }
    Ok(())
}

/// Gleicht die Host-Liste per ID ab: entfernte IDs verlieren ihre Entities,
/// neue IDs werden gezeichnet.
pub fn apply_host_points(state: &mut AppState, ports: &mut Ports, payload: Value) {
    let incoming: Vec<PickedPoint> = if payload.is_null() {
        Vec::new()
    } else {
        match serde_json::from_value(payload) {
            Ok(points) => points,
            Err(e) => {
                log::warn!("pickedPoints verworfen: {}", e);
                return;
            }
        }
    };

    for id in removed_ids(&state.picking.points, &incoming) {
        if let Some(handles) = state.scene.picked.shift_remove(&id) {
            for handle in handles {
                ports.engine.remove_entity(handle);
            }
        }
    }
    let added: Vec<PickedPoint> = added_points(&state.picking.points, &incoming)
        .into_iter()
        .cloned()
        .collect();
    for point in &added {
        draw_point(state, ports.engine, point);
    }
    state.picking.points = incoming;
}

fn draw_point(state: &mut AppState, engine: &mut dyn RenderEngine, point: &PickedPoint) {
    let position = Cartographic::new(point.longitude, point.latitude, point.altitude_ellipsoidal);
    if let Err(e) = position.validate() {
        log::warn!("Punkt {} nicht darstellbar: {}", point.id, e);
        return;
    }
    let marker = engine.add_point_marker(
        position,
        parse_color(&point.color),
        state.picking.config.point_size,
    );
    let label = engine.add_label(position, &point.label);
    state.scene.picked.insert(point.id.clone(), vec![marker, label]);
}

/// CSS-Farbe (`#rrggbb` oder gängiger Name) → RGBA; Unbekanntes wird rot.
fn parse_color(raw: &str) -> [f32; 4] {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
                return [channel(16), channel(8), channel(0), 1.0];
            }
        }
    }
    match raw.to_ascii_lowercase().as_str() {
        "green" => [0.0, 0.5, 0.0, 1.0],
        "blue" => [0.0, 0.0, 1.0, 1.0],
        "yellow" => [1.0, 1.0, 0.0, 1.0],
        "orange" => [1.0, 0.65, 0.0, 1.0],
        "white" => [1.0, 1.0, 1.0, 1.0],
        "black" => [0.0, 0.0, 0.0, 1.0],
        "cyan" => [0.0, 1.0, 1.0, 1.0],
        "magenta" => [1.0, 0.0, 1.0, 1.0],
        _ => [1.0, 0.0, 0.0, 1.0],
    }
}
