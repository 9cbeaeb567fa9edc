//! Handler für Messmodus und Mess-Session.

use glam::Vec2;
use serde_json::Value;

use crate::app::use_cases::{measurement_session, visuals};
use crate::app::{AppState, Ports};
use crate::core::MeasurementMode;
use crate::engine::TerrainRequestId;

pub fn apply_host_mode(state: &mut AppState, ports: &mut Ports, value: Value) -> anyhow::Result<()> {
    measurement_session::apply_host_mode(state, ports, value)
}

pub fn set_mode(
    state: &mut AppState,
    ports: &mut Ports,
    mode: MeasurementMode,
    publish: bool,
) -> anyhow::Result<()> {
    measurement_session::set_mode(state, ports, mode, publish)
}

/// Klick im Messmodus.
pub fn add_point(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    measurement_session::add_point(state, ports, screen)
}

/// Ende-Signal für offene Messungen.
pub fn end(state: &mut AppState, ports: &mut Ports) -> anyhow::Result<()> {
    measurement_session::end(state, ports)
}

pub fn clear(state: &mut AppState, ports: &mut Ports) -> anyhow::Result<()> {
    measurement_session::clear(state, ports)
}

/// Ergebnis einer Terrain-Abfrage für ein Flächen-Label.
pub fn place_area_label(
    state: &mut AppState,
    ports: &mut Ports,
    request: TerrainRequestId,
    result: Result<f64, String>,
) {
    visuals::place_area_label(state, ports.engine, request, result);
}
