//! Handler für das Picken von Kalibrierpunkten.

use glam::Vec2;
use serde_json::Value;

use crate::app::use_cases::picked_points;
use crate::app::{AppState, Ports};

pub fn set_mode(
    state: &mut AppState,
    ports: &mut Ports,
    enabled: bool,
    publish: bool,
) -> anyhow::Result<()> {
    picked_points::set_enabled(state, ports, enabled, publish)
}

pub fn set_config(state: &mut AppState, payload: Value) {
    picked_points::set_config(state, payload);
}

pub fn pick(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    picked_points::pick(state, ports, screen)
}

/// Abgleich mit der Host-Liste per ID.
pub fn apply_host_points(state: &mut AppState, ports: &mut Ports, payload: Value) {
    picked_points::apply_host_points(state, ports, payload);
}
