//! Handler für Registry-Spiegelung, Snapshots, Fokus und Mess-Liste.

use serde_json::Value;

use crate::app::use_cases::{focus, presentation, snapshot};
use crate::app::{AppState, Ports};

/// Externe Änderung von `measurementResults`.
pub fn apply_host_registry(state: &mut AppState, ports: &mut Ports, value: Value) -> anyhow::Result<()> {
    snapshot::apply_host_registry(state, ports, value)
}

/// `loadMeasurementsTrigger`.
pub fn load_snapshot(state: &mut AppState, ports: &mut Ports, payload: Value) -> anyhow::Result<()> {
    snapshot::load_snapshot(state, ports, payload)
}

pub fn apply_focus_trigger(state: &mut AppState, ports: &mut Ports, payload: Value) {
    focus::apply_focus_trigger(state, ports, payload);
}

pub fn focus(state: &AppState, ports: &mut Ports, index: usize) {
    focus::focus_measurement(state, ports, index);
}

pub fn rename(state: &mut AppState, ports: &mut Ports, index: usize, name: &str) -> anyhow::Result<()> {
    presentation::rename(state, ports, index, name)
}

pub fn set_tool_visibility(state: &mut AppState, tools: Option<bool>, list: Option<bool>) {
    presentation::set_tool_visibility(state, tools, list);
}
