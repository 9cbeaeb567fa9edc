//! Handler für den Bearbeiten-Modus.

use glam::Vec2;

use crate::app::state::CoordinateFields;
use crate::app::use_cases::point_edit;
use crate::app::{AppState, Ports};

pub fn set_edit_mode(state: &mut AppState, ports: &mut Ports, enabled: bool) -> anyhow::Result<()> {
    point_edit::set_edit_mode(state, ports, enabled)
}

pub fn set_add_point_mode(state: &mut AppState, ports: &mut Ports, enabled: bool) {
    point_edit::set_add_point_mode(state, ports.engine, enabled);
}

/// Klick: selektieren bzw. im Einfügen-Modus Punkt einfügen.
pub fn click(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    point_edit::click(state, ports, screen)
}

pub fn begin_drag(state: &mut AppState, ports: &mut Ports, screen: Vec2) {
    point_edit::begin_drag(state, ports.engine, screen);
}

pub fn drag(state: &mut AppState, ports: &mut Ports, screen: Vec2) {
    point_edit::drag(state, ports.engine, screen);
}

pub fn end_drag(state: &mut AppState, ports: &mut Ports, screen: Vec2) -> anyhow::Result<()> {
    point_edit::end_drag(state, ports, screen)
}

/// Übernimmt die Felder des Koordinaten-Editors.
pub fn commit_coordinates(
    state: &mut AppState,
    ports: &mut Ports,
    fields: CoordinateFields,
) -> anyhow::Result<()> {
    point_edit::commit_coordinates(state, ports, fields)
}
