//! Mess-Liste (Panel) und Spiegelung der Registry zum Host.

use anyhow::Context;

use crate::app::state::PresentationRow;
use crate::app::{AppState, Ports};
use crate::core::format_measurement_value;
use crate::host::{push_property, HostProperty};

/// Baut die Zeilen der Mess-Liste aus der Registry neu auf.
pub fn rebuild_rows(state: &mut AppState) {
    state.presentation.rows = state
        .registry
        .iter()
        .enumerate()
        .map(|(index, m)| PresentationRow {
            index,
            name: m.name.clone(),
            value_text: format_measurement_value(m.kind, m.value),
            point_count: m.points.len(),
            kind: m.kind,
        })
        .collect();
    state.presentation.revision = state.registry.revision();
}

/// Schreibt die Registry als `measurementResults` an den Host.
pub fn publish_registry(state: &AppState, ports: &mut Ports) -> anyhow::Result<()> {
    let value = serde_json::to_value(state.registry.as_slice())
        .context("Registry konnte nicht serialisiert werden")?;
    push_property(ports.host, HostProperty::MeasurementResults, value);
    Ok(())
}

/// Gemeinsamer Abschluss jeder Registry-Mutation: Host spiegeln, Liste neu aufbauen.
pub fn registry_changed(state: &mut AppState, ports: &mut Ports) -> anyhow::Result<()> {
    publish_registry(state, ports)?;
    rebuild_rows(state);
    Ok(())
}

/// Benennt eine Messung um; leere Namen und ungültige Indizes werden ignoriert.
pub fn rename(state: &mut AppState, ports: &mut Ports, index: usize, name: &str) -> anyhow::Result<()> {
    if !state.registry.rename(index, name) {
        log::warn!("Umbenennen von Messung {} abgelehnt", index);
        return Ok(());
    }
    log::info!("Messung {} umbenannt in '{}'", index, name.trim());
    registry_changed(state, ports)
}

/// Blendet Werkzeugleiste und Mess-Liste ein oder aus.
pub fn set_tool_visibility(state: &mut AppState, tools: Option<bool>, list: Option<bool>) {
    if let Some(tools) = tools {
        state.presentation.show_tools = tools;
    }
    if let Some(list) = list {
        state.presentation.show_list = list;
    }
}

/// Setzt den Status-Hinweis für den Benutzer.
pub fn set_status_hint(state: &mut AppState, hint: impl Into<String>) {
    state.presentation.status_hint = Some(hint.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::area::DEFAULT_GRANULARITY;
    use crate::core::{Cartographic, Measurement, MeasurementKind};
    use crate::engine::RecordingEngine;
    use crate::host::{HostModel, InMemoryHost};

    fn state_with_distance(meters_east: f64) -> AppState {
        let mut state = AppState::default();
        let dlon = meters_east / 111_319.49;
        state.registry.push(Measurement::new(
            MeasurementKind::Distance,
            vec![Cartographic::new(0.0, 0.0, 0.0), Cartographic::new(dlon, 0.0, 0.0)],
            "Distance 1".into(),
            DEFAULT_GRANULARITY,
        ));
        state
    }

    #[test]
    fn rows_show_formatted_value_and_point_count() {
        let mut state = state_with_distance(1500.0);
        rebuild_rows(&mut state);

        let row = &state.presentation.rows[0];
        assert_eq!(row.name, "Distance 1");
        assert_eq!(row.value_text, "1.50 km");
        assert_eq!(row.point_count, 2);
        assert_eq!(state.presentation.revision, state.registry.revision());
    }

    #[test]
    fn rename_trims_and_publishes() {
        let mut state = state_with_distance(10.0);
        let mut engine = RecordingEngine::new();
        let mut host = InMemoryHost::with_defaults();

        rename(&mut state, &mut Ports::new(&mut engine, &mut host), 0, "  Zaun  ").unwrap();

        assert_eq!(state.presentation.rows[0].name, "Zaun");
        let published = host.get("measurementResults").unwrap();
        assert_eq!(published[0]["name"], "Zaun");
        assert_eq!(host.save_count(), 1);
    }

    #[test]
    fn empty_name_is_rejected_without_host_write() {
        let mut state = state_with_distance(10.0);
        let mut engine = RecordingEngine::new();
        let mut host = InMemoryHost::with_defaults();

        rename(&mut state, &mut Ports::new(&mut engine, &mut host), 0, "   ").unwrap();

        assert_eq!(state.registry.get(0).unwrap().name, "Distance 1");
        assert_eq!(host.save_count(), 0);
    }
}
