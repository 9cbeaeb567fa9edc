//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState, Ports};

/// Orchestriert Host-, Engine- und Panel-Events und Use-Cases auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(
        &mut self,
        state: &mut AppState,
        ports: &mut Ports,
        intent: AppIntent,
    ) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, ports, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        ports: &mut Ports,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Zeit & Sync ===
            AppCommand::AdvanceClock { now_ms } => handlers::sync::advance_clock(state, now_ms),
            AppCommand::FlushDebouncers => handlers::sync::flush(state, ports),
            AppCommand::ScheduleHostCameraApply => handlers::sync::schedule_host_camera_apply(state),
            AppCommand::ApplyHostCamera => handlers::sync::apply_host_camera(state, ports),
            AppCommand::QueueCameraPublish { pose } => {
                handlers::sync::queue_camera_publish(state, pose)
            }
            AppCommand::SetCameraSyncEnabled { enabled } => {
                handlers::sync::set_camera_sync_enabled(state, enabled)
            }
            AppCommand::ExecuteCameraCommand { payload } => {
                handlers::camera::execute(state, ports, payload)?
            }

            // === Messung ===
            AppCommand::ApplyHostMeasurementMode { value } => {
                handlers::measurement::apply_host_mode(state, ports, value)?
            }
            AppCommand::SetMeasurementMode { mode, publish } => {
                handlers::measurement::set_mode(state, ports, mode, publish)?
            }
            AppCommand::AddMeasurementPoint { screen } => {
                handlers::measurement::add_point(state, ports, screen)?
            }
            AppCommand::EndMeasurement => handlers::measurement::end(state, ports)?,
            AppCommand::ClearMeasurements => handlers::measurement::clear(state, ports)?,

            // === Registry & Präsentation ===
            AppCommand::ApplyHostRegistry { value } => {
                handlers::registry::apply_host_registry(state, ports, value)?
            }
            AppCommand::LoadSnapshot { payload } => {
                handlers::registry::load_snapshot(state, ports, payload)?
            }
            AppCommand::ApplyFocusTrigger { payload } => {
                handlers::registry::apply_focus_trigger(state, ports, payload)
            }
            AppCommand::FocusMeasurement { index } => {
                handlers::registry::focus(state, ports, index)
            }
            AppCommand::RenameMeasurement { index, name } => {
                handlers::registry::rename(state, ports, index, &name)?
            }
            AppCommand::PlaceAreaLabel { request, result } => {
                handlers::measurement::place_area_label(state, ports, request, result)
            }
            AppCommand::SetToolVisibility { tools, list } => {
                handlers::registry::set_tool_visibility(state, tools, list)
            }
            AppCommand::SetDebugLogging { enabled } => {
                handlers::sync::set_debug_logging(state, enabled)
            }

            // === Bearbeiten ===
            AppCommand::SetEditMode { enabled } => {
                handlers::edit::set_edit_mode(state, ports, enabled)?
            }
            AppCommand::SetAddPointMode { enabled } => {
                handlers::edit::set_add_point_mode(state, ports, enabled)
            }
            AppCommand::EditClick { screen } => handlers::edit::click(state, ports, screen)?,
            AppCommand::BeginPointDrag { screen } => {
                handlers::edit::begin_drag(state, ports, screen)
            }
            AppCommand::DragPoint { screen } => handlers::edit::drag(state, ports, screen),
            AppCommand::EndPointDrag { screen } => {
                handlers::edit::end_drag(state, ports, screen)?
            }
            AppCommand::CommitCoordinateEdit { fields } => {
                handlers::edit::commit_coordinates(state, ports, fields)?
            }

            // === Punkt-Picking ===
            AppCommand::SetPointPickingMode { enabled, publish } => {
                handlers::picking::set_mode(state, ports, enabled, publish)?
            }
            AppCommand::SetPointPickingConfig { payload } => {
                handlers::picking::set_config(state, payload)
            }
            AppCommand::PickPoint { screen } => handlers::picking::pick(state, ports, screen)?,
            AppCommand::ApplyHostPickedPoints { payload } => {
                handlers::picking::apply_host_points(state, ports, payload)
            }
        }

        Ok(())
    }
}
