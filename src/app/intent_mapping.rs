//! Mapping von Host-/Engine-/Panel-Intents auf mutierende App-Commands.

use super::state::SessionPhase;
use super::{AppCommand, AppIntent, AppState};
use crate::engine::PickingHandlerKind;
use crate::host::HostProperty;
use serde_json::Value;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::Tick { now_ms } => vec![
            AppCommand::AdvanceClock { now_ms },
            AppCommand::FlushDebouncers,
        ],
        AppIntent::HostPropertyChanged { property, value } => map_host_change(property, value),
        AppIntent::CameraMoved { pose } => {
            if state.sync.enabled {
                vec![AppCommand::QueueCameraPublish { pose }]
            } else {
                vec![]
            }
        }
        AppIntent::PrimaryClick { screen } => match state.picking_slot.kind() {
            Some(PickingHandlerKind::PointPicking) => vec![AppCommand::PickPoint { screen }],
            Some(PickingHandlerKind::Edit) => vec![AppCommand::EditClick { screen }],
            Some(PickingHandlerKind::Measurement) => {
                vec![AppCommand::AddMeasurementPoint { screen }]
            }
            None => vec![],
        },
        AppIntent::SecondaryClick { .. } => {
            let collecting = matches!(state.session.phase, SessionPhase::Collecting { .. });
            if collecting && state.picking_slot.kind() == Some(PickingHandlerKind::Measurement) {
                vec![AppCommand::EndMeasurement]
            } else {
                vec![]
            }
        }
        AppIntent::PointerDown { screen } => {
            let can_drag = state
                .edit
                .as_ref()
                .is_some_and(|e| !e.add_point_mode && e.selected.is_some());
            if can_drag {
                vec![AppCommand::BeginPointDrag { screen }]
            } else {
                vec![]
            }
        }
        AppIntent::PointerMove { screen } => {
            if state.edit.as_ref().is_some_and(|e| e.dragging) {
                vec![AppCommand::DragPoint { screen }]
            } else {
                vec![]
            }
        }
        AppIntent::PointerUp { screen } => {
            if state.edit.as_ref().is_some_and(|e| e.dragging) {
                vec![AppCommand::EndPointDrag { screen }]
            } else {
                vec![]
            }
        }
        AppIntent::TerrainSampled { request, result } => {
            vec![AppCommand::PlaceAreaLabel { request, result }]
        }
        AppIntent::MeasurementModeSelected { mode } => vec![AppCommand::SetMeasurementMode {
            mode,
            publish: true,
        }],
        AppIntent::ClearMeasurementsRequested => vec![AppCommand::ClearMeasurements],
        AppIntent::EditModeToggled { enabled } => vec![AppCommand::SetEditMode { enabled }],
        AppIntent::AddPointModeToggled { enabled } => {
            if state.is_editing() {
                vec![AppCommand::SetAddPointMode { enabled }]
            } else {
                vec![]
            }
        }
        AppIntent::CoordinateEditCommitted { fields } => {
            vec![AppCommand::CommitCoordinateEdit { fields }]
        }
        AppIntent::RenameRequested { index, name } => {
            vec![AppCommand::RenameMeasurement { index, name }]
        }
        AppIntent::FocusRequested { index } => vec![AppCommand::FocusMeasurement { index }],
    }
}

fn map_host_change(property: HostProperty, value: Value) -> Vec<AppCommand> {
    match property {
        HostProperty::CameraSyncEnabled => vec![AppCommand::SetCameraSyncEnabled {
            enabled: value.as_bool().unwrap_or(false),
        }],
        HostProperty::CameraCommand => vec![AppCommand::ExecuteCameraCommand { payload: value }],
        HostProperty::MeasurementMode => vec![AppCommand::ApplyHostMeasurementMode { value }],
        HostProperty::MeasurementResults => vec![AppCommand::ApplyHostRegistry { value }],
        HostProperty::LoadMeasurementsTrigger => vec![AppCommand::LoadSnapshot { payload: value }],
        HostProperty::FocusMeasurementTrigger => {
            vec![AppCommand::ApplyFocusTrigger { payload: value }]
        }
        HostProperty::ShowMeasurementTools => vec![AppCommand::SetToolVisibility {
            tools: value.as_bool(),
            list: None,
        }],
        HostProperty::ShowMeasurementsList => vec![AppCommand::SetToolVisibility {
            tools: None,
            list: value.as_bool(),
        }],
        HostProperty::PickedPoints => vec![AppCommand::ApplyHostPickedPoints { payload: value }],
        HostProperty::PointPickingMode => vec![AppCommand::SetPointPickingMode {
            enabled: value.as_bool().unwrap_or(false),
            publish: false,
        }],
        HostProperty::PointPickingConfig => {
            vec![AppCommand::SetPointPickingConfig { payload: value }]
        }
        HostProperty::DebugLogging => vec![AppCommand::SetDebugLogging {
            enabled: value.as_bool().unwrap_or(false),
        }],
        HostProperty::Latitude
        | HostProperty::Longitude
        | HostProperty::Altitude
        | HostProperty::Heading
        | HostProperty::Pitch
        | HostProperty::Roll => vec![AppCommand::ScheduleHostCameraApply],
    }
}
