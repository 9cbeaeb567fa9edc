use glam::Vec2;
use serde_json::Value;

use crate::app::state::CoordinateFields;
use crate::core::{CameraPose, MeasurementMode};
use crate::engine::TerrainRequestId;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // === Zeit & Sync ===
    /// Interne Uhr setzen
    AdvanceClock { now_ms: u64 },
    /// Fällige Debounce-Fenster abarbeiten
    FlushDebouncers,
    /// Kamera-Felder vom Host vormerken (Sammelfenster)
    ScheduleHostCameraApply,
    /// Host-Pose ohne Fenster übernehmen
    ApplyHostCamera,
    /// Kamera-Pose an den Host melden (trailing debounce)
    QueueCameraPublish { pose: CameraPose },
    SetCameraSyncEnabled { enabled: bool },
    /// `cameraCommand`-Payload ausführen
    ExecuteCameraCommand { payload: Value },

    // === Messung ===
    /// Host-String für `measurementMode` übernehmen
    ApplyHostMeasurementMode { value: Value },
    /// Messmodus wechseln; `publish` schreibt ihn an den Host zurück
    SetMeasurementMode { mode: MeasurementMode, publish: bool },
    AddMeasurementPoint { screen: Vec2 },
    /// Offene Messung abschließen (Rechtsklick)
    EndMeasurement,
    ClearMeasurements,

    // === Registry & Präsentation ===
    /// Extern geschriebenes `measurementResults` übernehmen
    ApplyHostRegistry { value: Value },
    /// `loadMeasurementsTrigger`-Payload laden
    LoadSnapshot { payload: Value },
    /// `focusMeasurementTrigger`-Payload auswerten
    ApplyFocusTrigger { payload: Value },
    FocusMeasurement { index: usize },
    RenameMeasurement { index: usize, name: String },
    /// Async-Ergebnis für ein Flächen-Label
    PlaceAreaLabel {
        request: TerrainRequestId,
        result: Result<f64, String>,
    },
    SetToolVisibility {
        tools: Option<bool>,
        list: Option<bool>,
    },
    SetDebugLogging { enabled: bool },

    // === Bearbeiten ===
    SetEditMode { enabled: bool },
    SetAddPointMode { enabled: bool },
    /// Klick im Bearbeiten-Modus (Selektion oder Einfügen)
    EditClick { screen: Vec2 },
    BeginPointDrag { screen: Vec2 },
    DragPoint { screen: Vec2 },
    EndPointDrag { screen: Vec2 },
    CommitCoordinateEdit { fields: CoordinateFields },

    // === Punkt-Picking ===
    SetPointPickingMode { enabled: bool, publish: bool },
    SetPointPickingConfig { payload: Value },
    PickPoint { screen: Vec2 },
    ApplyHostPickedPoints { payload: Value },
}
