use glam::Vec2;
use serde_json::Value;

use crate::app::state::CoordinateFields;
use crate::core::{CameraPose, MeasurementMode};
use crate::engine::TerrainRequestId;
use crate::host::HostProperty;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus Host, Engine und Panel ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    /// Zeit ist fortgeschritten (treibt die Debouncer)
    Tick { now_ms: u64 },
    /// Gebundene Host-Property wurde extern geändert
    HostPropertyChanged { property: HostProperty, value: Value },
    /// Engine-Kamera hat sich bewegt
    CameraMoved { pose: CameraPose },
    /// Linksklick in der Scene
    PrimaryClick { screen: Vec2 },
    /// Rechtsklick in der Scene
    SecondaryClick { screen: Vec2 },
    PointerDown { screen: Vec2 },
    PointerMove { screen: Vec2 },
    PointerUp { screen: Vec2 },
    /// Terrain-Abfrage abgeschlossen
    TerrainSampled {
        request: TerrainRequestId,
        result: Result<f64, String>,
    },
    /// Messwerkzeug in der Toolbar gewählt
    MeasurementModeSelected { mode: MeasurementMode },
    /// "Alle löschen" in der Toolbar
    ClearMeasurementsRequested,
    /// Bearbeiten-Modus ein/aus
    EditModeToggled { enabled: bool },
    /// Punkt-Einfügen im Bearbeiten-Modus ein/aus
    AddPointModeToggled { enabled: bool },
    /// Koordinatenfelder des selektierten Punkts bestätigt
    CoordinateEditCommitted { fields: CoordinateFields },
    /// Messung in der Liste umbenannt
    RenameRequested { index: usize, name: String },
    /// Messung in der Liste angeklickt
    FocusRequested { index: usize },
}
