use crate::app::lifecycle::PickingSlot;
use crate::app::CommandLog;
use crate::core::MeasurementRegistry;
use crate::shared::{Diagnostics, SessionOptions};

use super::{
    CameraSyncState, EditSession, MeasurementSession, PointPickingState, PresentationState,
    SceneState,
};

/// Hauptzustand der Visualisierungs-Sitzung
pub struct AppState {
    /// Lokale Spiegelung von `measurementResults`
    pub registry: MeasurementRegistry,
    /// Laufende Messung
    pub session: MeasurementSession,
    /// Bearbeiten-Modus (None = aus)
    pub edit: Option<EditSession>,
    /// Vom Core erzeugte Engine-Entities
    pub scene: SceneState,
    /// Panel-Zustand
    pub presentation: PresentationState,
    /// Kamera-Sync und Trigger-Tokens
    pub sync: CameraSyncState,
    /// Kalibrierpunkte
    pub picking: PointPickingState,
    /// Exklusiver Picking-Handler-Slot der Engine
    pub picking_slot: PickingSlot,
    /// Laufzeit-Optionen
    pub options: SessionOptions,
    /// Log-Ausführlichkeit
    pub diagnostics: Diagnostics,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Zuletzt gemeldete Zeit in Millisekunden
    pub clock_ms: u64,
}

impl AppState {
    /// Erstellt einen leeren Zustand mit den angegebenen Optionen.
    pub fn new(options: SessionOptions, diagnostics: Diagnostics) -> Self {
        Self {
            registry: MeasurementRegistry::new(),
            session: MeasurementSession::new(),
            edit: None,
            scene: SceneState::default(),
            presentation: PresentationState::default(),
            sync: CameraSyncState::new(&options),
            picking: PointPickingState::default(),
            picking_slot: PickingSlot::new(),
            options,
            diagnostics,
            command_log: CommandLog::new(),
            clock_ms: 0,
        }
    }

    /// Ob der Bearbeiten-Modus aktiv ist.
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Markergröße passend zum aktuellen Modus.
    pub fn marker_size(&self) -> f32 {
        if self.is_editing() {
            self.options.marker_pixel_size_edit
        } else {
            self.options.marker_pixel_size
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionOptions::default(), Diagnostics::default())
    }
}
