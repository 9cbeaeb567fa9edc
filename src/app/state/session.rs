use crate::core::{Cartographic, MeasurementKind, MeasurementMode};
use crate::engine::EntityHandle;

/// Phase der laufenden Messung.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    /// Kein Messmodus aktiv
    #[default]
    Idle,
    /// Modus aktiv, noch kein Punkt gesetzt
    AwaitingPoint1,
    /// Distanz: erster Punkt gesetzt
    AwaitingPoint2 {
        first: Cartographic,
        marker: EntityHandle,
    },
    /// Multi-Distanz/Fläche: sammelt Punkte bis zum Ende-Signal
    Collecting {
        points: Vec<Cartographic>,
        /// Vorschau-Entities, solange noch kein Record existiert
        preview: Vec<EntityHandle>,
        /// Registry-Index des aktiven Records (ab Mindestpunktzahl)
        record: Option<usize>,
    },
}

/// Zustand der Mess-Session.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSession {
    /// Aktiver Modus (Host-Property `measurementMode`)
    pub mode: MeasurementMode,
    pub phase: SessionPhase,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<MeasurementKind> {
        self.mode.kind()
    }

    /// Ob gerade Geometrie gesammelt wird, die noch nicht abgeschlossen ist.
    pub fn has_in_progress(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::AwaitingPoint2 { .. } | SessionPhase::Collecting { .. }
        )
    }

    /// Grundphase für den aktuellen Modus.
    pub fn rest_phase(&self) -> SessionPhase {
        if self.mode.is_off() {
            SessionPhase::Idle
        } else {
            SessionPhase::AwaitingPoint1
        }
    }
}
