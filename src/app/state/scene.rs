use indexmap::IndexMap;

use crate::engine::{EntityHandle, TerrainRequestId};

/// Engine-Entities einer Messung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementVisuals {
    /// Ein Marker pro Punkt, in Punkt-Reihenfolge
    pub markers: Vec<EntityHandle>,
    /// Linien und Polygone
    pub lines: Vec<EntityHandle>,
    pub labels: Vec<EntityHandle>,
    /// Offene Terrain-Abfrage für das Flächen-Label
    pub pending_label: Option<TerrainRequestId>,
}

impl MeasurementVisuals {
    /// Alle Entity-Handles dieser Messung.
    pub fn handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.markers
            .iter()
            .chain(self.lines.iter())
            .chain(self.labels.iter())
            .copied()
    }
}

/// Alle vom Core erzeugten Scene-Entities.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    /// Parallel zur Registry
    pub visuals: Vec<MeasurementVisuals>,
    /// Marker und Label je gepicktem Punkt (nach ID)
    pub picked: IndexMap<String, Vec<EntityHandle>>,
}

impl SceneState {
    /// Flache Marker-Liste über alle Messungen.
    pub fn flat_markers(&self) -> Vec<EntityHandle> {
        self.visuals
            .iter()
            .flat_map(|v| v.markers.iter().copied())
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.visuals.iter().map(|v| v.handles().count()).sum::<usize>()
            + self.picked.values().map(Vec::len).sum::<usize>()
    }
}
