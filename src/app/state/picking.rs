use crate::core::{PickedPoint, PointPickingConfig};

/// Zustand des Punkt-Picking-Modus (Kalibrierung).
#[derive(Debug, Clone, Default)]
pub struct PointPickingState {
    pub enabled: bool,
    pub config: PointPickingConfig,
    /// Gespiegelte Liste (`pickedPoints`)
    pub points: Vec<PickedPoint>,
}
