use crate::core::Cartographic;

/// Verweis auf einen Punkt einer Messung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRef {
    pub measurement: usize,
    pub point: usize,
}

/// Editierbare Koordinatenfelder des selektierten Punkts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFields {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

impl From<Cartographic> for CoordinateFields {
    fn from(p: Cartographic) -> Self {
        Self {
            longitude: p.longitude,
            latitude: p.latitude,
            altitude: p.altitude,
        }
    }
}

impl From<CoordinateFields> for Cartographic {
    fn from(f: CoordinateFields) -> Self {
        Cartographic::new(f.longitude, f.latitude, f.altitude)
    }
}

/// Transienter Zustand des Bearbeiten-Modus; existiert nur während er aktiv ist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    pub selected: Option<PointRef>,
    /// Pointer gedrückt auf dem selektierten Marker
    pub dragging: bool,
    /// Klicks fügen Punkte in das nächste Segment ein
    pub add_point_mode: bool,
    /// Letzte Live-Position während des Drags
    pub drag_position: Option<Cartographic>,
}
