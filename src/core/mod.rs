//! Core-Domänentypen: Geodäsie, Kamera-Pose, Messungen, Registry, Formatierung.
//!
//! Der Core kennt weder die Render-Engine noch das Host-Modell.

pub mod area;
pub mod camera;
pub mod format;
pub mod geo;
/// Messungs-Datenmodell
///
/// - MeasurementKind: Distanz, Multi-Distanz, Höhe, Fläche
/// - Measurement: ein Mess-Record mit Punkten, Wert und Namen
/// - MeasurementMode: aktiver Messmodus aus Host-Sicht
pub mod measurement;
pub mod picked_point;
pub mod registry;

pub use area::geodesic_polygon_area;
pub use camera::{CameraPose, HeadingPitchRange};
pub use format::{format_area, format_distance, format_measurement_value};
pub use geo::{BoundingSphere, Cartographic};
pub use measurement::{Measurement, MeasurementKind, MeasurementMode};
pub use picked_point::{PickedPoint, PointPickingConfig};
pub use registry::{MeasurementRegistry, SnapshotEntry};

/// Validierungsfehler für numerische Eingaben und Modus-Strings.
///
/// Werden lokal abgelehnt und geloggt, nie an Engine oder Host weitergereicht.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Feld '{field}' ist nicht endlich")]
    NonFinite { field: &'static str },
    #[error("Breitengrad {0} außerhalb von [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Längengrad {0} außerhalb von [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Invalid mode '{0}'. Must be one of distance, multi-distance, height, area")]
    InvalidMode(String),
    #[error("{kind} benötigt mindestens {required} Punkte, erhalten: {actual}")]
    TooFewPoints {
        kind: &'static str,
        required: usize,
        actual: usize,
    },
}

/// Prüft, dass ein Wert endlich ist.
pub fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

/// Prüft den Breitengrad auf [-90, 90].
pub fn validate_latitude(latitude: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(ValidationError::LatitudeOutOfRange(latitude))
    }
}

/// Prüft den Längengrad auf [-180, 180].
pub fn validate_longitude(longitude: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(ValidationError::LongitudeOutOfRange(longitude))
    }
}
