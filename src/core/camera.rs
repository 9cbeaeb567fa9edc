//! Kamera-Pose (Position + Orientierung) wie sie zwischen Host und Engine gespiegelt wird.

use serde::{Deserialize, Serialize};

use super::geo::Cartographic;
use super::ValidationError;

/// Kamera-Pose: Position in Grad/Metern, Orientierung in Grad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Breitengrad in Grad
    pub latitude: f64,
    /// Längengrad in Grad
    pub longitude: f64,
    /// Höhe über Ellipsoid in Metern
    pub altitude: f64,
    /// Kurs in Grad (0 = Nord)
    pub heading: f64,
    /// Neigung in Grad (negativ = nach unten)
    pub pitch: f64,
    /// Rollwinkel in Grad
    pub roll: f64,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            latitude: 37.655,
            longitude: -122.4175,
            altitude: 400.0,
            heading: 0.0,
            pitch: -15.0,
            roll: 0.0,
        }
    }
}

impl CameraPose {
    /// Position der Kamera als kartographischer Punkt.
    pub fn position(&self) -> Cartographic {
        Cartographic::new(self.longitude, self.latitude, self.altitude)
    }

    /// Prüft alle Felder auf Endlichkeit und den Breitengrad auf [-90, 90].
    pub fn validate(&self) -> Result<(), ValidationError> {
        super::validate_finite("latitude", self.latitude)?;
        super::validate_finite("longitude", self.longitude)?;
        super::validate_finite("altitude", self.altitude)?;
        super::validate_finite("heading", self.heading)?;
        super::validate_finite("pitch", self.pitch)?;
        super::validate_finite("roll", self.roll)?;
        super::validate_latitude(self.latitude)
    }

    /// Vergleich mit Toleranz (verhindert Echo-Schreibvorgänge durch Rundung).
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.latitude - other.latitude).abs() <= epsilon
            && (self.longitude - other.longitude).abs() <= epsilon
            && (self.altitude - other.altitude).abs() <= epsilon
            && (self.heading - other.heading).abs() <= epsilon
            && (self.pitch - other.pitch).abs() <= epsilon
            && (self.roll - other.roll).abs() <= epsilon
    }
}

/// Orbit-Offset um einen Zielpunkt (Grad, Grad, Meter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingPitchRange {
    pub heading: f64,
    pub pitch: f64,
    pub range: f64,
}

impl HeadingPitchRange {
    pub fn new(heading: f64, pitch: f64, range: f64) -> Self {
        Self {
            heading,
            pitch,
            range,
        }
    }
}
