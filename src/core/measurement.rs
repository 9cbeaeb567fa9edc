//! Messungs-Records und Wertberechnung je Messart.

use serde::{Deserialize, Serialize};

use super::area::geodesic_polygon_area;
use super::geo::{chord_distance, polyline_length, Cartographic};
use super::ValidationError;

/// Art einer Messung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    /// Zwei-Punkt-Distanz (Sehne)
    #[serde(rename = "distance")]
    Distance,
    /// Polylinie mit beliebig vielen Punkten
    #[serde(rename = "multi-distance")]
    MultiDistance,
    /// Vertikale Höhe über Gelände
    #[serde(rename = "height")]
    Height,
    /// Geschlossenes Polygon
    #[serde(rename = "area")]
    Area,
}

impl MeasurementKind {
    /// Alle Messarten in Toolbar-Reihenfolge.
    pub const ALL: [MeasurementKind; 4] = [
        MeasurementKind::Distance,
        MeasurementKind::MultiDistance,
        MeasurementKind::Height,
        MeasurementKind::Area,
    ];

    /// Anzeigename für Default-Namen ("Distance 1", "Area 2", …).
    pub fn label(self) -> &'static str {
        match self {
            MeasurementKind::Distance => "Distance",
            MeasurementKind::MultiDistance => "Multi-Distance",
            MeasurementKind::Height => "Height",
            MeasurementKind::Area => "Area",
        }
    }

    /// Bezeichner im Host-Modell.
    pub fn wire_name(self) -> &'static str {
        match self {
            MeasurementKind::Distance => "distance",
            MeasurementKind::MultiDistance => "multi-distance",
            MeasurementKind::Height => "height",
            MeasurementKind::Area => "area",
        }
    }

    /// Mindestanzahl gespeicherter Punkte eines fertigen Records.
    pub fn min_points(self) -> usize {
        match self {
            MeasurementKind::Area => 3,
            _ => 2,
        }
    }

    /// Offene Messarten sammeln Punkte bis zu einem expliziten Ende.
    pub fn is_open_ended(self) -> bool {
        matches!(self, MeasurementKind::MultiDistance | MeasurementKind::Area)
    }

    /// Parst den Host-Bezeichner.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.wire_name() == name)
    }
}

impl std::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Aktiver Messmodus (`None` = kein Werkzeug aktiv, Host-Wert `""`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasurementMode(pub Option<MeasurementKind>);

impl MeasurementMode {
    /// Kein Messwerkzeug aktiv.
    pub const OFF: MeasurementMode = MeasurementMode(None);

    /// Parst den Host-String; leer = aus, unbekannt = `InvalidMode`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::OFF);
        }
        MeasurementKind::from_wire(trimmed)
            .map(|k| Self(Some(k)))
            .ok_or_else(|| ValidationError::InvalidMode(trimmed.to_string()))
    }

    /// Host-String des Modus.
    pub fn as_wire(self) -> &'static str {
        self.0.map(MeasurementKind::wire_name).unwrap_or("")
    }

    pub fn kind(self) -> Option<MeasurementKind> {
        self.0
    }

    pub fn is_off(self) -> bool {
        self.0.is_none()
    }
}

/// Ein Mess-Record der Registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Messart
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
    /// Punkte in Klick-Reihenfolge (Höhe: `[boden, gepickt]`)
    #[serde(default)]
    pub points: Vec<Cartographic>,
    /// Messwert in m bzw. m²
    #[serde(default)]
    pub value: f64,
    /// Anzeigename
    #[serde(default)]
    pub name: String,
    /// Nimmt noch Punkte an (nur offene Messarten)
    #[serde(default)]
    pub is_active: bool,
}

impl Measurement {
    /// Erstellt einen Record und berechnet den Wert.
    pub fn new(kind: MeasurementKind, points: Vec<Cartographic>, name: String, granularity: f64) -> Self {
        let mut measurement = Self {
            kind,
            points,
            value: 0.0,
            name,
            is_active: false,
        };
        measurement.recompute(granularity);
        measurement
    }

    /// Berechnet den Messwert aus den aktuellen Punkten neu.
    pub fn recompute(&mut self, granularity: f64) {
        self.value = compute_value(self.kind, &self.points, granularity);
    }

    /// Prüft die Mindestpunktzahl.
    pub fn validate_points(&self) -> Result<(), ValidationError> {
        let required = self.kind.min_points();
        if self.points.len() < required {
            return Err(ValidationError::TooFewPoints {
                kind: self.kind.label(),
                required,
                actual: self.points.len(),
            });
        }
        Ok(())
    }

    /// Kanten als Index-Paare; Flächen enthalten die schließende Kante.
    pub fn segments(&self) -> Vec<(usize, usize)> {
        segments_of(self.kind, self.points.len())
    }
}

/// Kanten einer Punktfolge (Fläche: inkl. Kante letzter → erster Punkt).
pub fn segments_of(kind: MeasurementKind, point_count: usize) -> Vec<(usize, usize)> {
    if point_count < 2 {
        return Vec::new();
    }
    let mut segments: Vec<(usize, usize)> = (0..point_count - 1).map(|i| (i, i + 1)).collect();
    if kind == MeasurementKind::Area && point_count >= 3 {
        segments.push((point_count - 1, 0));
    }
    segments
}

/// Berechnet den Messwert für eine Messart.
pub fn compute_value(kind: MeasurementKind, points: &[Cartographic], granularity: f64) -> f64 {
    match kind {
        MeasurementKind::Distance => match points {
            [a, b, ..] => chord_distance(a, b),
            _ => 0.0,
        },
        MeasurementKind::MultiDistance => polyline_length(points),
        MeasurementKind::Height => match points {
            [ground, picked, ..] => (picked.altitude - ground.altitude).abs(),
            _ => 0.0,
        },
        MeasurementKind::Area => geodesic_polygon_area(points, granularity),
    }
}
