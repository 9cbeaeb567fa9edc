//! Anzeige-Formatierung von Messwerten (m / km, m² / km²).

use super::measurement::MeasurementKind;

/// Schwelle für die Umschaltung Meter → Kilometer.
const KILO_THRESHOLD: f64 = 1_000.0;
/// Schwelle für die Umschaltung m² → km².
const SQUARE_KILO_THRESHOLD: f64 = 1_000_000.0;

/// Rundet auf die zwei angezeigten Nachkommastellen.
fn displayed(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formatiert eine Distanz: `< 1000` in m, sonst in km (jeweils 2 Nachkommastellen).
///
/// Die Schwelle gilt für den gerundeten Wert, `999.996` wird also `1.00 km`.
pub fn format_distance(meters: f64) -> String {
    if displayed(meters) >= KILO_THRESHOLD {
        format!("{:.2} km", meters / KILO_THRESHOLD)
    } else {
        format!("{:.2} m", meters)
    }
}

/// Formatiert eine Fläche: `< 1 000 000` in m², sonst in km².
pub fn format_area(square_meters: f64) -> String {
    if displayed(square_meters) >= SQUARE_KILO_THRESHOLD {
        format!("{:.2} km²", square_meters / SQUARE_KILO_THRESHOLD)
    } else {
        format!("{:.2} m²", square_meters)
    }
}

/// Formatiert einen Messwert passend zur Messart.
pub fn format_measurement_value(kind: MeasurementKind, value: f64) -> String {
    match kind {
        MeasurementKind::Area => format_area(value),
        MeasurementKind::Distance | MeasurementKind::MultiDistance | MeasurementKind::Height => {
            format_distance(value)
        }
    }
}
