//! Geordnete Registry aller Mess-Records.
//!
//! Das Host-Modell ist Eigentümer der Liste; die Registry ist die lokale
//! Spiegelung. Jede Mutation erhöht die `revision`; die Mess-Liste merkt sich,
//! auf welcher Revision ihre Zeilen beruhen.

use serde::{Deserialize, Serialize};

use super::geo::Cartographic;
use super::measurement::{Measurement, MeasurementKind};
use super::ValidationError;

/// Eintrag eines Snapshots: Messart und Punkte als `[lon, lat, alt]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
    pub points: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SnapshotEntry {
    /// Prüft Punkte und baut einen fertigen (inaktiven) Record.
    pub fn to_measurement(
        &self,
        default_name: String,
        granularity: f64,
    ) -> Result<Measurement, ValidationError> {
        let points: Vec<Cartographic> = self
            .points
            .iter()
            .map(|&triple| Cartographic::from_triple(triple))
            .collect();
        for point in &points {
            point.validate()?;
        }
        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(default_name);
        let measurement = Measurement::new(self.kind, points, name, granularity);
        measurement.validate_points()?;
        Ok(measurement)
    }
}

/// Payload von `loadMeasurementsTrigger`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSnapshot {
    #[serde(default)]
    pub measurements: Vec<SnapshotEntry>,
    /// Token, damit gleiche Payloads erneut auslösen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}

/// Geordnete Mess-Registry mit Revisionszähler.
#[derive(Debug, Clone, Default)]
pub struct MeasurementRegistry {
    entries: Vec<Measurement>,
    revision: u64,
}

impl MeasurementRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Measurement> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Measurement] {
        &self.entries
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Index des aktiven (unfertigen) Records; nur das letzte Element kann aktiv sein.
    pub fn active_index(&self) -> Option<usize> {
        self.entries
            .last()
            .filter(|m| m.is_active)
            .map(|_| self.entries.len() - 1)
    }

    /// Default-Name `"{Label} {n}"`, n = Anzahl bisheriger Records dieser Art + 1.
    pub fn next_default_name(&self, kind: MeasurementKind) -> String {
        let ordinal = self.entries.iter().filter(|m| m.kind == kind).count() + 1;
        format!("{} {}", kind.label(), ordinal)
    }

    /// Hängt einen Record an und gibt seinen Index zurück.
    ///
    /// Ein vorher aktiver Record wird dabei abgeschlossen, damit höchstens
    /// das letzte Element aktiv ist.
    pub fn push(&mut self, measurement: Measurement) -> usize {
        if let Some(last) = self.entries.last_mut() {
            last.is_active = false;
        }
        self.entries.push(measurement);
        self.bump();
        self.entries.len() - 1
    }

    /// Mutiert einen Record in-place.
    pub fn update<R>(&mut self, index: usize, f: impl FnOnce(&mut Measurement) -> R) -> Option<R> {
        let entry = self.entries.get_mut(index)?;
        let result = f(entry);
        self.bump();
        Some(result)
    }

    /// Entfernt den letzten Record, falls er noch aktiv ist (Verwerfen einer laufenden Messung).
    pub fn discard_active(&mut self) -> Option<Measurement> {
        self.active_index()?;
        let removed = self.entries.pop();
        self.bump();
        removed
    }

    /// Ersetzt den gesamten Inhalt (externer Schreibvorgang oder Snapshot-Reload).
    pub fn replace_all(&mut self, entries: Vec<Measurement>) {
        self.entries = entries;
        self.bump();
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    /// Benennt einen Record um; leere Namen werden abgelehnt.
    pub fn rename(&mut self, index: usize, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || index >= self.entries.len() {
            return false;
        }
        self.update(index, |m| m.name = trimmed.to_string());
        true
    }

    /// Summe der Punkte aller Records (Länge der flachen Marker-Liste).
    pub fn total_points(&self) -> usize {
        self.entries.iter().map(|m| m.points.len()).sum()
    }

    /// Löst einen Index der flachen Marker-Liste in (Messung, Punkt) auf.
    pub fn resolve_flat_index(&self, flat: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (measurement_index, m) in self.entries.iter().enumerate() {
            if flat < offset + m.points.len() {
                return Some((measurement_index, flat - offset));
            }
            offset += m.points.len();
        }
        None
    }

    /// Exportiert den Inhalt als Snapshot-Einträge.
    pub fn to_snapshot(&self) -> Vec<SnapshotEntry> {
        self.entries
            .iter()
            .map(|m| SnapshotEntry {
                kind: m.kind,
                points: m.points.iter().map(|p| p.to_triple()).collect(),
                name: Some(m.name.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::area::DEFAULT_GRANULARITY;

    fn record(kind: MeasurementKind, n: usize, active: bool) -> Measurement {
        let points = (0..n)
            .map(|i| Cartographic::new(i as f64 * 0.001, 0.0, 0.0))
            .collect();
        let mut m = Measurement::new(kind, points, String::new(), DEFAULT_GRANULARITY);
        m.is_active = active;
        m
    }

    #[test]
    fn default_names_count_per_kind() {
        let mut reg = MeasurementRegistry::new();
        assert_eq!(reg.next_default_name(MeasurementKind::Distance), "Distance 1");
        reg.push(record(MeasurementKind::Distance, 2, false));
        reg.push(record(MeasurementKind::Area, 3, false));
        assert_eq!(reg.next_default_name(MeasurementKind::Distance), "Distance 2");
        assert_eq!(reg.next_default_name(MeasurementKind::Area), "Area 2");
        assert_eq!(
            reg.next_default_name(MeasurementKind::MultiDistance),
            "Multi-Distance 1"
        );
    }

    #[test]
    fn push_finalizes_previous_active_record() {
        let mut reg = MeasurementRegistry::new();
        reg.push(record(MeasurementKind::MultiDistance, 2, true));
        assert_eq!(reg.active_index(), Some(0));
        reg.push(record(MeasurementKind::Distance, 2, false));
        assert_eq!(reg.active_index(), None);
        assert!(reg.iter().all(|m| !m.is_active));
    }

    #[test]
    fn flat_index_resolution_walks_point_counts() {
        let mut reg = MeasurementRegistry::new();
        reg.push(record(MeasurementKind::Distance, 2, false));
        reg.push(record(MeasurementKind::Area, 4, false));
        assert_eq!(reg.resolve_flat_index(0), Some((0, 0)));
        assert_eq!(reg.resolve_flat_index(1), Some((0, 1)));
        assert_eq!(reg.resolve_flat_index(2), Some((1, 0)));
        assert_eq!(reg.resolve_flat_index(5), Some((1, 3)));
        assert_eq!(reg.resolve_flat_index(6), None);
    }

    #[test]
    fn rename_rejects_empty_and_bumps_revision() {
        let mut reg = MeasurementRegistry::new();
        reg.push(record(MeasurementKind::Distance, 2, false));
        let rev = reg.revision();
        assert!(!reg.rename(0, "   "));
        assert_eq!(reg.revision(), rev);
        assert!(reg.rename(0, " Zaun "));
        assert_eq!(reg.get(0).unwrap().name, "Zaun");
        assert!(reg.revision() > rev);
    }

    #[test]
    fn snapshot_entry_rejects_too_few_points() {
        let entry = SnapshotEntry {
            kind: MeasurementKind::Area,
            points: vec![[0.0, 0.0, 0.0], [0.001, 0.0, 0.0]],
            name: None,
        };
        assert!(entry
            .to_measurement("Area 1".into(), DEFAULT_GRANULARITY)
            .is_err());
    }

    #[test]
    fn snapshot_payload_parses_host_shape() {
        let json = serde_json::json!({
            "measurements": [
                {"type": "distance", "points": [[-122.4, 37.8, 10.0], [-122.41, 37.81, 12.0]]}
            ],
            "timestamp": 1700000000000.0
        });
        let snapshot: MeasurementSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.measurements.len(), 1);
        assert_eq!(snapshot.measurements[0].kind, MeasurementKind::Distance);
        assert_eq!(snapshot.measurements[0].points[1], [-122.41, 37.81, 12.0]);
    }
}
