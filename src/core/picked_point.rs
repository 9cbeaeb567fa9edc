//! Gepickte Kalibrierpunkte (Passpunkte) und deren Picking-Konfiguration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Präfix der vergebenen Punkt-IDs.
const ID_PREFIX: &str = "pt-";

/// Ein gepickter Punkt, wie er an den Host gespiegelt wird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickedPoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Höhe über Ellipsoid (Pick-Ergebnis)
    pub altitude_ellipsoidal: f64,
    /// Geländehöhe der Engine, sonst ellipsoidische Höhe
    pub altitude_approx: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub label: String,
    /// Millisekunden seit Sitzungsbeginn
    #[serde(default)]
    pub timestamp: f64,
}

/// Konfiguration des Punkt-Picking-Modus (`pointPickingConfig`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointPickingConfig {
    /// CSS-Farbe der Marker
    pub color: String,
    /// Präfix für Labels ("GCP" → "GCP 1", "GCP 2", …)
    pub label_prefix: String,
    /// Markergröße in Pixeln
    pub point_size: f32,
    /// `false` = Modus beendet sich nach einem Pick
    pub continuous: bool,
}

impl Default for PointPickingConfig {
    fn default() -> Self {
        Self {
            color: "red".to_string(),
            label_prefix: "GCP".to_string(),
            point_size: 10.0,
            continuous: true,
        }
    }
}

/// Numerischer Anteil einer `pt-{n}`-ID.
fn id_number(id: &str) -> Option<u64> {
    id.strip_prefix(ID_PREFIX)?.parse().ok()
}

/// Nächste freie ID: strikt größer als alle bekannten `pt-{n}`.
pub fn next_point_id<'a>(known: impl IntoIterator<Item = &'a PickedPoint>) -> String {
    let max = known
        .into_iter()
        .filter_map(|p| id_number(&p.id))
        .max()
        .unwrap_or(0);
    format!("{}{}", ID_PREFIX, max + 1)
}

/// IDs aus `previous`, die in `incoming` fehlen (vom Host entfernt).
pub fn removed_ids(previous: &[PickedPoint], incoming: &[PickedPoint]) -> Vec<String> {
    let keep: HashSet<&str> = incoming.iter().map(|p| p.id.as_str()).collect();
    previous
        .iter()
        .filter(|p| !keep.contains(p.id.as_str()))
        .map(|p| p.id.clone())
        .collect()
}

/// Einträge aus `incoming`, die in `previous` noch nicht existieren.
pub fn added_points<'a>(previous: &[PickedPoint], incoming: &'a [PickedPoint]) -> Vec<&'a PickedPoint> {
    let known: HashSet<&str> = previous.iter().map(|p| p.id.as_str()).collect();
    incoming
        .iter()
        .filter(|p| !known.contains(p.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str) -> PickedPoint {
        PickedPoint {
            id: id.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            altitude_ellipsoidal: 0.0,
            altitude_approx: 0.0,
            color: String::new(),
            label: String::new(),
            timestamp: 0.0,
        }
    }

    #[test]
    fn next_id_skips_past_highest_known() {
        assert_eq!(next_point_id(&[]), "pt-1");
        let pts = vec![point("pt-3"), point("manual"), point("pt-7")];
        assert_eq!(next_point_id(&pts), "pt-8");
    }

    #[test]
    fn id_diff_reports_removed_and_added() {
        let old = vec![point("pt-1"), point("pt-2"), point("pt-3")];
        let new = vec![point("pt-1"), point("pt-3"), point("pt-9")];
        assert_eq!(removed_ids(&old, &new), vec!["pt-2".to_string()]);
        let added: Vec<&str> = added_points(&old, &new).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(added, vec!["pt-9"]);
    }

    #[test]
    fn config_uses_camel_case_and_defaults() {
        let cfg: PointPickingConfig =
            serde_json::from_value(serde_json::json!({"labelPrefix": "P", "continuous": false}))
                .unwrap();
        assert_eq!(cfg.label_prefix, "P");
        assert!(!cfg.continuous);
        assert_eq!(cfg.color, "red");
    }
}
