//! Zentrale Laufzeit-Konfiguration der Visualisierungs-Sitzung.
//!
//! `SessionOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::MeasurementKind;

// ── Synchronisation ────────────────────────────────────────────────

/// Trailing-Debounce für Kamera → Host (ms).
pub const OUTBOUND_DEBOUNCE_MS: u64 = 500;
/// Sammelfenster für Host → Kamera (ms).
pub const INBOUND_DEBOUNCE_MS: u64 = 50;
/// Toleranz für Echo-Unterdrückung beim Kamera-Abgleich (Grad bzw. Meter).
pub const CAMERA_ECHO_EPSILON: f64 = 1e-7;

// ── Kamera-Commands ────────────────────────────────────────────────

/// Default-Strecke für move*/zoom* ohne Angabe.
pub const DEFAULT_MOVE_DISTANCE: f64 = 100.0;
/// Default-Winkel für rotate* ohne Angabe (Grad).
pub const DEFAULT_ROTATE_ANGLE: f64 = 15.0;
/// Default-Flugdauer für `flyTo` (Sekunden).
pub const DEFAULT_FLY_DURATION: f64 = 3.0;

// ── Messungen ──────────────────────────────────────────────────────

/// Markergröße in Pixeln.
pub const MARKER_PIXEL_SIZE: f32 = 8.0;
/// Markergröße im Bearbeiten-Modus.
pub const MARKER_PIXEL_SIZE_EDIT: f32 = 14.0;
/// Maximaler Abstand Klick ↔ Segment beim Punkt-Einfügen (Meter).
pub const ADD_POINT_THRESHOLD_M: f64 = 50.0;
/// Granularität der Flächen-Triangulierung (Radiant).
pub const AREA_GRANULARITY: f64 = crate::core::area::DEFAULT_GRANULARITY;

// ── Fokus ──────────────────────────────────────────────────────────

/// Neigung beim Fokussieren einer Messung (Grad).
pub const FOCUS_PITCH_DEG: f64 = -45.0;
/// Abstand = Radius × Faktor.
pub const FOCUS_RANGE_FACTOR: f64 = 3.0;
/// Mindestabstand beim Fokussieren (Meter).
pub const FOCUS_MIN_RANGE_M: f64 = 100.0;
/// Flugdauer beim Fokussieren (Sekunden).
pub const FOCUS_DURATION_S: f64 = 1.5;

// ── Farben (RGBA) ──────────────────────────────────────────────────

pub const DISTANCE_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
pub const MULTI_DISTANCE_COLOR: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
pub const HEIGHT_COLOR: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
pub const AREA_COLOR: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
/// Füllfarbe der Flächen-Polygone.
pub const AREA_FILL_COLOR: [f32; 4] = [1.0, 0.6, 0.1, 0.3];
/// Farbe des selektierten Punkts im Bearbeiten-Modus.
pub const SELECTED_POINT_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Sitzungs-Optionen.
/// Wird als `geo_measure_surface.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    // ── Sync ────────────────────────────────────────────────────
    /// Trailing-Debounce Kamera → Host (ms)
    pub outbound_debounce_ms: u64,
    /// Sammelfenster Host → Kamera (ms)
    pub inbound_debounce_ms: u64,

    // ── Kamera ──────────────────────────────────────────────────
    /// Default-Strecke für relative Bewegungen
    pub default_move_distance: f64,
    /// Default-Winkel für relative Rotationen (Grad)
    pub default_rotate_angle: f64,
    /// Default-Flugdauer (Sekunden)
    pub default_fly_duration: f64,

    // ── Messungen ───────────────────────────────────────────────
    pub marker_pixel_size: f32,
    pub marker_pixel_size_edit: f32,
    /// Maximaler Abstand für Punkt-Einfügen (Meter)
    pub add_point_threshold_m: f64,
    /// Flächen-Granularität (Radiant)
    pub area_granularity: f64,

    // ── Fokus ───────────────────────────────────────────────────
    pub focus_pitch_deg: f64,
    pub focus_range_factor: f64,
    pub focus_min_range_m: f64,
    pub focus_duration_s: f64,

    // ── Farben ──────────────────────────────────────────────────
    pub distance_color: [f32; 4],
    pub multi_distance_color: [f32; 4],
    pub height_color: [f32; 4],
    pub area_color: [f32; 4],
    pub area_fill_color: [f32; 4],
    pub selected_point_color: [f32; 4],
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            outbound_debounce_ms: OUTBOUND_DEBOUNCE_MS,
            inbound_debounce_ms: INBOUND_DEBOUNCE_MS,

            default_move_distance: DEFAULT_MOVE_DISTANCE,
            default_rotate_angle: DEFAULT_ROTATE_ANGLE,
            default_fly_duration: DEFAULT_FLY_DURATION,

            marker_pixel_size: MARKER_PIXEL_SIZE,
            marker_pixel_size_edit: MARKER_PIXEL_SIZE_EDIT,
            add_point_threshold_m: ADD_POINT_THRESHOLD_M,
            area_granularity: AREA_GRANULARITY,

            focus_pitch_deg: FOCUS_PITCH_DEG,
            focus_range_factor: FOCUS_RANGE_FACTOR,
            focus_min_range_m: FOCUS_MIN_RANGE_M,
            focus_duration_s: FOCUS_DURATION_S,

            distance_color: DISTANCE_COLOR,
            multi_distance_color: MULTI_DISTANCE_COLOR,
            height_color: HEIGHT_COLOR,
            area_color: AREA_COLOR,
            area_fill_color: AREA_FILL_COLOR,
            selected_point_color: SELECTED_POINT_COLOR,
        }
    }
}

impl SessionOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("geo-measure-replay"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("geo_measure_surface.toml")
    }

    /// Linienfarbe je Messart.
    pub fn color_for(&self, kind: MeasurementKind) -> [f32; 4] {
        match kind {
            MeasurementKind::Distance => self.distance_color,
            MeasurementKind::MultiDistance => self.multi_distance_color,
            MeasurementKind::Height => self.height_color,
            MeasurementKind::Area => self.area_color,
        }
    }

    /// Kamera-Abstand beim Fokussieren einer Bounding-Sphere.
    pub fn focus_range(&self, radius: f64) -> f64 {
        (radius * self.focus_range_factor).max(self.focus_min_range_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults_per_field() {
        let opts: SessionOptions = toml::from_str("outbound_debounce_ms = 250").unwrap();
        assert_eq!(opts.outbound_debounce_ms, 250);
        assert_eq!(opts.inbound_debounce_ms, INBOUND_DEBOUNCE_MS);
        assert_eq!(opts.marker_pixel_size_edit, MARKER_PIXEL_SIZE_EDIT);
    }

    #[test]
    fn toml_roundtrip_keeps_values() {
        let mut opts = SessionOptions::default();
        opts.add_point_threshold_m = 12.5;
        let text = toml::to_string_pretty(&opts).unwrap();
        let back: SessionOptions = toml::from_str(&text).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let opts = SessionOptions::load_from_file(std::path::Path::new(
            "/nonexistent/geo_measure_surface.toml",
        ));
        assert_eq!(opts, SessionOptions::default());
    }

    #[test]
    fn focus_range_has_a_floor() {
        let opts = SessionOptions::default();
        assert_eq!(opts.focus_range(10.0), FOCUS_MIN_RANGE_M);
        assert_eq!(opts.focus_range(1000.0), 3000.0);
    }
}
