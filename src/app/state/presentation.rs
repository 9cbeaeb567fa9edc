use crate::core::MeasurementKind;

use super::CoordinateFields;

/// Eine Zeile der Messungsliste.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationRow {
    pub index: usize,
    pub name: String,
    /// Formatierter Wert ("1.50 km")
    pub value_text: String,
    pub point_count: usize,
    pub kind: MeasurementKind,
}

/// Panel-Zustand (Toolbar, Liste, Statushinweis, Koordinaten-Editor).
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    pub rows: Vec<PresentationRow>,
    pub show_tools: bool,
    pub show_list: bool,
    /// Kurzer Hinweis für den Nutzer (z.B. nach einem Fehlpick)
    pub status_hint: Option<String>,
    /// Felder des selektierten Punkts im Bearbeiten-Modus
    pub coordinate_editor: Option<CoordinateFields>,
    /// Registry-Revision, aus der `rows` zuletzt abgeleitet wurden
    pub revision: u64,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            show_tools: true,
            show_list: true,
            status_hint: None,
            coordinate_editor: None,
            revision: 0,
        }
    }
}
