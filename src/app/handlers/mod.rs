//! Feature-Handler für AppCommand-Verarbeitung.
//!
//! Jeder Handler gruppiert die Command-Ausführung eines Feature-Bereichs.
//! Der Controller dispatcht an die passende Handler-Funktion.

pub mod camera;
pub mod edit;
pub mod measurement;
pub mod picking;
pub mod registry;
pub mod sync;
