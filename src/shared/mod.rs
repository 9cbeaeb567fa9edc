//! Geteilte Konfiguration für alle Schichten (Optionen, Diagnose).

mod diagnostics;
pub mod options;

pub use diagnostics::Diagnostics;
pub use options::SessionOptions;
