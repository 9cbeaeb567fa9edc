//! Log-Ausführlichkeit als expliziter Konfigurationswert.
//!
//! Wird beim Erzeugen der Oberfläche injiziert und über die Host-Property
//! `debugLogging` umgeschaltet.

use log::LevelFilter;

/// Prozessweite Log-Konfiguration mit Init/Set-Lebenszyklus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    verbose: bool,
    base_level: LevelFilter,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            verbose: false,
            base_level: LevelFilter::Info,
        }
    }
}

impl Diagnostics {
    /// Erstellt eine Konfiguration mit dem angegebenen Grund-Level.
    pub fn new(base_level: LevelFilter) -> Self {
        Self {
            verbose: false,
            base_level,
        }
    }

    /// Installiert `env_logger` (idempotent) und setzt das Grund-Level.
    ///
    /// Der Logger lässt alles bis `Trace` durch; die Ausführlichkeit regelt
    /// allein `log::set_max_level`.
    pub fn init(&self) {
        let result = env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Trace)
            .try_init();
        if result.is_err() {
            log::debug!("Logger bereits initialisiert");
        }
        log::set_max_level(self.effective_level());
    }

    /// Schaltet Debug-Logging ein oder aus.
    pub fn set_verbose(&mut self, verbose: bool) {
        if self.verbose == verbose {
            return;
        }
        self.verbose = verbose;
        log::set_max_level(self.effective_level());
        log::info!(
            "Debug-Logging {}",
            if verbose { "aktiviert" } else { "deaktiviert" }
        );
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Aktuell wirksames Level.
    pub fn effective_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug.max(self.base_level)
        } else {
            self.base_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level_to_debug() {
        let mut diag = Diagnostics::new(LevelFilter::Warn);
        assert_eq!(diag.effective_level(), LevelFilter::Warn);
        diag.set_verbose(true);
        assert!(diag.is_verbose());
        assert_eq!(diag.effective_level(), LevelFilter::Debug);
    }

    #[test]
    fn verbose_keeps_a_higher_base_level() {
        let mut diag = Diagnostics::new(LevelFilter::Trace);
        diag.set_verbose(true);
        assert_eq!(diag.effective_level(), LevelFilter::Trace);
    }
}
