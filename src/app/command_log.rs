//! Begrenztes Protokoll der ausgeführten Commands einer Oberfläche.
//!
//! Jeder Command, den `AppController::handle_command` ausführt, landet hier,
//! Uhr-Ticks ausgenommen. Nach dem Teardown wächst das Log nicht mehr; die
//! Flow-Tests prüfen darüber, dass späte Terrain-Ergebnisse und
//! Host-Trigger keine Wirkung mehr haben.

use super::AppCommand;

/// Speichert ausgeführte Commands in Ausführungsreihenfolge.
#[derive(Default)]
pub struct CommandLog {
    entries: Vec<AppCommand>,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;
}

impl CommandLog {
    /// Erstellt ein leeres Command-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Protokolliert einen Command; `AdvanceClock` kommt jeden Frame und
    /// wird übersprungen. Ist das Log voll, fällt die ältere Hälfte weg.
    pub fn record(&mut self, command: &AppCommand) {
        if matches!(command, AppCommand::AdvanceClock { .. }) {
            return;
        }
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(command.clone());
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Einträge, älteste zuerst.
    pub fn entries(&self) -> &[AppCommand] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_execution_order() {
        let mut log = CommandLog::new();
        log.record(&AppCommand::SetEditMode { enabled: true });
        log.record(&AppCommand::FlushDebouncers);
        log.record(&AppCommand::EndMeasurement);
        assert_eq!(
            log.entries(),
            &[
                AppCommand::SetEditMode { enabled: true },
                AppCommand::FlushDebouncers,
                AppCommand::EndMeasurement,
            ]
        );
    }

    #[test]
    fn log_is_bounded_and_skips_ticks() {
        let mut log = CommandLog::new();
        log.record(&AppCommand::AdvanceClock { now_ms: 5 });
        assert!(log.is_empty());
        for _ in 0..CommandLog::MAX_ENTRIES + 1 {
            log.record(&AppCommand::EndMeasurement);
        }
        assert_eq!(log.len(), CommandLog::MAX_ENTRIES / 2 + 1);
    }
}
