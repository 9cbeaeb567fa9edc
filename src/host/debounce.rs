//! Zeitfenster-Debouncer für hochfrequente Property-Änderungen.
//!
//! Die Zeit wird von außen vorgegeben (`now_ms`), der Debouncer selbst
//! hält keine Uhr. Innerhalb eines Fensters gewinnt immer der letzte Wert.

/// Wann ein Fenster endet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePolicy {
    /// Der erste Wert öffnet ein festes Fenster; geliefert wird am Fensterende
    Fixed,
    /// Jeder neue Wert verschiebt das Ende
    Trailing,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    policy: DebouncePolicy,
    window_ms: u64,
    pending: Option<T>,
    window_end: Option<u64>,
}

impl<T> Debouncer<T> {
    pub fn new(policy: DebouncePolicy, window_ms: u64) -> Self {
        Self {
            policy,
            window_ms,
            pending: None,
            window_end: None,
        }
    }

    pub fn trailing(window_ms: u64) -> Self {
        Self::new(DebouncePolicy::Trailing, window_ms)
    }

    pub fn fixed(window_ms: u64) -> Self {
        Self::new(DebouncePolicy::Fixed, window_ms)
    }

    /// Nimmt einen neuen Wert an.
    pub fn push(&mut self, now_ms: u64, value: T) {
        self.pending = Some(value);
        match self.policy {
            DebouncePolicy::Trailing => {
                self.window_end = Some(now_ms.saturating_add(self.window_ms));
            }
            DebouncePolicy::Fixed => {
                if self.window_end.is_none() {
                    self.window_end = Some(now_ms.saturating_add(self.window_ms));
                }
            }
        }
    }

    /// Liefert den fälligen Wert, falls einer ansteht.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match self.window_end {
            Some(end) if now_ms >= end => {
                self.window_end = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Verwirft einen anstehenden Wert.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.window_end = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_window(&mut self, window_ms: u64) {
        self.window_ms = window_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_waits_for_quiet_window_and_keeps_last_value() {
        let mut d = Debouncer::trailing(500);
        d.push(0, 1);
        d.push(200, 2);
        d.push(400, 3);
        assert_eq!(d.poll(800), None);
        assert_eq!(d.poll(900), Some(3));
        assert_eq!(d.poll(2000), None);
    }

    #[test]
    fn fixed_window_delivers_nothing_before_its_end() {
        let mut d = Debouncer::fixed(50);
        d.push(100, "a");
        assert_eq!(d.poll(100), None);
        d.push(110, "b");
        d.push(140, "c");
        assert_eq!(d.poll(149), None);
        // Spätere Werte verschieben das Ende nicht
        assert_eq!(d.poll(150), Some("c"));
        assert_eq!(d.poll(200), None);
        // Neues Fenster nach Ablauf
        d.push(300, "d");
        assert_eq!(d.poll(349), None);
        assert_eq!(d.poll(350), Some("d"));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut d = Debouncer::trailing(10);
        d.push(0, 5);
        d.cancel();
        assert_eq!(d.poll(100), None);
    }
}
