//! Lebenszyklus: Abbruch-Token und exklusiver Picking-Slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::{HandlerHandle, PickingHandlerKind, RenderEngine};

/// Geteiltes Abbruch-Signal; einmal gesetzt, bleibt es gesetzt.
///
/// Wird bei jedem externen Ereignis und jeder asynchronen Fortsetzung
/// zuerst geprüft.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Der einzige Picking-Handler-Slot der Engine.
///
/// Höchstens ein Handler ist installiert; `install` entfernt den
/// vorherigen, bevor der neue eingesetzt wird.
#[derive(Debug, Default)]
pub struct PickingSlot {
    installed: Option<(HandlerHandle, PickingHandlerKind)>,
}

impl PickingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktuell installierter Handler-Typ.
    pub fn kind(&self) -> Option<PickingHandlerKind> {
        self.installed.map(|(_, kind)| kind)
    }

    /// Installiert `kind`; ein bereits gleicher Handler bleibt bestehen.
    pub fn install(&mut self, engine: &mut dyn RenderEngine, kind: PickingHandlerKind) {
        if self.kind() == Some(kind) {
            return;
        }
        self.release(engine);
        let handle = engine.install_picking_handler(kind);
        log::debug!("Picking-Handler installiert: {:?}", kind);
        self.installed = Some((handle, kind));
    }

    /// Entfernt den Handler, falls vorhanden.
    pub fn release(&mut self, engine: &mut dyn RenderEngine) {
        if let Some((handle, kind)) = self.installed.take() {
            engine.remove_picking_handler(handle);
            log::debug!("Picking-Handler entfernt: {:?}", kind);
        }
    }

    /// Entfernt den Handler nur, wenn er vom angegebenen Typ ist.
    pub fn release_kind(&mut self, engine: &mut dyn RenderEngine, kind: PickingHandlerKind) {
        if self.kind() == Some(kind) {
            self.release(engine);
        }
    }
}
