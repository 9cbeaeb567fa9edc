//! Application-Layer: Controller, State, Events und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
mod intent_mapping;
pub mod lifecycle;
/// Application State
///
/// Registry-Spiegel, Mess-Session, Bearbeiten-Modus, Scene-Entities und Panel.
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use lifecycle::{PickingSlot, ShutdownToken};
pub use state::{AppState, EditSession, PointRef, PresentationRow, SessionPhase};

use crate::engine::RenderEngine;
use crate::host::HostModel;

/// Zugriff auf die beiden externen Kollaborateure während eines Commands.
pub struct Ports<'a> {
    pub engine: &'a mut dyn RenderEngine,
    pub host: &'a mut dyn HostModel,
}

impl<'a> Ports<'a> {
    pub fn new(engine: &'a mut dyn RenderEngine, host: &'a mut dyn HostModel) -> Self {
        Self { engine, host }
    }
}
