//! Visualisierungs-Oberfläche: einziger Einstiegspunkt für Host- und
//! Engine-Ereignisse.
//!
//! Besitzt Engine, Host, Zustand, Controller und die Property-Brücke.
//! Jeder Einstieg prüft zuerst das [`ShutdownToken`]; nach [`destroy`]
//! bleiben alle Ereignisse wirkungslos.
//!
//! [`destroy`]: VisualizationSurface::destroy

use serde_json::Value;

use crate::app::{AppCommand, AppController, AppIntent, AppState, Ports, ShutdownToken};
use crate::engine::{EngineEvent, RenderEngine};
use crate::host::{HostModel, HostProperty, SyncBridge};
use crate::shared::{Diagnostics, SessionOptions};

/// Headless-fähige Oberfläche über beliebigen Engine- und Host-Implementierungen.
pub struct VisualizationSurface<E: RenderEngine, H: HostModel> {
    engine: E,
    host: H,
    state: AppState,
    controller: AppController,
    bridge: SyncBridge,
    shutdown: ShutdownToken,
}

impl<E: RenderEngine, H: HostModel> VisualizationSurface<E, H> {
    /// Bindet alle Host-Properties und übernimmt den aktuellen Host-Zustand.
    pub fn new(engine: E, host: H, options: SessionOptions, diagnostics: Diagnostics) -> Self {
        let mut surface = Self {
            engine,
            host,
            state: AppState::new(options, diagnostics),
            controller: AppController::new(),
            bridge: SyncBridge::new(),
            shutdown: ShutdownToken::new(),
        };
        surface
            .bridge
            .bind_all(&mut surface.host, HostProperty::ALL);
        surface.apply_initial_host_state();
        log::info!(
            "Oberfläche bereit ({} Property-Bindungen)",
            surface.bridge.binding_count()
        );
        surface
    }

    /// Initialwerte: Fire-Once-Trigger werden nur als verbraucht markiert.
    fn apply_initial_host_state(&mut self) {
        let token_of = |host: &H, property: HostProperty| {
            host.get(property.name())
                .and_then(|v| v.get("timestamp").cloned())
        };
        self.state.sync.last_command_token = token_of(&self.host, HostProperty::CameraCommand);
        self.state.sync.last_load_token =
            token_of(&self.host, HostProperty::LoadMeasurementsTrigger);
        self.state.sync.last_focus_token =
            token_of(&self.host, HostProperty::FocusMeasurementTrigger);

        self.run_command(AppCommand::ApplyHostCamera);
        for property in HostProperty::ALL {
            let fire_once = matches!(
                property,
                HostProperty::CameraCommand
                    | HostProperty::LoadMeasurementsTrigger
                    | HostProperty::FocusMeasurementTrigger
            );
            if fire_once || property.is_camera_field() {
                continue;
            }
            let Some(value) = self.host.get(property.name()) else {
                continue;
            };
            self.run_intent(AppIntent::HostPropertyChanged { property, value });
        }
    }

    /// Verarbeitet einen Intent (Panel-Eingaben, Tests, Replay).
    pub fn dispatch(&mut self, intent: AppIntent) {
        if self.shutdown.is_cancelled() {
            log::debug!("Intent nach Teardown ignoriert: {:?}", intent);
            return;
        }
        self.run_intent(intent);
    }

    /// Nimmt ein Ereignis der Render-Engine entgegen.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        let intent = match event {
            EngineEvent::CameraChanged { pose } => AppIntent::CameraMoved { pose },
            EngineEvent::PrimaryClick { screen } => AppIntent::PrimaryClick { screen },
            EngineEvent::SecondaryClick { screen } => AppIntent::SecondaryClick { screen },
            EngineEvent::PointerDown { screen } => AppIntent::PointerDown { screen },
            EngineEvent::PointerMove { screen } => AppIntent::PointerMove { screen },
            EngineEvent::PointerUp { screen } => AppIntent::PointerUp { screen },
            EngineEvent::TerrainSampled { request, result } => {
                AppIntent::TerrainSampled { request, result }
            }
        };
        self.dispatch(intent);
    }

    /// Holt extern geänderte Host-Properties ab und verarbeitet sie.
    pub fn pump_host_changes(&mut self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let changes = self.bridge.collect_changes(&mut self.host);
        for (property, value) in changes {
            self.dispatch(AppIntent::HostPropertyChanged { property, value });
        }
    }

    /// Treibt die Debounce-Fenster an.
    pub fn tick(&mut self, now_ms: u64) {
        self.dispatch(AppIntent::Tick { now_ms });
    }

    /// Teardown: löst alle Bindungen und den Picking-Handler, danach ist
    /// die Oberfläche inert. Mehrfacher Aufruf ist wirkungslos.
    pub fn destroy(&mut self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        let released = self.bridge.dispose_all(&mut self.host);
        self.state.picking_slot.release(&mut self.engine);
        self.engine.set_camera_rotate_enabled(true);
        self.state.sync.outbound.cancel();
        self.state.sync.inbound.cancel();
        log::info!("Oberfläche abgebaut ({} Bindungen gelöst)", released);
    }

    fn run_intent(&mut self, intent: AppIntent) {
        let mut ports = Ports::new(&mut self.engine, &mut self.host);
        if let Err(e) = self
            .controller
            .handle_intent(&mut self.state, &mut ports, intent)
        {
            log::error!("Ereignis konnte nicht verarbeitet werden: {:#}", e);
        }
    }

    fn run_command(&mut self, command: AppCommand) {
        let mut ports = Ports::new(&mut self.engine, &mut self.host);
        if let Err(e) = self
            .controller
            .handle_command(&mut self.state, &mut ports, command)
        {
            log::error!("Command fehlgeschlagen: {:#}", e);
        }
    }

    /// Schreibt eine Property von außen und verarbeitet sie sofort.
    ///
    /// Kurzform für Hosts ohne eigenen Change-Kanal.
    pub fn host_write(&mut self, property: HostProperty, value: Value) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.host.set(property.name(), value.clone());
        self.dispatch(AppIntent::HostPropertyChanged { property, value });
    }

    pub fn is_destroyed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Geteiltes Abbruch-Signal (z. B. für asynchrone Fortsetzungen).
    pub fn shutdown_token(&self) -> ShutdownToken {
        self.shutdown.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cartographic, MeasurementKind, MeasurementMode};
    use crate::engine::RecordingEngine;
    use crate::host::InMemoryHost;
    use glam::Vec2;
    use serde_json::json;

    fn surface() -> VisualizationSurface<RecordingEngine, InMemoryHost> {
        VisualizationSurface::new(
            RecordingEngine::new(),
            InMemoryHost::with_defaults(),
            SessionOptions::default(),
            Diagnostics::default(),
        )
    }

    #[test]
    fn initial_host_pose_reaches_engine() {
        let mut host = InMemoryHost::with_defaults();
        host.external_set("latitude", json!(47.0));
        host.external_set("longitude", json!(8.0));
        let surface = VisualizationSurface::new(
            RecordingEngine::new(),
            host,
            SessionOptions::default(),
            Diagnostics::default(),
        );

        let pose = surface.engine().camera_pose();
        assert_eq!(pose.latitude, 47.0);
        assert_eq!(pose.longitude, 8.0);
    }

    #[test]
    fn stale_trigger_in_host_is_not_replayed_on_startup() {
        let mut host = InMemoryHost::with_defaults();
        host.external_set(
            "loadMeasurementsTrigger",
            json!({"measurements": [{"type": "distance", "points": [[0.0, 0.0, 0.0], [0.01, 0.0, 0.0]]}], "timestamp": 3}),
        );
        let surface = VisualizationSurface::new(
            RecordingEngine::new(),
            host,
            SessionOptions::default(),
            Diagnostics::default(),
        );

        assert!(surface.state().registry.is_empty());
    }

    #[test]
    fn destroy_disposes_bindings_and_suppresses_events() {
        let mut surface = surface();
        surface.dispatch(AppIntent::MeasurementModeSelected {
            mode: MeasurementMode(Some(MeasurementKind::Distance)),
        });
        assert_eq!(surface.engine().installed_handlers().len(), 1);

        surface.destroy();
        surface.destroy();

        assert!(surface.is_destroyed());
        assert!(surface.engine().installed_handlers().is_empty());
        assert_eq!(surface.host().subscription_count(), 0);

        surface
            .engine_mut()
            .script_pick(Vec2::new(1.0, 1.0), Cartographic::new(0.0, 0.0, 0.0));
        surface.handle_engine_event(EngineEvent::PrimaryClick {
            screen: Vec2::new(1.0, 1.0),
        });
        surface.host_mut().external_set("measurementMode", json!("area"));
        surface.pump_host_changes();

        assert_eq!(surface.engine().entity_count(), 0);
        assert_eq!(
            surface.state().session.mode.kind(),
            Some(MeasurementKind::Distance)
        );
    }
}
