//! Geo Measure Surface Library.
//! Sync- und Mess-Kern einer 3D-Globus-Oberfläche, als Library exportiert
//! für Tests, das Replay-Binary und Host-Einbettungen.

pub mod app;
pub mod core;
pub mod engine;
pub mod host;
pub mod shared;
pub mod surface;

pub use app::{AppCommand, AppController, AppIntent, AppState, ShutdownToken};
pub use core::{
    CameraPose, Cartographic, Measurement, MeasurementKind, MeasurementMode, MeasurementRegistry,
    PickedPoint, ValidationError,
};
pub use engine::{EngineEvent, RecordingEngine, RenderEngine};
pub use host::{HostModel, HostProperty, InMemoryHost};
pub use shared::{Diagnostics, SessionOptions};
pub use surface::VisualizationSurface;
