//! Vertrag zum Host-Modell und reaktive Property-Brücke.
//!
//! Das Host-Modell ist ein langlebiger, externer Zustandseigentümer mit
//! benannten JSON-Properties. Eigene Schreibvorgänge (`set`) lösen keine
//! Benachrichtigung aus; externe Änderungen werden über `drain_changes`
//! in Reihenfolge abgeholt.

mod bridge;
mod debounce;
mod memory;

pub use bridge::{BindingHandle, SyncBridge};
pub use debounce::{DebouncePolicy, Debouncer};
pub use memory::InMemoryHost;

use serde_json::Value;

/// ID einer Property-Subscription beim Host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Schnittstelle des Host-Modells.
pub trait HostModel {
    /// Aktueller Wert einer Property.
    fn get(&self, name: &str) -> Option<Value>;
    /// Schreibt lokal (ohne Selbst-Benachrichtigung).
    fn set(&mut self, name: &str, value: Value);
    /// Überträgt alle lokalen Schreibvorgänge an den Host-Prozess.
    fn save_changes(&mut self);
    /// Registriert Interesse an Änderungen einer Property.
    fn subscribe(&mut self, name: &str) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
    /// Namen extern geänderter, abonnierter Properties in Eingangsreihenfolge.
    fn drain_changes(&mut self) -> Vec<String>;
}

/// Alle gespiegelten Host-Properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostProperty {
    Latitude,
    Longitude,
    Altitude,
    Heading,
    Pitch,
    Roll,
    CameraSyncEnabled,
    CameraCommand,
    MeasurementMode,
    MeasurementResults,
    LoadMeasurementsTrigger,
    FocusMeasurementTrigger,
    ShowMeasurementTools,
    ShowMeasurementsList,
    PickedPoints,
    PointPickingMode,
    PointPickingConfig,
    DebugLogging,
}

impl HostProperty {
    pub const ALL: [HostProperty; 18] = [
        HostProperty::Latitude,
        HostProperty::Longitude,
        HostProperty::Altitude,
        HostProperty::Heading,
        HostProperty::Pitch,
        HostProperty::Roll,
        HostProperty::CameraSyncEnabled,
        HostProperty::CameraCommand,
        HostProperty::MeasurementMode,
        HostProperty::MeasurementResults,
        HostProperty::LoadMeasurementsTrigger,
        HostProperty::FocusMeasurementTrigger,
        HostProperty::ShowMeasurementTools,
        HostProperty::ShowMeasurementsList,
        HostProperty::PickedPoints,
        HostProperty::PointPickingMode,
        HostProperty::PointPickingConfig,
        HostProperty::DebugLogging,
    ];

    /// Property-Name im Host-Modell.
    pub fn name(self) -> &'static str {
        match self {
            HostProperty::Latitude => "latitude",
            HostProperty::Longitude => "longitude",
            HostProperty::Altitude => "altitude",
            HostProperty::Heading => "heading",
            HostProperty::Pitch => "pitch",
            HostProperty::Roll => "roll",
            HostProperty::CameraSyncEnabled => "cameraSyncEnabled",
            HostProperty::CameraCommand => "cameraCommand",
            HostProperty::MeasurementMode => "measurementMode",
            HostProperty::MeasurementResults => "measurementResults",
            HostProperty::LoadMeasurementsTrigger => "loadMeasurementsTrigger",
            HostProperty::FocusMeasurementTrigger => "focusMeasurementTrigger",
            HostProperty::ShowMeasurementTools => "showMeasurementTools",
            HostProperty::ShowMeasurementsList => "showMeasurementsList",
            HostProperty::PickedPoints => "pickedPoints",
            HostProperty::PointPickingMode => "pointPickingMode",
            HostProperty::PointPickingConfig => "pointPickingConfig",
            HostProperty::DebugLogging => "debugLogging",
        }
    }

    /// Einzelfelder der Kamera-Pose.
    pub fn is_camera_field(self) -> bool {
        matches!(
            self,
            HostProperty::Latitude
                | HostProperty::Longitude
                | HostProperty::Altitude
                | HostProperty::Heading
                | HostProperty::Pitch
                | HostProperty::Roll
        )
    }
}

/// Schreibt eine Property und committet sofort.
pub fn push_property(host: &mut dyn HostModel, property: HostProperty, value: Value) {
    host.set(property.name(), value);
    host.save_changes();
}

/// Schreibt mehrere Properties als einen logischen Batch (ein Commit).
pub fn push_batch(host: &mut dyn HostModel, values: impl IntoIterator<Item = (HostProperty, Value)>) {
    for (property, value) in values {
        host.set(property.name(), value);
    }
    host.save_changes();
}

/// Liest eine Zahl; fehlende oder nicht-numerische Werte ergeben `None`.
pub fn read_f64(host: &dyn HostModel, property: HostProperty) -> Option<f64> {
    host.get(property.name()).and_then(|v| v.as_f64())
}

/// Liest ein Bool; fehlend = `default`.
pub fn read_bool(host: &dyn HostModel, property: HostProperty, default: bool) -> bool {
    host.get(property.name())
        .and_then(|v| v.as_bool())
        .unwrap_or(default)
}
