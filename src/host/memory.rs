//! In-Memory-Host für Tests und das Replay-Binary.

use indexmap::IndexMap;
use serde_json::{json, Value};

use super::{HostModel, HostProperty, SubscriptionId};
use crate::core::CameraPose;

/// Host-Modell im Speicher mit Zählern für Commits und Subscriptions.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    values: IndexMap<String, Value>,
    subscriptions: IndexMap<SubscriptionId, String>,
    pending: Vec<String>,
    save_count: usize,
    next_subscription: u64,
}

impl InMemoryHost {
    /// Leerer Host ohne Properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host mit den Default-Werten des Widgets.
    pub fn with_defaults() -> Self {
        let pose = CameraPose::default();
        let mut host = Self::new();
        let defaults = [
            (HostProperty::Latitude, json!(pose.latitude)),
            (HostProperty::Longitude, json!(pose.longitude)),
            (HostProperty::Altitude, json!(pose.altitude)),
            (HostProperty::Heading, json!(pose.heading)),
            (HostProperty::Pitch, json!(pose.pitch)),
            (HostProperty::Roll, json!(pose.roll)),
            (HostProperty::CameraSyncEnabled, json!(false)),
            (HostProperty::CameraCommand, json!({})),
            (HostProperty::MeasurementMode, json!("")),
            (HostProperty::MeasurementResults, json!([])),
            (HostProperty::LoadMeasurementsTrigger, json!({})),
            (HostProperty::FocusMeasurementTrigger, json!({})),
            (HostProperty::ShowMeasurementTools, json!(true)),
            (HostProperty::ShowMeasurementsList, json!(true)),
            (HostProperty::PickedPoints, json!([])),
            (HostProperty::PointPickingMode, json!(false)),
            (HostProperty::PointPickingConfig, json!({})),
            (HostProperty::DebugLogging, json!(false)),
        ];
        for (property, value) in defaults {
            host.values.insert(property.name().to_string(), value);
        }
        host
    }

    /// Schreibvorgang von außen (Host-Prozess); benachrichtigt Abonnenten.
    pub fn external_set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
        if self.subscriptions.values().any(|n| n == name) {
            self.pending.push(name.to_string());
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl HostModel for InMemoryHost {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn save_changes(&mut self) {
        self.save_count += 1;
    }

    fn subscribe(&mut self, name: &str) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, name.to_string());
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.shift_remove(&id);
    }

    fn drain_changes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribed_changes_are_not_queued() {
        let mut host = InMemoryHost::with_defaults();
        host.external_set("measurementMode", json!("area"));
        assert!(host.drain_changes().is_empty());
        assert_eq!(host.value("measurementMode"), Some(&json!("area")));
    }

    #[test]
    fn defaults_cover_every_property() {
        let host = InMemoryHost::with_defaults();
        for property in HostProperty::ALL {
            assert!(host.get(property.name()).is_some(), "{}", property.name());
        }
    }
}
