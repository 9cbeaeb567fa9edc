//! Reaktive Brücke: Host-Property-Änderungen → typisierte Ziele.
//!
//! Jede Bindung hält ihre Host-Subscription und wird über ein
//! [`BindingHandle`] explizit wieder freigegeben.

use indexmap::IndexMap;
use serde_json::Value;

use super::{HostModel, HostProperty, SubscriptionId};

/// Disposer einer Property-Bindung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Binding {
    handle: BindingHandle,
    subscription: SubscriptionId,
    target: HostProperty,
}

/// Registrierte Property-Bindungen, pro Name in Registrierungsreihenfolge.
#[derive(Debug, Default)]
pub struct SyncBridge {
    bindings: IndexMap<String, Vec<Binding>>,
    next_handle: u64,
}

impl SyncBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindet eine Property und abonniert sie beim Host.
    pub fn bind(&mut self, host: &mut dyn HostModel, property: HostProperty) -> BindingHandle {
        let subscription = host.subscribe(property.name());
        let handle = BindingHandle(self.next_handle);
        self.next_handle += 1;
        self.bindings
            .entry(property.name().to_string())
            .or_default()
            .push(Binding {
                handle,
                subscription,
                target: property,
            });
        log::debug!("Property gebunden: {}", property.name());
        handle
    }

    /// Bindet mehrere Properties in der angegebenen Reihenfolge.
    pub fn bind_all(
        &mut self,
        host: &mut dyn HostModel,
        properties: impl IntoIterator<Item = HostProperty>,
    ) -> Vec<BindingHandle> {
        properties
            .into_iter()
            .map(|p| self.bind(host, p))
            .collect()
    }

    /// Löst eine einzelne Bindung; `false` wenn unbekannt.
    pub fn unbind(&mut self, host: &mut dyn HostModel, handle: BindingHandle) -> bool {
        for list in self.bindings.values_mut() {
            if let Some(pos) = list.iter().position(|b| b.handle == handle) {
                let binding = list.remove(pos);
                host.unsubscribe(binding.subscription);
                return true;
            }
        }
        false
    }

    /// Löst alle Bindungen; liefert die Anzahl.
    pub fn dispose_all(&mut self, host: &mut dyn HostModel) -> usize {
        let mut count = 0;
        for (_, list) in self.bindings.drain(..) {
            for binding in list {
                host.unsubscribe(binding.subscription);
                count += 1;
            }
        }
        if count > 0 {
            log::debug!("{} Property-Bindungen gelöst", count);
        }
        count
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Holt externe Änderungen ab und liefert (Ziel, aktueller Wert).
    ///
    /// Pro Property in Registrierungsreihenfolge; über Properties hinweg
    /// in Eingangsreihenfolge des Hosts.
    pub fn collect_changes(&self, host: &mut dyn HostModel) -> Vec<(HostProperty, Value)> {
        let names = host.drain_changes();
        let mut out = Vec::new();
        for name in names {
            let Some(list) = self.bindings.get(&name) else {
                continue;
            };
            let value = host.get(&name).unwrap_or(Value::Null);
            for binding in list {
                out.push((binding.target, value.clone()));
            }
        }
        out
    }
}
