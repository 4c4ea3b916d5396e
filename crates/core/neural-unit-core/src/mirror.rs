//! Host-side mirror of last-observed device values
//!
//! Components only ever write to a mirror; they never read from it to answer
//! a query. The device stays authoritative. Observers (dashboards, debugging
//! tools) hold the concrete mirror and read it themselves.

use crate::codec::NamedValueMap;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Write-only sink for values seen on successful round trips
pub trait HostMirror: Send + Sync {
    /// Record the value last observed for `name`
    fn record(&self, name: &str, value: f64);

    /// Record every entry of a listing
    fn record_all(&self, entries: &NamedValueMap) {
        for (name, value) in entries {
            self.record(name, *value);
        }
    }
}

/// Mirror that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMirror;

impl HostMirror for NullMirror {
    fn record(&self, _name: &str, _value: f64) {}
}

/// In-memory mirror, never pruned or persisted
#[derive(Debug, Default)]
pub struct InMemoryMirror {
    values: RwLock<BTreeMap<String, f64>>,
}

impl InMemoryMirror {
    /// Create an empty mirror
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mirror behind an `Arc`, ready to share with a component
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Last observed value for `name`, if any
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(name).copied())
    }

    /// Copy of everything observed so far
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.values
            .read()
            .map(|values| values.clone())
            .unwrap_or_default()
    }

    /// Number of distinct names observed
    pub fn len(&self) -> usize {
        self.values.read().map(|values| values.len()).unwrap_or(0)
    }

    /// Whether nothing has been observed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HostMirror for InMemoryMirror {
    fn record(&self, name: &str, value: f64) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.to_string(), value);
        }
    }
}

impl<M: HostMirror + ?Sized> HostMirror for Arc<M> {
    fn record(&self, name: &str, value: f64) {
        (**self).record(name, value);
    }
}
