//! Settings store
//!
//! The asynchronous extension settings store and an in-memory
//! implementation of it.

use std::sync::{Mutex, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::SettingsError;
use crate::options::{GuardOptions, StorageArea, StorageChanges};

/// Future returned by [`SettingsStore::get`]
pub type OptionsFuture = smol::future::Boxed<Result<GuardOptions, SettingsError>>;

/// Callback for store changes
pub type ChangeListener = Box<dyn Fn(&StorageChanges, StorageArea) + Send + Sync>;

/// Asynchronous settings store
pub trait SettingsStore: Send + Sync {
    /// Read all options; options never stored take their value from
    /// `defaults`.
    fn get(&self, defaults: GuardOptions) -> OptionsFuture;

    /// Register a listener for later changes
    fn subscribe(&self, listener: ChangeListener) -> Result<(), SettingsError>;
}

/// In-memory settings store
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<Map<String, Value>>,
    listeners: Mutex<Vec<ChangeListener>>,
    reject_listeners: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with every option already set
    pub fn with_options(options: GuardOptions) -> Result<Self, SettingsError> {
        let Value::Object(values) = serde_json::to_value(options)? else {
            return Err(SettingsError::Store("options did not serialize to an object".to_string()));
        };
        Ok(Self {
            values: RwLock::new(values),
            ..Self::default()
        })
    }

    /// Store whose listener registration always fails
    pub fn rejecting_listeners() -> Self {
        Self {
            reject_listeners: true,
            ..Self::default()
        }
    }

    /// Store a raw value, bypassing option validation
    pub fn set_raw(&self, key: &str, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    /// Apply changes and notify listeners, as a local-area write
    pub fn set(&self, changes: StorageChanges) -> Result<(), SettingsError> {
        let Value::Object(changed) = serde_json::to_value(&changes)? else {
            return Err(SettingsError::Store("changes did not serialize to an object".to_string()));
        };
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(changed);
        self.notify(&changes, StorageArea::Local);
        Ok(())
    }

    /// Deliver a change notification to every listener
    pub fn notify(&self, changes: &StorageChanges, area: StorageArea) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(changes, area);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, defaults: GuardOptions) -> OptionsFuture {
        let merged = serde_json::to_value(defaults).map(|value| {
            let mut merged = match value {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let stored = self.values.read().unwrap_or_else(PoisonError::into_inner);
            merged.extend(stored.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
        });

        Box::pin(async move {
            let options: GuardOptions = serde_json::from_value(Value::Object(merged?))?;
            Ok::<_, SettingsError>(options)
        })
    }

    fn subscribe(&self, listener: ChangeListener) -> Result<(), SettingsError> {
        if self.reject_listeners {
            return Err(SettingsError::Listener("listeners are not allowed in this context".to_string()));
        }
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
        Ok(())
    }
}
