//! Flag cache
//!
//! localStorage-style string map the guard reads synchronously.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use fos_codec_guard::{FlagError, FlagSource, FlagValue};

use crate::SettingsError;

/// Cache backend
#[derive(Debug, Default)]
pub struct FlagCache {
    data: RwLock<HashMap<String, String>>,
    path: Option<PathBuf>,
}

impl FlagCache {
    /// Create in-memory cache
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create a cache persisted to `path`, loading what is already there
    pub fn persistent(path: PathBuf) -> Result<Self, SettingsError> {
        let mut data = HashMap::new();
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('\t') {
                    data.insert(key.to_string(), value.to_string());
                }
            }
        }

        Ok(Self {
            data: RwLock::new(data),
            path: Some(path),
        })
    }

    /// Get item
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Set item
    pub fn set_item(&self, key: &str, value: &str) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.insert(key.to_string(), value.to_string());
        self.persist(&data);
    }

    /// Remove item
    pub fn remove_item(&self, key: &str) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.remove(key);
        self.persist(&data);
    }

    /// Clear all items
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.clear();
        self.persist(&data);
    }

    /// Get number of items
    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persist to disk if persistent
    fn persist(&self, data: &HashMap<String, String>) {
        let Some(path) = &self.path else {
            return;
        };
        let contents: String = data
            .iter()
            .map(|(k, v)| format!("{}\t{}", k, v))
            .collect::<Vec<_>>()
            .join("\n");
        if let Err(e) = fs::write(path, contents) {
            tracing::warn!("Failed to persist flag cache to {}: {}", path.display(), e);
        }
    }
}

impl FlagSource for FlagCache {
    fn raw_flag(&self, key: &str) -> Result<Option<FlagValue>, FlagError> {
        Ok(self.get_item(key).map(FlagValue::Text))
    }
}
