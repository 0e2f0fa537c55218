//! Guard flags
//!
//! Four boolean options read synchronously from a key/value cache that
//! something else keeps up to date.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Common prefix of every flag key
pub const KEY_PREFIX: &str = "codec-guard-";

/// Master switch
pub const ENABLE_KEY: &str = "codec-guard-enable";
/// Reject streams above 30fps
pub const BLOCK_60FPS_KEY: &str = "codec-guard-block_60fps";
/// Only enforce while discharging
pub const BATTERY_ONLY_KEY: &str = "codec-guard-battery_only";
/// Allow VP9 and H.264, block AV1 (and VP8)
pub const AV1_ONLY_KEY: &str = "codec-guard-av1_only";

pub const ALL_KEYS: [&str; 4] = [ENABLE_KEY, BLOCK_60FPS_KEY, BATTERY_ONLY_KEY, AV1_ONLY_KEY];

/// Raw cached flag value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    /// `"true"`/`"false"` parse as expected; any other non-empty text is true.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(text) => match text.as_str() {
                "true" => true,
                "false" => false,
                other => !other.is_empty(),
            },
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flag read error
#[derive(Debug, thiserror::Error)]
pub enum FlagError {
    #[error("flag storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous, read-only view of the flag cache
pub trait FlagSource: Send + Sync {
    fn raw_flag(&self, key: &str) -> Result<Option<FlagValue>, FlagError>;

    /// Read `key` as a boolean, falling back to `default` when it is absent
    /// or cannot be read.
    fn read_flag(&self, key: &str, default: bool) -> bool {
        match self.raw_flag(key) {
            Ok(Some(value)) => value.as_bool(),
            Ok(None) => default,
            Err(e) => {
                tracing::debug!("Reading {} failed, using {}: {}", key, default, e);
                default
            }
        }
    }
}

/// Snapshot of the four flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    pub enabled: bool,
    pub block_high_framerate: bool,
    pub battery_only: bool,
    pub av1_only_mode: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            block_high_framerate: false,
            battery_only: false,
            av1_only_mode: false,
        }
    }
}

impl GuardConfig {
    pub fn read(source: &dyn FlagSource) -> Self {
        let defaults = Self::default();
        Self {
            enabled: source.read_flag(ENABLE_KEY, defaults.enabled),
            block_high_framerate: source.read_flag(BLOCK_60FPS_KEY, defaults.block_high_framerate),
            battery_only: source.read_flag(BATTERY_ONLY_KEY, defaults.battery_only),
            av1_only_mode: source.read_flag(AV1_ONLY_KEY, defaults.av1_only_mode),
        }
    }
}

/// In-memory flag source for embedders that configure the guard in code
#[derive(Debug, Default)]
pub struct FlagTable {
    flags: RwLock<HashMap<String, FlagValue>>,
}

impl FlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: GuardConfig) -> Self {
        let table = Self::new();
        table.set(ENABLE_KEY, config.enabled);
        table.set(BLOCK_60FPS_KEY, config.block_high_framerate);
        table.set(BATTERY_ONLY_KEY, config.battery_only);
        table.set(AV1_ONLY_KEY, config.av1_only_mode);
        table
    }

    pub fn set(&self, key: &str, value: impl Into<FlagValue>) {
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl FlagSource for FlagTable {
    fn raw_flag(&self, key: &str) -> Result<Option<FlagValue>, FlagError> {
        Ok(self
            .flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}
