//! Options
//!
//! The four guard options as the settings store holds them.

use fos_codec_guard::config::{AV1_ONLY_KEY, BATTERY_ONLY_KEY, BLOCK_60FPS_KEY, ENABLE_KEY};
use serde::{Deserialize, Serialize};

/// Stored guard options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardOptions {
    pub enable: bool,
    pub block_60fps: bool,
    pub battery_only: bool,
    pub av1_only: bool,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            enable: true,
            block_60fps: false,
            battery_only: false,
            av1_only: false,
        }
    }
}

impl GuardOptions {
    /// Cache key and value for each option
    pub fn entries(&self) -> [(&'static str, bool); 4] {
        [
            (ENABLE_KEY, self.enable),
            (BLOCK_60FPS_KEY, self.block_60fps),
            (BATTERY_ONLY_KEY, self.battery_only),
            (AV1_ONLY_KEY, self.av1_only),
        ]
    }
}

/// Storage area a change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Local,
    Sync,
    Managed,
}

/// New values of the options that changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_60fps: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub av1_only: Option<bool>,
}

impl StorageChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(mut self, value: bool) -> Self {
        self.enable = Some(value);
        self
    }

    pub fn block_60fps(mut self, value: bool) -> Self {
        self.block_60fps = Some(value);
        self
    }

    pub fn battery_only(mut self, value: bool) -> Self {
        self.battery_only = Some(value);
        self
    }

    pub fn av1_only(mut self, value: bool) -> Self {
        self.av1_only = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Cache key and new value of each changed option
    pub fn entries(&self) -> Vec<(&'static str, bool)> {
        [
            (ENABLE_KEY, self.enable),
            (BLOCK_60FPS_KEY, self.block_60fps),
            (BATTERY_ONLY_KEY, self.battery_only),
            (AV1_ONLY_KEY, self.av1_only),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}
