//! fOS Codec Settings
//!
//! Keeps the codec guard's synchronous flag cache in step with the
//! asynchronous settings store.
//!
//! Features:
//! - Defaults seeded before the first store read completes
//! - One-shot sync of all options
//! - Change notifications applied key by key
//! - Optional on-disk persistence of the cache

pub mod options;
pub mod cache;
pub mod store;
pub mod bridge;

pub use options::{GuardOptions, StorageArea, StorageChanges};
pub use cache::FlagCache;
pub use store::{ChangeListener, MemoryStore, OptionsFuture, SettingsStore};
pub use bridge::{ConfigBridge, apply_changes, seed_defaults, write_options};

/// Settings error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings store error: {0}")]
    Store(String),

    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Change listener rejected: {0}")]
    Listener(String),
}
