//! Config bridge
//!
//! Copies options from the settings store into the flag cache at startup
//! and whenever the store reports a change. The store is asynchronous, so
//! defaults are written first to make early reads deterministic.

use std::sync::Arc;

use fos_codec_guard::FlagSource;

use crate::SettingsError;
use crate::cache::FlagCache;
use crate::options::{GuardOptions, StorageArea, StorageChanges};
use crate::store::SettingsStore;

fn flag_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Write default options for keys the cache does not have yet
pub fn seed_defaults(cache: &FlagCache) {
    for (key, value) in GuardOptions::default().entries() {
        if cache.get_item(key).is_none() {
            cache.set_item(key, flag_text(value));
        }
    }
}

/// Overwrite all four cached options
pub fn write_options(cache: &FlagCache, options: &GuardOptions) {
    for (key, value) in options.entries() {
        cache.set_item(key, flag_text(value));
    }
}

/// Write the options a local-area change touched. Returns the number of
/// keys written.
pub fn apply_changes(cache: &FlagCache, changes: &StorageChanges, area: StorageArea) -> usize {
    if area != StorageArea::Local {
        return 0;
    }
    let entries = changes.entries();
    for (key, value) in &entries {
        cache.set_item(key, flag_text(*value));
    }
    entries.len()
}

/// Keeps a [`FlagCache`] in sync with a [`SettingsStore`]
pub struct ConfigBridge {
    store: Arc<dyn SettingsStore>,
    cache: Arc<FlagCache>,
}

impl ConfigBridge {
    /// Seed defaults and start listening for changes. A store that refuses
    /// the listener still gets the initial sync.
    pub fn attach(store: Arc<dyn SettingsStore>, cache: Arc<FlagCache>) -> Self {
        seed_defaults(&cache);

        let target = cache.clone();
        let listener = Box::new(move |changes: &StorageChanges, area: StorageArea| {
            let written = apply_changes(&target, changes, area);
            if written > 0 {
                tracing::debug!("Applied {} option change(s)", written);
            }
        });
        if let Err(e) = store.subscribe(listener) {
            tracing::warn!("Not tracking settings changes: {}", e);
        }

        Self { store, cache }
    }

    /// Fetch every option once and write it to the cache
    pub async fn sync(&self) -> Result<GuardOptions, SettingsError> {
        let options = self.store.get(GuardOptions::default()).await?;
        write_options(&self.cache, &options);
        tracing::info!("Synced codec guard options: {:?}", options);
        Ok(options)
    }

    pub fn cache(&self) -> &Arc<FlagCache> {
        &self.cache
    }

    /// The cache as the guard reads it
    pub fn flags(&self) -> Arc<dyn FlagSource> {
        self.cache.clone()
    }
}
