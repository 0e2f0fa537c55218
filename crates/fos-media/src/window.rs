//! Media Window
//!
//! The per-document media API surface. Each capability API lives in an
//! [`ApiSlot`] that extensions may wrap in place, the way page script can
//! replace `MediaSource.isTypeSupported`.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::MediaError;
use crate::battery::{BatteryStatus, SystemBattery};
use crate::capabilities::{
    DecodingFuture, DecodingInfo, MediaDecodingConfiguration, NativeMediaCapabilities,
};
use crate::codecs::CodecRegistry;
use crate::element::{CanPlayType, NativeCanPlayType, TypeSupport};
use crate::mse::NativeMseSupport;

/// Media capability APIs exposed to page script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    CanPlayType,
    IsTypeSupported,
    DecodingInfo,
}

impl Api {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CanPlayType => "HTMLMediaElement.canPlayType",
            Self::IsTypeSupported => "MediaSource.isTypeSupported",
            Self::DecodingInfo => "MediaCapabilities.decodingInfo",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A replaceable API binding
pub struct ApiSlot<T: ?Sized> {
    api: Api,
    current: RwLock<Option<Arc<T>>>,
    writable: AtomicBool,
    replacements: AtomicUsize,
}

impl<T: ?Sized> ApiSlot<T> {
    /// Slot for an API this document does not have
    pub fn absent(api: Api) -> Self {
        Self {
            api,
            current: RwLock::new(None),
            writable: AtomicBool::new(true),
            replacements: AtomicUsize::new(0),
        }
    }

    pub fn new(api: Api, implementation: Arc<T>) -> Self {
        let slot = Self::absent(api);
        *slot.current.write().unwrap_or_else(PoisonError::into_inner) = Some(implementation);
        slot
    }

    pub fn api(&self) -> Api {
        self.api
    }

    /// Current binding, if the API exists
    pub fn get(&self) -> Option<Arc<T>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_present(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Make later replacements fail, like a non-writable property
    pub fn freeze(&self) {
        self.writable.store(false, Ordering::SeqCst);
    }

    /// Replace the binding with `wrap(original)`.
    pub fn replace_with<F>(&self, wrap: F) -> Result<(), MediaError>
    where
        F: FnOnce(Arc<T>) -> Arc<T>,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let Some(original) = current.clone() else {
            return Err(MediaError::Unavailable(self.api));
        };
        if !self.writable.load(Ordering::SeqCst) {
            return Err(MediaError::ReadOnly(self.api));
        }

        *current = Some(wrap(original));
        self.replacements.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Number of successful replacements
    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::SeqCst)
    }
}

impl<T: ?Sized> fmt::Debug for ApiSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSlot")
            .field("api", &self.api)
            .field("present", &self.is_present())
            .field("writable", &self.writable.load(Ordering::SeqCst))
            .field("replacements", &self.replacements())
            .finish()
    }
}

/// Media API surface of one document
pub struct MediaWindow {
    pub can_play_type: ApiSlot<dyn TypeSupport<CanPlayType>>,
    pub is_type_supported: ApiSlot<dyn TypeSupport<bool>>,
    pub decoding_info: ApiSlot<dyn DecodingInfo>,
    battery: Option<Arc<dyn BatteryStatus>>,
    markers: Mutex<HashSet<String>>,
}

impl fmt::Debug for MediaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaWindow")
            .field("can_play_type", &self.can_play_type)
            .field("is_type_supported", &self.is_type_supported)
            .field("decoding_info", &self.decoding_info)
            .field("battery", &self.battery.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for MediaWindow {
    fn default() -> Self {
        Self::empty()
    }
}

impl MediaWindow {
    /// A document without any media capability APIs
    pub fn empty() -> Self {
        Self {
            can_play_type: ApiSlot::absent(Api::CanPlayType),
            is_type_supported: ApiSlot::absent(Api::IsTypeSupported),
            decoding_info: ApiSlot::absent(Api::DecodingInfo),
            battery: None,
            markers: Mutex::new(HashSet::new()),
        }
    }

    /// A document with the engine's built-in implementations
    pub fn native() -> Self {
        let registry = Arc::new(CodecRegistry::new());
        Self::empty()
            .with_can_play_type(Arc::new(NativeCanPlayType::new(registry.clone())))
            .with_is_type_supported(Arc::new(NativeMseSupport::new(registry.clone())))
            .with_decoding_info(Arc::new(NativeMediaCapabilities::new(registry)))
            .with_battery(Arc::new(SystemBattery))
    }

    pub fn with_can_play_type(mut self, api: Arc<dyn TypeSupport<CanPlayType>>) -> Self {
        self.can_play_type = ApiSlot::new(Api::CanPlayType, api);
        self
    }

    pub fn with_is_type_supported(mut self, api: Arc<dyn TypeSupport<bool>>) -> Self {
        self.is_type_supported = ApiSlot::new(Api::IsTypeSupported, api);
        self
    }

    pub fn with_decoding_info(mut self, api: Arc<dyn DecodingInfo>) -> Self {
        self.decoding_info = ApiSlot::new(Api::DecodingInfo, api);
        self
    }

    pub fn with_battery(mut self, battery: Arc<dyn BatteryStatus>) -> Self {
        self.battery = Some(battery);
        self
    }

    pub fn without_battery(mut self) -> Self {
        self.battery = None;
        self
    }

    /// `navigator.getBattery`, when the document exposes it
    pub fn battery(&self) -> Option<Arc<dyn BatteryStatus>> {
        self.battery.clone()
    }

    /// Set a document marker. Returns `true` if it was not already set.
    pub fn claim_marker(&self, name: &str) -> bool {
        self.markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string())
    }

    pub fn has_marker(&self, name: &str) -> bool {
        self.markers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// `canPlayType()` through the current binding
    pub fn can_play_type(&self, mime_type: Option<&str>) -> Result<CanPlayType, MediaError> {
        let api = self.can_play_type.get().ok_or(MediaError::Unavailable(Api::CanPlayType))?;
        api.check(mime_type)
    }

    /// `isTypeSupported()` through the current binding
    pub fn is_type_supported(&self, mime_type: Option<&str>) -> Result<bool, MediaError> {
        let api = self
            .is_type_supported
            .get()
            .ok_or(MediaError::Unavailable(Api::IsTypeSupported))?;
        api.check(mime_type)
    }

    /// `decodingInfo()` through the current binding
    pub fn decoding_info(&self, config: Option<MediaDecodingConfiguration>) -> DecodingFuture {
        match self.decoding_info.get() {
            Some(api) => api.decoding_info(config),
            None => Box::pin(async { Err(MediaError::Unavailable(Api::DecodingInfo)) }),
        }
    }
}
