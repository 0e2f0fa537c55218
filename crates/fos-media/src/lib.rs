//! fOS Media
//!
//! Media capability APIs for the fOS browser engine.
//!
//! Features:
//! - `HTMLMediaElement.canPlayType()`
//! - `MediaSource.isTypeSupported()`
//! - `MediaCapabilities.decodingInfo()`
//! - Battery Status API
//! - Per-document API slots that extensions can wrap

pub mod element;
pub mod mse;
pub mod capabilities;
pub mod codecs;
pub mod battery;
pub mod window;

pub use element::{CanPlayType, NativeCanPlayType, TypeSupport};
pub use mse::NativeMseSupport;
pub use capabilities::{
    AudioConfiguration, DecodingFuture, DecodingInfo, MediaCapabilitiesInfo,
    MediaDecodingConfiguration, NativeMediaCapabilities, VideoConfiguration,
};
pub use codecs::{CodecInfo, CodecRegistry, CodecSupport, CodecType, MimeType};
pub use battery::{BatteryFuture, BatteryManager, BatteryStatus, SystemBattery};
pub use window::{Api, ApiSlot, MediaWindow};

/// Media error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaError {
    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("{0} is not available in this document")]
    Unavailable(Api),

    #[error("{0} is read-only in this document")]
    ReadOnly(Api),

    #[error("Battery status unavailable: {0}")]
    Battery(String),
}
