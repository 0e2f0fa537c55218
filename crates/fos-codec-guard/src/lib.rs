//! fOS Codec Guard
//!
//! Steers sites toward H.264 by answering their codec capability queries.
//!
//! Features:
//! - Substring rules over MIME/codec strings (WebM, VP8, VP9, AV1)
//! - Optional high-framerate blocking and AV1-only mode
//! - Decorators for `canPlayType()`, `isTypeSupported()` and `decodingInfo()`
//! - One-shot installation per document, optionally only on battery power
//!
//! Flags are read through [`FlagSource`] on every decision, so settings
//! changes apply to later calls without reinstalling.

pub mod config;
pub mod rules;
pub mod wrap;
pub mod capabilities;
pub mod install;

pub use config::{FlagError, FlagSource, FlagTable, FlagValue, GuardConfig};
pub use rules::CodecPolicy;
pub use wrap::GuardedTypeSupport;
pub use capabilities::GuardedDecodingInfo;
pub use install::{CodecGuard, InstallOutcome, InstallReport, INJECTED_MARKER};

use fos_media::{Api, MediaError};

/// Codec guard error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GuardError {
    #[error("{0} is not available")]
    Unavailable(Api),

    #[error("patching {api} was rejected: {source}")]
    Rejected { api: Api, source: MediaError },
}

impl GuardError {
    /// Classify a failed slot replacement for `api`
    pub fn patch(api: Api, err: MediaError) -> Self {
        match err {
            MediaError::Unavailable(api) => Self::Unavailable(api),
            source => Self::Rejected { api, source },
        }
    }
}
