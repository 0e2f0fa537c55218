//! Media Elements
//!
//! `HTMLMediaElement.canPlayType()` and the synchronous type-support
//! contract it shares with Media Source Extensions.

use std::fmt;
use std::sync::Arc;

use crate::MediaError;
use crate::codecs::{CodecRegistry, CodecSupport, MimeType};

/// Can play type result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CanPlayType {
    #[default]
    Empty,
    Maybe,
    Probably,
}

impl CanPlayType {
    /// The string a page sees: `"probably"`, `"maybe"` or `""`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Maybe => "maybe",
            Self::Probably => "probably",
        }
    }
}

impl fmt::Display for CanPlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CodecSupport> for CanPlayType {
    fn from(support: CodecSupport) -> Self {
        match support {
            CodecSupport::Supported => Self::Probably,
            CodecSupport::MaybeSupported => Self::Maybe,
            CodecSupport::Unsupported => Self::Empty,
        }
    }
}

/// Synchronous "is this MIME type playable" query.
///
/// `R` is the shape the page expects back: [`CanPlayType`] for
/// `canPlayType()`, `bool` for `isTypeSupported()`. A missing argument is
/// passed as `None`.
pub trait TypeSupport<R>: Send + Sync {
    fn check(&self, mime_type: Option<&str>) -> Result<R, MediaError>;
}

impl<R, F> TypeSupport<R> for F
where
    F: Fn(Option<&str>) -> Result<R, MediaError> + Send + Sync,
{
    fn check(&self, mime_type: Option<&str>) -> Result<R, MediaError> {
        self(mime_type)
    }
}

/// Built-in `canPlayType()` backed by the codec registry
#[derive(Debug, Clone)]
pub struct NativeCanPlayType {
    registry: Arc<CodecRegistry>,
}

impl NativeCanPlayType {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }
}

impl TypeSupport<CanPlayType> for NativeCanPlayType {
    fn check(&self, mime_type: Option<&str>) -> Result<CanPlayType, MediaError> {
        let Some(mime) = mime_type.and_then(MimeType::parse) else {
            return Ok(CanPlayType::Empty);
        };
        Ok(self.registry.support_for(&mime).into())
    }
}
