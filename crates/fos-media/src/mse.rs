//! Media Source Extensions
//!
//! `MediaSource.isTypeSupported()` for adaptive streaming.

use std::sync::Arc;

use crate::MediaError;
use crate::codecs::{CodecRegistry, CodecSupport, MimeType};
use crate::element::TypeSupport;

/// Built-in `MediaSource.isTypeSupported()` backed by the codec registry
#[derive(Debug, Clone)]
pub struct NativeMseSupport {
    registry: Arc<CodecRegistry>,
}

impl NativeMseSupport {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }
}

impl TypeSupport<bool> for NativeMseSupport {
    fn check(&self, mime_type: Option<&str>) -> Result<bool, MediaError> {
        let Some(mime) = mime_type.and_then(MimeType::parse) else {
            return Ok(false);
        };
        Ok(self.registry.support_for(&mime) != CodecSupport::Unsupported)
    }
}
