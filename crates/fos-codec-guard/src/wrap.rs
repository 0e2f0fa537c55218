//! Guarded type checks
//!
//! One decorator serves both `canPlayType()` and `isTypeSupported()`. The
//! blocked answer is supplied by the caller because each API has its own
//! "unsupported" shape: `""` for the former, `false` for the latter.

use std::sync::Arc;

use fos_media::{MediaError, TypeSupport};

use crate::rules::CodecPolicy;

/// Type check that answers `blocked` for disallowed types and defers to the
/// wrapped implementation otherwise.
pub struct GuardedTypeSupport<R> {
    original: Arc<dyn TypeSupport<R>>,
    blocked: R,
    policy: CodecPolicy,
}

impl<R: Clone + Send + Sync + 'static> GuardedTypeSupport<R> {
    pub fn new(original: Arc<dyn TypeSupport<R>>, blocked: R, policy: CodecPolicy) -> Self {
        Self { original, blocked, policy }
    }

    /// Wrap `original`, ready to be stored back in its slot
    pub fn wrap(original: Arc<dyn TypeSupport<R>>, blocked: R, policy: CodecPolicy) -> Arc<dyn TypeSupport<R>> {
        Arc::new(Self::new(original, blocked, policy))
    }
}

impl<R: Clone + Send + Sync + 'static> TypeSupport<R> for GuardedTypeSupport<R> {
    fn check(&self, mime_type: Option<&str>) -> Result<R, MediaError> {
        // No type at all is answered as unsupported
        let Some(mime_type) = mime_type.filter(|t| !t.is_empty()) else {
            return Ok(self.blocked.clone());
        };

        if self.policy.is_disallowed_type(&mime_type.to_lowercase()) {
            tracing::debug!("Blocked type query: {}", mime_type);
            return Ok(self.blocked.clone());
        }

        self.original.check(Some(mime_type))
    }
}
