//! Guarded `decodingInfo()`
//!
//! Disallowed configurations resolve to an all-false answer without
//! touching the wrapped implementation. Allowed ones go through it, and the
//! configuration is checked again once the result arrives.

use std::sync::Arc;

use fos_media::{
    DecodingFuture, DecodingInfo, MediaCapabilitiesInfo, MediaDecodingConfiguration, MediaError,
};

use crate::rules::CodecPolicy;

/// Force the three support flags off, keeping every other member
pub fn force_unsupported(mut info: MediaCapabilitiesInfo) -> MediaCapabilitiesInfo {
    info.supported = false;
    info.smooth = false;
    info.power_efficient = false;
    info
}

pub struct GuardedDecodingInfo {
    original: Arc<dyn DecodingInfo>,
    policy: CodecPolicy,
}

impl GuardedDecodingInfo {
    pub fn new(original: Arc<dyn DecodingInfo>, policy: CodecPolicy) -> Self {
        Self { original, policy }
    }

    pub fn wrap(original: Arc<dyn DecodingInfo>, policy: CodecPolicy) -> Arc<dyn DecodingInfo> {
        Arc::new(Self::new(original, policy))
    }
}

impl DecodingInfo for GuardedDecodingInfo {
    fn decoding_info(&self, config: Option<MediaDecodingConfiguration>) -> DecodingFuture {
        if self.policy.is_disallowed_decoding_config(config.as_ref()) {
            tracing::debug!("Blocked decodingInfo query: {:?}", config);
            return Box::pin(async { Ok(MediaCapabilitiesInfo::unsupported()) });
        }

        let policy = self.policy.clone();
        let recheck = config.clone();
        let pending = self.original.decoding_info(config);
        Box::pin(async move {
            let info = pending.await?;
            if policy.is_disallowed_decoding_config(recheck.as_ref()) {
                tracing::debug!("Blocked decodingInfo result: {:?}", recheck);
                return Ok(force_unsupported(info));
            }
            Ok::<_, MediaError>(info)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AV1_ONLY_KEY, BLOCK_60FPS_KEY, FlagTable};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records calls and answers with a fixed result
    struct Spy {
        calls: AtomicUsize,
        answer: Result<MediaCapabilitiesInfo, MediaError>,
    }

    impl Spy {
        fn answering(answer: Result<MediaCapabilitiesInfo, MediaError>) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), answer })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DecodingInfo for Spy {
        fn decoding_info(&self, _config: Option<MediaDecodingConfiguration>) -> DecodingFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let answer = self.answer.clone();
            Box::pin(async move { answer })
        }
    }

    fn all_supported() -> MediaCapabilitiesInfo {
        MediaCapabilitiesInfo::new(true, true, true).with_extra("extra", json!(1))
    }

    #[test]
    fn test_disallowed_never_calls_original() {
        let spy = Spy::answering(Ok(all_supported()));
        let guarded = GuardedDecodingInfo::wrap(spy.clone(), CodecPolicy::new(Arc::new(FlagTable::new())));

        let vp9 = MediaDecodingConfiguration::video("video/webm; codecs=\"vp9\"");
        let info = smol::block_on(guarded.decoding_info(Some(vp9))).unwrap();

        assert_eq!(info, MediaCapabilitiesInfo::unsupported());
        assert!(info.extra.is_empty());
        assert_eq!(spy.calls(), 0);
    }

    #[test]
    fn test_allowed_passes_through_unchanged() {
        let spy = Spy::answering(Ok(all_supported()));
        let guarded = GuardedDecodingInfo::wrap(spy.clone(), CodecPolicy::new(Arc::new(FlagTable::new())));

        let h264 = MediaDecodingConfiguration::video("video/mp4; codecs=\"avc1.640028\"");
        let info = smol::block_on(guarded.decoding_info(Some(h264))).unwrap();

        assert_eq!(info, all_supported());
        assert_eq!(info.extra.get("extra"), Some(&json!(1)));
        assert_eq!(spy.calls(), 1);
    }

    #[test]
    fn test_missing_config_reaches_original() {
        let spy = Spy::answering(Err(MediaError::NotSupported("configuration required".to_string())));
        let guarded = GuardedDecodingInfo::wrap(spy.clone(), CodecPolicy::new(Arc::new(FlagTable::new())));

        let err = smol::block_on(guarded.decoding_info(None)).unwrap_err();
        assert_eq!(err, MediaError::NotSupported("configuration required".to_string()));
        assert_eq!(spy.calls(), 1);
    }

    #[test]
    fn test_rejection_propagates() {
        let spy = Spy::answering(Err(MediaError::InvalidState("document hidden".to_string())));
        let guarded = GuardedDecodingInfo::wrap(spy.clone(), CodecPolicy::new(Arc::new(FlagTable::new())));

        let h264 = MediaDecodingConfiguration::video("video/mp4; codecs=\"avc1\"");
        let err = smol::block_on(guarded.decoding_info(Some(h264))).unwrap_err();
        assert_eq!(err, MediaError::InvalidState("document hidden".to_string()));
    }

    #[test]
    fn test_recheck_after_flag_change() {
        let flags = Arc::new(FlagTable::new());
        flags.set(AV1_ONLY_KEY, true);
        let spy = Spy::answering(Ok(all_supported()));
        let guarded = GuardedDecodingInfo::wrap(spy.clone(), CodecPolicy::new(flags.clone()));

        let vp9 = MediaDecodingConfiguration::video("video/webm; codecs=\"vp9\"");
        let pending = guarded.decoding_info(Some(vp9));
        assert_eq!(spy.calls(), 1);

        // Settings change while the query is in flight
        flags.set(AV1_ONLY_KEY, false);
        let info = smol::block_on(pending).unwrap();

        assert!(!info.supported);
        assert!(!info.smooth);
        assert!(!info.power_efficient);
        assert_eq!(info.extra.get("extra"), Some(&json!(1)));
    }

    #[test]
    fn test_high_framerate_field() {
        let flags = Arc::new(FlagTable::new());
        flags.set(BLOCK_60FPS_KEY, true);
        let spy = Spy::answering(Ok(all_supported()));
        let guarded = GuardedDecodingInfo::wrap(spy.clone(), CodecPolicy::new(flags));

        let fast = MediaDecodingConfiguration::video("video/mp4; codecs=\"avc1\"").with_framerate(60.0);
        let info = smol::block_on(guarded.decoding_info(Some(fast))).unwrap();
        assert!(!info.supported);
        assert_eq!(spy.calls(), 0);
    }

    #[test]
    fn test_force_unsupported_keeps_extra() {
        let info = force_unsupported(all_supported());
        assert_eq!(info, MediaCapabilitiesInfo::new(false, false, false).with_extra("extra", json!(1)));
    }
}
