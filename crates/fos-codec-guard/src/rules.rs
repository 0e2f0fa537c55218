//! Codec Rules
//!
//! Decides whether a MIME/codec string or a decoding configuration is
//! disallowed. Tokens match as substrings so codec names inside MIME
//! parameters (`video/webm; codecs="vp9"`) are caught.

use std::fmt;
use std::sync::Arc;

use fos_media::MediaDecodingConfiguration;

use crate::config::{FlagSource, GuardConfig};

/// Blocks everything but H.264
pub const DEFAULT_DISALLOWED: &[&str] = &["webm", "vp8", "vp08", "vp9", "vp09", "av01", "av1"];

/// Lets VP9 and H.264 through; VP8 stays blocked
pub const AV1_ONLY_DISALLOWED: &[&str] = &["vp8", "vp08", "av01", "av1"];

/// Highest framerate allowed when high-framerate blocking is on
pub const MAX_FRAMERATE: u64 = 30;

const FRAMERATE_PARAM: &str = "framerate=";

/// Integer following the first `framerate=` that has digits after it.
/// Values too large for `u64` saturate.
pub fn embedded_framerate(text: &str) -> Option<u64> {
    let text = text.to_ascii_lowercase();
    text.match_indices(FRAMERATE_PARAM).find_map(|(idx, _)| {
        let rest = &text[idx + FRAMERATE_PARAM.len()..];
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        (len > 0).then(|| rest[..len].parse().unwrap_or(u64::MAX))
    })
}

impl GuardConfig {
    pub fn disallowed_tokens(&self) -> &'static [&'static str] {
        if self.av1_only_mode {
            AV1_ONLY_DISALLOWED
        } else {
            DEFAULT_DISALLOWED
        }
    }

    /// `type_lower` must already be lower-cased. Empty input is never
    /// disallowed.
    pub fn is_disallowed_type(&self, type_lower: &str) -> bool {
        if type_lower.is_empty() {
            return false;
        }
        if self.disallowed_tokens().iter().any(|token| type_lower.contains(token)) {
            return true;
        }
        self.block_high_framerate
            && embedded_framerate(type_lower).is_some_and(|fps| fps > MAX_FRAMERATE)
    }

    /// Missing configuration, video part or fields all count as allowed.
    pub fn is_disallowed_decoding_config(&self, config: Option<&MediaDecodingConfiguration>) -> bool {
        let Some(video) = config.and_then(|c| c.video.as_ref()) else {
            return false;
        };

        let content_type = video.content_type.as_deref().map(str::to_lowercase);
        if let Some(ct) = content_type.as_deref() {
            if self.is_disallowed_type(ct) {
                return true;
            }
        }

        if !self.block_high_framerate {
            return false;
        }
        if video.framerate.is_some_and(|fps| fps > MAX_FRAMERATE as f64) {
            return true;
        }
        content_type
            .as_deref()
            .and_then(embedded_framerate)
            .is_some_and(|fps| fps > MAX_FRAMERATE)
    }
}

/// Rules evaluated against the live flag cache.
///
/// Every call takes a fresh [`GuardConfig`] snapshot, so flag changes are
/// visible to the next query.
#[derive(Clone)]
pub struct CodecPolicy {
    flags: Arc<dyn FlagSource>,
}

impl fmt::Debug for CodecPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecPolicy").field("config", &self.snapshot()).finish()
    }
}

impl CodecPolicy {
    pub fn new(flags: Arc<dyn FlagSource>) -> Self {
        Self { flags }
    }

    pub fn snapshot(&self) -> GuardConfig {
        GuardConfig::read(self.flags.as_ref())
    }

    pub fn is_disallowed_type(&self, type_lower: &str) -> bool {
        self.snapshot().is_disallowed_type(type_lower)
    }

    pub fn is_disallowed_decoding_config(&self, config: Option<&MediaDecodingConfiguration>) -> bool {
        self.snapshot().is_disallowed_decoding_config(config)
    }
}
