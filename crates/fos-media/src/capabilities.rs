//! Media Capabilities
//!
//! `navigator.mediaCapabilities.decodingInfo()`.
//!
//! Configurations arrive from page script, so every field is optional and a
//! field of the wrong JSON type reads as absent instead of failing the whole
//! configuration.

use std::sync::Arc;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::MediaError;
use crate::codecs::{CodecRegistry, CodecSupport, MimeType};

/// Future returned by [`DecodingInfo::decoding_info`]
pub type DecodingFuture = smol::future::Boxed<Result<MediaCapabilitiesInfo, MediaError>>;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `MediaDecodingConfiguration` dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDecodingConfiguration {
    /// `"file"`, `"media-source"` or `"webrtc"`
    #[serde(rename = "type", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoConfiguration>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfiguration>,
}

impl MediaDecodingConfiguration {
    /// Build from a page-supplied JSON value; anything that is not an
    /// object yields `None`.
    pub fn from_json(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Video-only `"file"` configuration
    pub fn video(content_type: &str) -> Self {
        Self {
            kind: Some("file".to_string()),
            video: Some(VideoConfiguration {
                content_type: Some(content_type.to_string()),
                ..Default::default()
            }),
            audio: None,
        }
    }

    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.video.get_or_insert_with(Default::default).framerate = Some(framerate);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        let video = self.video.get_or_insert_with(Default::default);
        video.width = Some(width);
        video.height = Some(height);
        self
    }
}

/// `VideoConfiguration` dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfiguration {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub framerate: Option<f64>,
}

/// `AudioConfiguration` dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfiguration {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub samplerate: Option<u32>,
}

/// `MediaCapabilitiesInfo` result; unknown members survive in `extra`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCapabilitiesInfo {
    pub supported: bool,
    pub smooth: bool,
    pub power_efficient: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaCapabilitiesInfo {
    pub fn new(supported: bool, smooth: bool, power_efficient: bool) -> Self {
        Self { supported, smooth, power_efficient, extra: Map::new() }
    }

    /// `{ supported: false, smooth: false, powerEfficient: false }`
    pub fn unsupported() -> Self {
        Self::default()
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

/// Asynchronous structured capability query
pub trait DecodingInfo: Send + Sync {
    fn decoding_info(&self, config: Option<MediaDecodingConfiguration>) -> DecodingFuture;
}

/// Built-in `decodingInfo()` backed by the codec registry
#[derive(Debug, Clone)]
pub struct NativeMediaCapabilities {
    registry: Arc<CodecRegistry>,
}

impl NativeMediaCapabilities {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    fn evaluate(&self, config: &MediaDecodingConfiguration) -> Result<MediaCapabilitiesInfo, MediaError> {
        if let Some(video) = &config.video {
            return Ok(self.evaluate_video(video));
        }
        if let Some(audio) = &config.audio {
            let supported = audio
                .content_type
                .as_deref()
                .and_then(MimeType::parse)
                .is_some_and(|mime| self.registry.support_for(&mime) == CodecSupport::Supported);
            return Ok(MediaCapabilitiesInfo::new(supported, supported, supported));
        }
        Err(MediaError::NotSupported(
            "decoding configuration has neither audio nor video".to_string(),
        ))
    }

    fn evaluate_video(&self, video: &VideoConfiguration) -> MediaCapabilitiesInfo {
        let Some(mime) = video.content_type.as_deref().and_then(MimeType::parse) else {
            return MediaCapabilitiesInfo::unsupported();
        };
        if self.registry.support_for(&mime) != CodecSupport::Supported {
            return MediaCapabilitiesInfo::unsupported();
        }
        let Some(decoder) = self.registry.video_decoder_for(&mime) else {
            return MediaCapabilitiesInfo::unsupported();
        };

        let fits = video.width.is_none_or(|w| w <= decoder.max_width)
            && video.height.is_none_or(|h| h <= decoder.max_height);
        if !fits {
            return MediaCapabilitiesInfo::unsupported();
        }

        let smooth = video.framerate.is_none_or(|f| f <= decoder.max_frame_rate);
        MediaCapabilitiesInfo::new(true, smooth, decoder.hardware_accelerated)
    }
}

impl DecodingInfo for NativeMediaCapabilities {
    fn decoding_info(&self, config: Option<MediaDecodingConfiguration>) -> DecodingFuture {
        let result = match config {
            Some(config) => self.evaluate(&config),
            None => Err(MediaError::NotSupported("decoding configuration is required".to_string())),
        };
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn native() -> NativeMediaCapabilities {
        NativeMediaCapabilities::new(Arc::new(CodecRegistry::new()))
    }

    #[test]
    fn test_config_from_json() {
        let config = MediaDecodingConfiguration::from_json(json!({
            "type": "media-source",
            "video": {
                "contentType": "video/webm; codecs=\"vp09.00.10.08\"",
                "width": 1920,
                "height": 1080,
                "bitrate": 2_500_000,
                "framerate": 60
            }
        }))
        .unwrap();

        let video = config.video.unwrap();
        assert_eq!(config.kind.as_deref(), Some("media-source"));
        assert_eq!(video.framerate, Some(60.0));
        assert_eq!(video.width, Some(1920));
    }

    #[test]
    fn test_config_malformed_fields() {
        let config = MediaDecodingConfiguration::from_json(json!({
            "video": { "contentType": 42, "framerate": "sixty" }
        }))
        .unwrap();
        let video = config.video.unwrap();
        assert!(video.content_type.is_none());
        assert!(video.framerate.is_none());

        let config = MediaDecodingConfiguration::from_json(json!({ "video": "vp9" })).unwrap();
        assert!(config.video.is_none());

        assert!(MediaDecodingConfiguration::from_json(json!("video/webm")).is_none());
        assert!(MediaDecodingConfiguration::from_json(Value::Null).is_none());
    }

    #[test]
    fn test_info_extra_fields() {
        let info: MediaCapabilitiesInfo = serde_json::from_value(json!({
            "supported": true,
            "smooth": true,
            "powerEfficient": false,
            "keySystemAccess": null
        }))
        .unwrap();
        assert!(info.supported);
        assert!(!info.power_efficient);
        assert!(info.extra.contains_key("keySystemAccess"));

        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back["powerEfficient"], json!(false));
    }

    #[test]
    fn test_native_decoding_info() {
        let caps = native();

        let h264 = MediaDecodingConfiguration::video("video/mp4; codecs=\"avc1.640028\"")
            .with_size(1920, 1080)
            .with_framerate(30.0);
        let info = smol::block_on(caps.decoding_info(Some(h264))).unwrap();
        assert_eq!(info, MediaCapabilitiesInfo::new(true, true, true));

        let av1 = MediaDecodingConfiguration::video("video/mp4; codecs=\"av01.0.05M.08\"");
        let info = smol::block_on(caps.decoding_info(Some(av1))).unwrap();
        assert!(info.supported);
        assert!(!info.power_efficient);

        let too_big = MediaDecodingConfiguration::video("video/webm; codecs=\"vp9\"")
            .with_size(7680, 4320);
        let info = smol::block_on(caps.decoding_info(Some(too_big))).unwrap();
        assert!(!info.supported);

        let fast = MediaDecodingConfiguration::video("video/webm; codecs=\"vp9\"")
            .with_framerate(120.0);
        let info = smol::block_on(caps.decoding_info(Some(fast))).unwrap();
        assert!(info.supported);
        assert!(!info.smooth);
    }

    #[test]
    fn test_native_decoding_info_rejects_empty() {
        let caps = native();
        assert!(smol::block_on(caps.decoding_info(None)).is_err());
        assert!(smol::block_on(caps.decoding_info(Some(MediaDecodingConfiguration::default()))).is_err());
    }
}
