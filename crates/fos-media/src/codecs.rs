//! Media Codecs
//!
//! MIME type parsing and decoder capability lookup.

use std::collections::HashMap;

/// Supported codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    // Video codecs
    H264,
    H265,
    VP8,
    VP9,
    AV1,

    // Audio codecs
    AAC,
    MP3,
    Opus,
    Vorbis,
    FLAC,
}

impl CodecType {
    /// Identify a codec from an RFC 6381 codec string such as
    /// `avc1.42E01E` or `vp09.00.10.08`.
    pub fn from_codec_string(codec: &str) -> Option<Self> {
        let codec = codec.trim().trim_matches('"').trim();
        let fourcc = codec.split('.').next().unwrap_or(codec).to_ascii_lowercase();
        match fourcc.as_str() {
            "avc1" | "avc3" => Some(Self::H264),
            "hev1" | "hvc1" => Some(Self::H265),
            "vp8" | "vp08" => Some(Self::VP8),
            "vp9" | "vp09" => Some(Self::VP9),
            "av01" => Some(Self::AV1),
            "mp4a" => Some(Self::AAC),
            "mp3" => Some(Self::MP3),
            "opus" => Some(Self::Opus),
            "vorbis" => Some(Self::Vorbis),
            "flac" => Some(Self::FLAC),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::H264 => "video/avc",
            Self::H265 => "video/hevc",
            Self::VP8 => "video/vp8",
            Self::VP9 => "video/vp9",
            Self::AV1 => "video/av1",
            Self::AAC => "audio/aac",
            Self::MP3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Vorbis => "audio/vorbis",
            Self::FLAC => "audio/flac",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::H264 | Self::H265 | Self::VP8 | Self::VP9 | Self::AV1)
    }

    pub fn is_audio(&self) -> bool {
        !self.is_video()
    }
}

/// Containers the engine can demux
const KNOWN_CONTAINERS: &[&str] = &[
    "video/mp4", "audio/mp4", "video/webm", "audio/webm",
    "video/ogg", "audio/ogg", "audio/mpeg", "audio/mp3",
    "audio/flac", "audio/wav",
];

/// Parsed MIME type: `essence; param=value; codecs="a, b"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    /// Lower-cased `type/subtype`
    pub essence: String,
    pub codecs: Vec<String>,
    pub params: Vec<(String, String)>,
}

impl MimeType {
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split(';');
        let essence = parts.next()?.trim().to_ascii_lowercase();
        let (kind, subtype) = essence.split_once('/')?;
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }

        let mut codecs = Vec::new();
        let mut params = Vec::new();
        for part in parts {
            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"').to_string();
            if name == "codecs" {
                codecs = value
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            params.push((name, value));
        }

        Some(Self { essence, codecs, params })
    }

    /// Get a parameter by (lower-case) name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_known_container(&self) -> bool {
        KNOWN_CONTAINERS.contains(&self.essence.as_str())
    }
}

/// Codec support check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSupport {
    Supported,
    Unsupported,
    MaybeSupported,
}

/// Codec info
#[derive(Debug, Clone)]
pub struct CodecInfo {
    pub codec: CodecType,
    pub hardware_accelerated: bool,
    pub max_width: u32,
    pub max_height: u32,
    pub max_frame_rate: f64,
}

/// Codec registry
#[derive(Debug, Default)]
pub struct CodecRegistry {
    decoders: HashMap<CodecType, CodecInfo>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        let video_codecs = [
            (CodecType::H264, true),
            (CodecType::VP8, false),
            (CodecType::VP9, false),
            (CodecType::AV1, false),
        ];
        for (codec, hardware_accelerated) in video_codecs {
            self.decoders.insert(codec, CodecInfo {
                codec,
                hardware_accelerated,
                max_width: 4096,
                max_height: 2160,
                max_frame_rate: 60.0,
            });
        }

        let audio_codecs = [
            CodecType::AAC,
            CodecType::MP3,
            CodecType::Opus,
            CodecType::Vorbis,
            CodecType::FLAC,
        ];
        for codec in audio_codecs {
            self.decoders.insert(codec, CodecInfo {
                codec,
                hardware_accelerated: false,
                max_width: 0,
                max_height: 0,
                max_frame_rate: 0.0,
            });
        }
    }

    /// Register a decoder
    pub fn register_decoder(&mut self, info: CodecInfo) {
        self.decoders.insert(info.codec, info);
    }

    pub fn decoder(&self, codec: CodecType) -> Option<&CodecInfo> {
        self.decoders.get(&codec)
    }

    pub fn is_decode_supported(&self, codec: CodecType) -> bool {
        self.decoders.contains_key(&codec)
    }

    /// Check whether a parsed MIME type can be demuxed and decoded
    pub fn support_for(&self, mime: &MimeType) -> CodecSupport {
        if !mime.is_known_container() {
            return CodecSupport::Unsupported;
        }
        if mime.codecs.is_empty() {
            return CodecSupport::MaybeSupported;
        }

        let all_decodable = mime.codecs.iter().all(|c| {
            CodecType::from_codec_string(c).is_some_and(|codec| self.is_decode_supported(codec))
        });
        if all_decodable {
            CodecSupport::Supported
        } else {
            CodecSupport::Unsupported
        }
    }

    /// First video decoder named by a MIME type's codecs
    pub fn video_decoder_for(&self, mime: &MimeType) -> Option<&CodecInfo> {
        mime.codecs
            .iter()
            .filter_map(|c| CodecType::from_codec_string(c))
            .find(|codec| codec.is_video())
            .and_then(|codec| self.decoder(codec))
    }
}
