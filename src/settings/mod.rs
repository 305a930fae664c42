//! Typed job settings.
//!
//! Settings are read once from a JSON file, filled with defaults for every absent field, and
//! validated before any stage runs. Stages receive the validated struct and never look up keys
//! ad hoc.

use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Root settings object.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output video geometry and encoding.
    pub video: VideoSettings,
    /// Optional logo overlay.
    pub branding: BrandingSettings,
    /// Opaque options forwarded to the caption burner.
    pub captions: serde_json::Map<String, serde_json::Value>,
    /// Image generator options.
    pub image: ImageSettings,
    /// Text-to-speech options.
    pub tts: TtsSettings,
    /// Transcription backend selection.
    pub transcription: TranscriptionSettings,
    /// Script generation options.
    pub llm: LlmSettings,
    /// Upload metadata defaults.
    pub upload: UploadSettings,
    /// HTTP API endpoint and credentials lookup.
    pub api: ApiSettings,
}

/// `video` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Integer frames per second.
    pub fps: u32,
    /// Codec tag (`avc1`, `hevc`, `mp4v`) or a raw ffmpeg encoder name.
    pub codec: String,
    /// Transition length is `fps / slide_speed_multiplier` frames.
    pub slide_speed_multiplier: f64,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            fps: 30,
            codec: "avc1".to_string(),
            slide_speed_multiplier: 1.0,
        }
    }
}

impl VideoSettings {
    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Output frame rate.
    pub fn frame_rate(&self) -> ReelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// ffmpeg encoder name for the configured codec tag.
    pub fn encoder(&self) -> &str {
        match self.codec.trim().to_ascii_lowercase().as_str() {
            "avc1" | "h264" | "x264" | "avc" => "libx264",
            "hvc1" | "hev1" | "hevc" | "h265" => "libx265",
            "mp4v" | "mpeg4" => "mpeg4",
            "vp09" | "vp9" => "libvpx-vp9",
            _ => self.codec.trim(),
        }
    }
}

/// Canvas corner a logo offset is measured from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    /// Offset from the top-left corner.
    #[default]
    TopLeft,
    /// Offset from the top-right corner.
    TopRight,
    /// Offset from the bottom-left corner.
    BottomLeft,
    /// Offset from the bottom-right corner.
    BottomRight,
}

/// `branding` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrandingSettings {
    /// Logo image path; branding is off when absent.
    pub logo: Option<PathBuf>,
    /// Horizontal offset from the anchor corner, in pixels.
    #[serde(rename = "logo-x")]
    pub logo_x: u32,
    /// Vertical offset from the anchor corner, in pixels.
    #[serde(rename = "logo-y")]
    pub logo_y: u32,
    /// Logo height as a fraction of canvas height.
    #[serde(rename = "logo-scale")]
    pub logo_scale: f64,
    /// Anchor corner.
    pub corner: Corner,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            logo: None,
            logo_x: 20,
            logo_y: 20,
            logo_scale: 0.1,
            corner: Corner::TopLeft,
        }
    }
}

/// `image` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Image model name.
    pub model: String,
    /// Requested size, `WxH`.
    pub size: String,
    /// Requested quality tier.
    pub quality: String,
    /// Art-style bible (`{"art_movements": [...]}`); no style prompt when absent.
    pub style_bible: Option<PathBuf>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            style_bible: None,
        }
    }
}

/// `tts` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TtsSettings {
    /// Speech model name.
    pub model: String,
    /// Voice name.
    pub voice: String,
    /// Attempts per clip before the job fails.
    pub max_attempts: u32,
    /// Base delay of the exponential backoff.
    pub backoff_millis: u64,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            model: "tts-1".to_string(),
            voice: "onyx".to_string(),
            max_attempts: 3,
            backoff_millis: 1000,
        }
    }
}

/// Which transcription backend is tried first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionPreference {
    /// Local whisper CLI first, remote API second.
    #[default]
    Local,
    /// Remote API first, local whisper CLI second.
    Api,
}

/// `transcription` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Backend priority.
    pub prefer: TranscriptionPreference,
    /// Local whisper executable.
    pub whisper_command: String,
    /// Local whisper model name.
    pub whisper_model: String,
    /// Remote transcription model name.
    pub api_model: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            prefer: TranscriptionPreference::Local,
            whisper_command: "whisper".to_string(),
            whisper_model: "base".to_string(),
            api_model: "whisper-1".to_string(),
        }
    }
}

/// `llm` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model used to write scripts.
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
        }
    }
}

/// `upload` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Channel handle, informational only.
    pub youtube_channel: Option<String>,
    /// Platform category id.
    pub youtube_category: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            youtube_channel: None,
            youtube_category: "22".to_string(),
        }
    }
}

/// `api` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// OpenAI-compatible base URL.
    pub base_url: String,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text and validate them.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let settings: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::serde(format!("settings json parse failed: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse, and validate a settings file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ReelError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Load from `path` when given, otherwise return validated defaults.
    pub fn load_or_default(path: Option<&Path>) -> ReelResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => {
                let s = Self::default();
                s.validate()?;
                Ok(s)
            }
        }
    }

    /// Check every invariant downstream stages rely on.
    pub fn validate(&self) -> ReelResult<()> {
        let v = &self.video;
        if v.width == 0 || v.height == 0 {
            return Err(ReelError::validation("video width/height must be non-zero"));
        }
        if !v.width.is_multiple_of(2) || !v.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "video width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if v.fps == 0 {
            return Err(ReelError::validation("video fps must be > 0"));
        }
        if v.codec.trim().is_empty() {
            return Err(ReelError::validation("video codec must be non-empty"));
        }
        if !v.slide_speed_multiplier.is_finite() || v.slide_speed_multiplier <= 0.0 {
            return Err(ReelError::validation(
                "video slide_speed_multiplier must be finite and > 0",
            ));
        }

        let b = &self.branding;
        if !b.logo_scale.is_finite() || b.logo_scale <= 0.0 || b.logo_scale > 1.0 {
            return Err(ReelError::validation(
                "branding logo-scale must be in (0, 1]",
            ));
        }

        if self.tts.max_attempts == 0 {
            return Err(ReelError::validation("tts max_attempts must be >= 1"));
        }
        if self.api.api_key_env.trim().is_empty() {
            return Err(ReelError::validation("api api_key_env must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/settings.rs"]
mod tests;
