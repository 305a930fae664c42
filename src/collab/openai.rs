use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use reqwest::blocking::{Client, Response, multipart};
use serde_json::json;

use crate::collab::{ImageGenerator, ScriptWriter, SpeechSynthesizer};
use crate::foundation::error::{ReelError, ReelResult};
use crate::settings::{ApiSettings, ImageSettings, LlmSettings, Settings, TtsSettings};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

const SCRIPT_SYSTEM_PROMPT: &str = r#"You are a YouTube short narration generator. You generate 30 seconds to 1 minute of narration. The shorts you create have a background that changes from image to image as the narration is going on.

You will need to generate descriptions of images for each of the sentences in the short. They will be passed to an AI image generator. Never use names of celebrities or real people in the image descriptions; describe persons without their names. You may use real names in the narration. Only image descriptions are restricted.

The narration will be fed into a text-to-speech engine, so don't use special characters.

Respond with a pair of an image description in square brackets and a narration below it. Both of them should be on their own lines, as follows:

###

[Description of a background image]

Narrator: "One sentence of narration"

[Description of a background image]

Narrator: "One sentence of narration"

###

The short should be 6 sentences maximum. You may add `Title:`, `Description:` and `Tags: ["tag", ...]` lines for the upload."#;

/// Blocking client for an OpenAI-compatible HTTP API.
///
/// Implements the script writer, image generator and speech synthesizer collaborators and
/// serves the remote transcription backend.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    llm: LlmSettings,
    image: ImageSettings,
    tts: TtsSettings,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("llm", &self.llm)
            .field("image", &self.image)
            .field("tts", &self.tts)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> ReelResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReelError::collaborator(format!("failed to build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            llm: LlmSettings::default(),
            image: ImageSettings::default(),
            tts: TtsSettings::default(),
        })
    }

    /// Client for `api.base_url`, keyed from the environment variable named by `api.api_key_env`.
    pub fn from_api_settings(api: &ApiSettings) -> ReelResult<Self> {
        let api_key = std::env::var(&api.api_key_env).map_err(|_| {
            ReelError::collaborator(format!(
                "{} is not set (needed for the {} API)",
                api.api_key_env, api.base_url
            ))
        })?;
        Self::new(api.base_url.clone(), api_key)
    }

    /// Client configured with every model choice from `settings`.
    pub fn from_settings(settings: &Settings) -> ReelResult<Self> {
        Ok(Self::from_api_settings(&settings.api)?.with_models(
            settings.llm.clone(),
            settings.image.clone(),
            settings.tts.clone(),
        ))
    }

    pub fn with_models(mut self, llm: LlmSettings, image: ImageSettings, tts: TtsSettings) -> Self {
        self.llm = llm;
        self.image = image;
        self.tts = tts;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    fn post_json(&self, path: &str, body: &serde_json::Value) -> ReelResult<Response> {
        let res = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| ReelError::collaborator(format!("{path} request failed: {e}")))?;
        check_status(path, res)
    }

    /// One chat completion with a system and a user message; returns the assistant text.
    pub fn chat(&self, system: &str, user: &str) -> ReelResult<String> {
        let body = json!({
            "model": self.llm.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });
        let v: serde_json::Value = self
            .post_json("chat/completions", &body)?
            .json()
            .map_err(|e| ReelError::collaborator(format!("chat response: {e}")))?;
        v.pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| ReelError::collaborator("chat response has no message content"))
    }

    /// Generate one image and return the encoded bytes.
    pub fn generate_image_bytes(&self, prompt: &str) -> ReelResult<Vec<u8>> {
        let body = json!({
            "model": self.image.model,
            "prompt": prompt,
            "size": self.image.size,
            "quality": self.image.quality,
            "n": 1,
            "response_format": "b64_json",
        });
        let v: serde_json::Value = self
            .post_json("images/generations", &body)?
            .json()
            .map_err(|e| ReelError::collaborator(format!("image response: {e}")))?;
        let b64 = v
            .pointer("/data/0/b64_json")
            .and_then(|d| d.as_str())
            .ok_or_else(|| ReelError::collaborator("image response has no b64_json payload"))?;
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| ReelError::collaborator(format!("image payload is not base64: {e}")))
    }

    /// Synthesize `text` to MP3 bytes.
    pub fn speech_bytes(&self, text: &str) -> ReelResult<Vec<u8>> {
        let body = json!({
            "model": self.tts.model,
            "input": text,
            "voice": self.tts.voice,
            "response_format": "mp3",
        });
        let bytes = self
            .post_json("audio/speech", &body)?
            .bytes()
            .map_err(|e| ReelError::collaborator(format!("speech response: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Upload `audio` for transcription and return the raw `verbose_json` body.
    pub fn transcribe_verbose(&self, audio: &Path, model: &str, prompt: &str) -> ReelResult<String> {
        let bytes = std::fs::read(audio).map_err(|e| ReelError::io(audio, e))?;
        let file_name = audio
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("audio.mp3")
            .to_string();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| ReelError::collaborator(format!("failed to build multipart part: {e}")))?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("model", model.to_string())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .text("timestamp_granularities[]", "segment");
        if !prompt.trim().is_empty() {
            form = form.text("prompt", prompt.to_string());
        }

        let path = "audio/transcriptions";
        let res = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| ReelError::collaborator(format!("{path} request failed: {e}")))?;
        check_status(path, res)?
            .text()
            .map_err(|e| ReelError::collaborator(format!("transcription body: {e}")))
    }
}

fn check_status(path: &str, res: Response) -> ReelResult<Response> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let body = res.text().unwrap_or_default();
    Err(ReelError::collaborator(format!("{path} failed: {status}: {body}")))
}

impl ScriptWriter for OpenAiClient {
    fn write_script(&self, source_material: &str) -> ReelResult<String> {
        let user = format!(
            "Create a YouTube short narration based on the following source material:\n\n{source_material}"
        );
        self.chat(SCRIPT_SYSTEM_PROMPT, &user)
    }
}

impl ImageGenerator for OpenAiClient {
    fn generate_image(&self, prompt: &str, out_path: &Path) -> ReelResult<()> {
        let bytes = self.generate_image_bytes(prompt)?;
        // Job images are always PNG.
        let img = image::load_from_memory(&bytes)
            .map_err(|e| ReelError::collaborator(format!("generated image is undecodable: {e}")))?;
        img.save_with_format(out_path, image::ImageFormat::Png)
            .map_err(|e| ReelError::collaborator(format!("write '{}': {e}", out_path.display())))
    }
}

impl SpeechSynthesizer for OpenAiClient {
    fn synthesize(&self, text: &str, out_path: &Path) -> ReelResult<()> {
        let bytes = self.speech_bytes(text)?;
        if bytes.is_empty() {
            return Err(ReelError::collaborator("speech response was empty"));
        }
        std::fs::write(out_path, bytes).map_err(|e| ReelError::io(out_path, e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/openai.rs"]
mod tests;
