use std::path::Path;

use crate::captions::segment::CaptionSegment;
use crate::captions::whisper_api::WhisperApi;
use crate::captions::whisper_local::LocalWhisper;
use crate::collab::openai::OpenAiClient;
use crate::foundation::error::{ReelError, ReelResult};
use crate::settings::{ApiSettings, TranscriptionPreference, TranscriptionSettings};

/// Word-level speech-to-text for one narration clip.
pub trait Transcriber {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Transcribe `audio`; `prompt` is the known narration text, passed as a decoding hint.
    ///
    /// Times in the result are relative to the start of the clip.
    fn transcribe(&self, audio: &Path, prompt: &str) -> ReelResult<Vec<CaptionSegment>>;
}

/// Primary transcriber with a fallback.
///
/// Only [`ReelError::Transcription`] from the primary triggers the fallback; any other error is
/// returned as is.
pub struct TranscriptionBackends {
    primary: Box<dyn Transcriber>,
    secondary: Box<dyn Transcriber>,
}

impl TranscriptionBackends {
    pub fn new(primary: Box<dyn Transcriber>, secondary: Box<dyn Transcriber>) -> Self {
        Self { primary, secondary }
    }

    /// Local whisper and the HTTP API, ordered by `transcription.prefer`.
    ///
    /// A missing API key does not fail here; the API slot reports it when it is called.
    pub fn from_settings(transcription: &TranscriptionSettings, api: &ApiSettings) -> Self {
        let local: Box<dyn Transcriber> = Box::new(LocalWhisper::new(
            transcription.whisper_command.clone(),
            transcription.whisper_model.clone(),
        ));
        let remote: Box<dyn Transcriber> = match OpenAiClient::from_api_settings(api) {
            Ok(client) => Box::new(WhisperApi::new(client, transcription.api_model.clone())),
            Err(e) => Box::new(Unavailable {
                name: "whisper-api".to_string(),
                reason: e.to_string(),
            }),
        };
        match transcription.prefer {
            TranscriptionPreference::Local => Self::new(local, remote),
            TranscriptionPreference::Api => Self::new(remote, local),
        }
    }

    pub fn primary_name(&self) -> &str {
        self.primary.name()
    }

    pub fn secondary_name(&self) -> &str {
        self.secondary.name()
    }
}

impl Transcriber for TranscriptionBackends {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn transcribe(&self, audio: &Path, prompt: &str) -> ReelResult<Vec<CaptionSegment>> {
        let primary_err = match self.primary.transcribe(audio, prompt) {
            Ok(segments) => return Ok(segments),
            Err(ReelError::Transcription(msg)) => msg,
            Err(other) => return Err(other),
        };
        tracing::warn!(
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %primary_err,
            "primary transcriber failed, falling back"
        );
        match self.secondary.transcribe(audio, prompt) {
            Ok(segments) => Ok(segments),
            Err(e) => Err(ReelError::transcription(format!(
                "{} failed: {primary_err}; {} failed: {e}",
                self.primary.name(),
                self.secondary.name()
            ))),
        }
    }
}

/// Backend that could not be constructed; every call fails with the construction error.
struct Unavailable {
    name: String,
    reason: String,
}

impl Transcriber for Unavailable {
    fn name(&self) -> &str {
        &self.name
    }

    fn transcribe(&self, _audio: &Path, _prompt: &str) -> ReelResult<Vec<CaptionSegment>> {
        Err(ReelError::transcription(format!(
            "{} unavailable: {}",
            self.name, self.reason
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/transcribe.rs"]
mod tests;
