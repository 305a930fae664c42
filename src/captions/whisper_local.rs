use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::captions::segment::{CaptionSegment, CaptionWord};
use crate::captions::transcribe::Transcriber;
use crate::foundation::error::{ReelError, ReelResult};

/// Runs a local `whisper` command line with word timestamps and reads back its JSON output.
#[derive(Clone, Debug)]
pub struct LocalWhisper {
    command: String,
    model: String,
}

impl LocalWhisper {
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
        }
    }

    fn build_command(&self, audio: &Path, prompt: &str, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(audio)
            .args(["--model", &self.model])
            .args(["--word_timestamps", "True"])
            .args(["--output_format", "json"])
            .args(["--verbose", "False"])
            .arg("--output_dir")
            .arg(out_dir);
        if !prompt.trim().is_empty() {
            cmd.args(["--initial_prompt", prompt]);
        }
        cmd
    }
}

impl Transcriber for LocalWhisper {
    fn name(&self) -> &str {
        "whisper-local"
    }

    fn transcribe(&self, audio: &Path, prompt: &str) -> ReelResult<Vec<CaptionSegment>> {
        if !audio.is_file() {
            return Err(ReelError::missing_asset(audio));
        }
        let out_dir = TempDirGuard::create("reelforge_whisper")?;
        let out = self
            .build_command(audio, prompt, out_dir.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ReelError::transcription(format!("failed to run {}: {e}", self.command)))?;
        if !out.status.success() {
            return Err(ReelError::transcription(format!(
                "{} exited with status {}: {}",
                self.command,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let stem = audio
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let json_path = out_dir.path().join(format!("{stem}.json"));
        let raw = std::fs::read_to_string(&json_path).map_err(|e| {
            ReelError::transcription(format!(
                "whisper output '{}' unreadable: {e}",
                json_path.display()
            ))
        })?;
        parse_whisper_json(&raw)
    }
}

/// Parse the JSON document written by `whisper --output_format json`.
pub fn parse_whisper_json(raw: &str) -> ReelResult<Vec<CaptionSegment>> {
    let v: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ReelError::transcription(format!("invalid whisper json: {e}")))?;
    let segments = v
        .get("segments")
        .and_then(|s| s.as_array())
        .ok_or_else(|| ReelError::transcription("whisper json missing 'segments' array"))?;

    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let start = seg.get("start").and_then(|x| x.as_f64()).unwrap_or(0.0);
        let end = seg.get("end").and_then(|x| x.as_f64()).unwrap_or(start);
        let text = seg
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        let words = seg
            .get("words")
            .and_then(|w| w.as_array())
            .map(|words| words.iter().filter_map(parse_word).collect())
            .unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        out.push(CaptionSegment {
            start,
            end,
            text,
            words,
        });
    }
    Ok(out)
}

/// One `{ "word", "start", "end" }` object; whisper prefixes words with a space.
pub(crate) fn parse_word(w: &serde_json::Value) -> Option<CaptionWord> {
    let text = w.get("word").and_then(|t| t.as_str())?.trim();
    if text.is_empty() {
        return None;
    }
    let start = w.get("start").and_then(|x| x.as_f64())?;
    let end = w.get("end").and_then(|x| x.as_f64()).unwrap_or(start);
    Some(CaptionWord {
        start,
        end,
        text: text.to_string(),
    })
}

struct TempDirGuard(PathBuf);

impl TempDirGuard {
    fn create(prefix: &str) -> ReelResult<Self> {
        let path = std::env::temp_dir().join(format!(
            "{prefix}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        std::fs::create_dir_all(&path).map_err(|e| ReelError::io(&path, e))?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/whisper_local.rs"]
mod tests;
