use std::path::Path;

use crate::captions::segment::{CaptionSegment, CaptionWord};
use crate::captions::transcribe::Transcriber;
use crate::captions::whisper_local::parse_word;
use crate::collab::openai::OpenAiClient;
use crate::foundation::error::{ReelError, ReelResult};

/// Remote transcription through an OpenAI-compatible `/v1/audio/transcriptions` endpoint.
#[derive(Clone, Debug)]
pub struct WhisperApi {
    client: OpenAiClient,
    model: String,
}

impl WhisperApi {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

impl Transcriber for WhisperApi {
    fn name(&self) -> &str {
        "whisper-api"
    }

    fn transcribe(&self, audio: &Path, prompt: &str) -> ReelResult<Vec<CaptionSegment>> {
        if !audio.is_file() {
            return Err(ReelError::missing_asset(audio));
        }
        let raw = self
            .client
            .transcribe_verbose(audio, &self.model, prompt)
            .map_err(|e| ReelError::transcription(e.to_string()))?;
        parse_verbose_json(&raw)
    }
}

/// Parse a `verbose_json` response requested with both word and segment granularity.
///
/// The API returns words in a flat top-level list; each word is attached to the segment whose
/// time range contains it. Without a segment list, all words form one segment.
pub fn parse_verbose_json(raw: &str) -> ReelResult<Vec<CaptionSegment>> {
    let v: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| ReelError::transcription(format!("invalid verbose_json: {e}")))?;

    let words: Vec<CaptionWord> = v
        .get("words")
        .and_then(|w| w.as_array())
        .map(|words| words.iter().filter_map(parse_word).collect())
        .unwrap_or_default();

    let mut segments: Vec<CaptionSegment> = v
        .get("segments")
        .and_then(|s| s.as_array())
        .map(|segs| {
            segs.iter()
                .filter_map(|seg| {
                    let start = seg.get("start").and_then(|x| x.as_f64()).unwrap_or(0.0);
                    let end = seg.get("end").and_then(|x| x.as_f64()).unwrap_or(start);
                    let text = seg.get("text").and_then(|t| t.as_str())?.trim().to_string();
                    (!text.is_empty()).then_some(CaptionSegment {
                        start,
                        end,
                        text,
                        words: Vec::new(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if segments.is_empty() {
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            let text = v.get("text").and_then(|t| t.as_str()).unwrap_or("").trim();
            if text.is_empty() {
                return Ok(Vec::new());
            }
            return Err(ReelError::transcription(
                "verbose_json has text but neither segments nor words",
            ));
        };
        let (start, end) = (first.start, last.end);
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        return Ok(vec![CaptionSegment {
            start,
            end,
            text,
            words,
        }]);
    }

    group_words(&mut segments, words);
    Ok(segments)
}

fn group_words(segments: &mut [CaptionSegment], words: Vec<CaptionWord>) {
    let last = segments.len() - 1;
    let mut seg_idx = 0;
    for word in words {
        let mid = (word.start + word.end) / 2.0;
        while seg_idx < last && mid >= segments[seg_idx].end {
            seg_idx += 1;
        }
        segments[seg_idx].words.push(word);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/whisper_api.rs"]
mod tests;
