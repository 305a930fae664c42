use std::path::Path;

use crate::captions::transcribe::Transcriber;
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::{SceneRecord, scene_offsets_millis};

/// One timed word inside a [`CaptionSegment`]. Times are seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionWord {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A timed run of caption text with optional word timing. Times are seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<CaptionWord>,
}

impl CaptionSegment {
    /// Copy of this segment with every start/end moved by `offset_secs`.
    pub fn shifted(&self, offset_secs: f64) -> Self {
        Self {
            start: self.start + offset_secs,
            end: self.end + offset_secs,
            text: self.text.clone(),
            words: self
                .words
                .iter()
                .map(|w| CaptionWord {
                    start: w.start + offset_secs,
                    end: w.end + offset_secs,
                    text: w.text.clone(),
                })
                .collect(),
        }
    }
}

/// Shift every segment and every word by `offset_secs`.
pub fn offset_segments(segments: &[CaptionSegment], offset_secs: f64) -> Vec<CaptionSegment> {
    segments.iter().map(|s| s.shifted(offset_secs)).collect()
}

/// Transcribe each scene's clip and place its segments on the concatenated narration timeline.
///
/// Scene `i` is shifted by the sum of the measured durations of scenes `0..i`, the same
/// durations the compositor and muxer used, so captions line up with both picture and sound.
#[tracing::instrument(skip_all, fields(scenes = records.len()))]
pub fn build_caption_timeline(
    records: &[SceneRecord],
    transcriber: &dyn Transcriber,
) -> ReelResult<Vec<CaptionSegment>> {
    let mut timeline = Vec::new();
    for (rec, offset_millis) in records.iter().zip(scene_offsets_millis(records)) {
        let offset_secs = offset_millis as f64 / 1000.0;
        let segments = transcriber.transcribe(&rec.narration_path, &rec.text)?;
        tracing::debug!(
            scene = rec.index,
            segments = segments.len(),
            offset_secs,
            "scene transcribed"
        );
        timeline.extend(offset_segments(&segments, offset_secs));
    }
    ensure_monotonic(&timeline)?;
    Ok(timeline)
}

/// Verify segment starts never decrease.
pub fn ensure_monotonic(segments: &[CaptionSegment]) -> ReelResult<()> {
    for (i, pair) in segments.windows(2).enumerate() {
        if pair[1].start < pair[0].start {
            return Err(ReelError::caption(format!(
                "caption segment {} starts at {:.3}s, before segment {} at {:.3}s",
                i + 1,
                pair[1].start,
                i,
                pair[0].start
            )));
        }
    }
    Ok(())
}

/// Persist the caption timeline as pretty JSON.
pub fn write_caption_timeline(path: &Path, segments: &[CaptionSegment]) -> ReelResult<()> {
    let json = serde_json::to_string_pretty(segments)
        .map_err(|e| ReelError::serde(format!("serialize captions: {e}")))?;
    std::fs::write(path, json).map_err(|e| ReelError::io(path, e))
}

/// Load a caption timeline written by [`write_caption_timeline`].
pub fn read_caption_timeline(path: &Path) -> ReelResult<Vec<CaptionSegment>> {
    let raw = std::fs::read_to_string(path).map_err(|e| ReelError::io(path, e))?;
    serde_json::from_str(&raw)
        .map_err(|e| ReelError::serde(format!("parse '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/captions/segment.rs"]
mod tests;
