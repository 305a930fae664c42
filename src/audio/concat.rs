use std::io::Write as _;
use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};
use crate::job::SceneRecord;

/// Sample rate of the concatenated narration track and of the muxed AAC stream.
pub const MUX_SAMPLE_RATE: u32 = 44_100;
/// Channel count of the concatenated narration track.
pub const MUX_CHANNELS: u16 = 2;

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Length in sample frames.
    pub fn frames(&self) -> usize {
        self.interleaved_f32.len() / usize::from(self.channels.max(1))
    }
}

/// Decode a clip to stereo interleaved `f32` PCM at `sample_rate` through the system `ffmpeg`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::encode(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::unreadable_audio(
            path,
            format!(
                "ffmpeg audio decode failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        ));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MUX_CHANNELS,
        interleaved_f32: f32le_bytes_to_samples(&out.stdout)?,
    })
}

pub(crate) fn f32le_bytes_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::encode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Append PCM clips back to back into a raw little-endian `.f32le` writer.
///
/// No crossfade: scene transitions are visual only. Returns the number of sample frames written.
pub fn append_pcm<W: std::io::Write>(out: &mut W, clip: &AudioPcm) -> std::io::Result<u64> {
    let mut bytes = Vec::<u8>::with_capacity(clip.interleaved_f32.len() * 4);
    for &sample in &clip.interleaved_f32 {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    out.write_all(&bytes)?;
    Ok(clip.frames() as u64)
}

/// Decode every scene's narration in order and write one continuous `.f32le` track.
///
/// Only one decoded clip is held in memory at a time.
#[tracing::instrument(skip(records), fields(scenes = records.len()))]
pub fn concat_narrations(records: &[SceneRecord], out_path: &Path) -> ReelResult<u64> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReelError::io(parent, e))?;
    }
    let file = std::fs::File::create(out_path).map_err(|e| ReelError::io(out_path, e))?;
    let mut writer = std::io::BufWriter::new(file);

    let mut total_frames = 0u64;
    for record in records {
        let pcm = decode_audio_f32_stereo(&record.narration_path, MUX_SAMPLE_RATE)?;
        total_frames +=
            append_pcm(&mut writer, &pcm).map_err(|e| ReelError::io(out_path, e))?;
        tracing::debug!(
            index = record.index,
            frames = pcm.frames(),
            "appended narration clip"
        );
    }
    writer.flush().map_err(|e| ReelError::io(out_path, e))?;

    Ok(total_frames)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/concat.rs"]
mod tests;
