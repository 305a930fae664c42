use std::path::{Path, PathBuf};
use std::process::Command;

use crate::audio::{MUX_CHANNELS, MUX_SAMPLE_RATE, concat_narrations};
use crate::encode::ffmpeg::{ToolOutput, run_tool};
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::{JobArtifactSet, SceneRecord};

/// AAC bitrate of muxed and finalized audio.
pub const AUDIO_BITRATE: &str = "192k";

/// Concatenate the scene narrations and mux them with the silent video.
///
/// Writes `with_narration.mp4`: the silent video's only stream copied unmodified, the narration
/// track encoded to AAC. The intermediate PCM file is removed afterwards, on success or failure.
#[tracing::instrument(skip(job, records), fields(job = %job.root().display()))]
pub fn mux_narration(job: &JobArtifactSet, records: &[SceneRecord]) -> ReelResult<()> {
    let silent = job.silent_video();
    if !silent.is_file() {
        return Err(ReelError::missing_asset(silent));
    }

    let pcm = TempFileGuard(job.narration_pcm());
    let pcm_path = pcm.0.as_path();
    let frames = concat_narrations(records, pcm_path)?;
    tracing::info!(
        audio_secs = frames as f64 / f64::from(MUX_SAMPLE_RATE),
        "concatenated narration track"
    );

    let out = mux_pcm_with_video(&silent, pcm_path, &job.with_narration())?;
    if !out.success {
        return Err(ReelError::Mux {
            status: out.status,
            stdout: out.stdout,
            stderr: out.stderr,
        });
    }
    Ok(())
}

/// Removes the wrapped intermediate file when dropped.
struct TempFileGuard(PathBuf);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.0.exists()
            && let Err(e) = std::fs::remove_file(&self.0)
        {
            tracing::warn!(path = %self.0.display(), error = %e, "failed to remove narration pcm");
        }
    }
}

/// Run the mux pass over an already concatenated raw `f32le` stereo track.
pub fn mux_pcm_with_video(video: &Path, pcm: &Path, out: &Path) -> ReelResult<ToolOutput> {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-v", "error", "-i"])
        .arg(video)
        .args([
            "-f",
            "f32le",
            "-ar",
            &MUX_SAMPLE_RATE.to_string(),
            "-ac",
            &MUX_CHANNELS.to_string(),
            "-i",
        ])
        .arg(pcm)
        .args(mux_output_args())
        .arg(out);
    run_tool(&mut cmd)
}

/// Output arguments of the mux pass: map video 0 and audio 1, copy video, encode audio.
pub(crate) fn mux_output_args() -> Vec<String> {
    [
        "-map",
        "0:v:0",
        "-map",
        "1:a:0",
        "-c:v",
        "copy",
        "-c:a",
        "aac",
        "-b:a",
        AUDIO_BITRATE,
        "-ar",
    ]
    .iter()
    .map(|s| s.to_string())
    .chain(std::iter::once(MUX_SAMPLE_RATE.to_string()))
    .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mux.rs"]
mod tests;
