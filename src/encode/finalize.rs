use std::path::Path;
use std::process::Command;

use crate::audio::MUX_SAMPLE_RATE;
use crate::encode::ffmpeg::run_tool;
use crate::encode::mux::AUDIO_BITRATE;
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::JobArtifactSet;

/// Re-encode the captioned video into `final_output.mp4`.
///
/// Video is always re-encoded (never stream-copied) since the caption burner may have produced an
/// unusual intermediate encoding.
#[tracing::instrument(skip(job), fields(job = %job.root().display()))]
pub fn finalize(job: &JobArtifactSet, encoder: &str) -> ReelResult<()> {
    let input = job.captioned();
    if !input.is_file() {
        return Err(ReelError::missing_asset(input));
    }
    let output = job.final_output();

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-v", "error", "-i"])
        .arg(&input)
        .args(finalize_output_args(encoder))
        .arg(&output);
    let out = run_tool(&mut cmd)?;
    if !out.success {
        return Err(ReelError::Finalize {
            status: out.status,
            stdout: out.stdout,
            stderr: out.stderr,
        });
    }
    if !output.is_file() {
        return Err(ReelError::Finalize {
            status: out.status,
            stdout: out.stdout,
            stderr: format!("ffmpeg reported success but '{}' is missing", output.display()),
        });
    }
    Ok(())
}

pub(crate) fn finalize_output_args(encoder: &str) -> Vec<String> {
    let rate = MUX_SAMPLE_RATE.to_string();
    [
        "-c:v",
        encoder,
        "-pix_fmt",
        "yuv420p",
        "-c:a",
        "aac",
        "-b:a",
        AUDIO_BITRATE,
        "-ar",
        rate.as_str(),
        "-movflags",
        "+faststart",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Delete `with_narration.mp4` and `temp_video.mp4` once the job's outputs are confirmed.
///
/// Nothing is deleted unless both the captioned output and the final artifact exist on disk.
/// Returns whether cleanup ran.
pub fn cleanup_intermediates(job: &JobArtifactSet) -> ReelResult<bool> {
    let captioned = job.captioned();
    let final_output = job.final_output();
    if !captioned.is_file() || !final_output.is_file() {
        tracing::warn!(
            captioned = captioned.is_file(),
            final_output = final_output.is_file(),
            "outputs not confirmed on disk, skipping cleanup"
        );
        return Ok(false);
    }

    for path in [job.with_narration(), job.silent_video()] {
        remove_if_present(&path)?;
    }
    Ok(true)
}

fn remove_if_present(path: &Path) -> ReelResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ReelError::io(path, e)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/finalize.rs"]
mod tests;
