use std::path::Path;

use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::foundation::error::{ReelError, ReelResult};
use crate::job::{JobArtifactSet, NarrationManifest, SceneRecord};

/// Measure the exact playback length of an audio clip in milliseconds.
///
/// The length comes from the container's frame count when it declares one, otherwise from the sum
/// of demuxed packet durations. File size and bitrate are never used.
pub fn probe_duration_millis(path: &Path) -> ReelResult<u64> {
    let file =
        std::fs::File::open(path).map_err(|e| ReelError::unreadable_audio(path, e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ReelError::unreadable_audio(path, format!("unsupported format: {e}")))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| ReelError::unreadable_audio(path, "no audio track"))?;
    let track_id = track.id;
    let params = track.codec_params.clone();
    let sample_rate = params
        .sample_rate
        .filter(|sr| *sr > 0)
        .ok_or_else(|| ReelError::unreadable_audio(path, "no sample rate"))?;

    let frames = match params.n_frames {
        Some(n) if n > 0 => n,
        _ => {
            let mut total_ts = 0u64;
            loop {
                let packet = match format.next_packet() {
                    Ok(p) => p,
                    Err(SymphoniaError::IoError(e))
                        if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break;
                    }
                    Err(SymphoniaError::ResetRequired) => break,
                    Err(e) => {
                        return Err(ReelError::unreadable_audio(
                            path,
                            format!("demux failed: {e}"),
                        ));
                    }
                };
                if packet.track_id() == track_id {
                    total_ts += packet.dur();
                }
            }
            match params.time_base {
                // Packet durations are in time-base units; convert to sample frames.
                Some(tb) if tb.denom > 0 => {
                    let num = u128::from(total_ts)
                        * u128::from(tb.numer)
                        * u128::from(sample_rate);
                    (num / u128::from(tb.denom)) as u64
                }
                _ => total_ts,
            }
        }
    };

    if frames == 0 {
        return Err(ReelError::unreadable_audio(path, "clip has zero length"));
    }

    let millis = (u128::from(frames) * 1000 + u128::from(sample_rate) / 2) / u128::from(sample_rate);
    Ok(millis as u64)
}

/// Measure every narration clip of `job` and persist the scene manifest.
///
/// Narration `n` (1-based) is paired with `images/image_n.png` and
/// `narrations/narration_n.mp3`. A missing clip is [`ReelError::MissingAsset`]; an undecodable one
/// is [`ReelError::UnreadableAudio`]. Either aborts the job.
#[tracing::instrument(skip(job, narrations), fields(job = %job.root().display(), scenes = narrations.len()))]
pub fn resolve_scene_records(
    job: &JobArtifactSet,
    narrations: &[String],
) -> ReelResult<Vec<SceneRecord>> {
    if narrations.is_empty() {
        return Err(ReelError::validation("script has no narration lines"));
    }

    let mut records = Vec::with_capacity(narrations.len());
    for (i, text) in narrations.iter().enumerate() {
        let index = i + 1;
        let narration_path = job.narration(index);
        if !narration_path.is_file() {
            return Err(ReelError::missing_asset(narration_path));
        }
        let duration_millis = probe_duration_millis(&narration_path)?;
        tracing::debug!(index, duration_millis, "measured narration clip");

        let record = SceneRecord {
            index,
            image_path: job.image(index),
            narration_path,
            duration_millis,
            text: text.clone(),
        };
        record.validate()?;
        records.push(record);
    }

    NarrationManifest::from_records(&records).write(&job.narration_manifest())?;
    tracing::info!(
        total_millis = records.iter().map(|r| r.duration_millis).sum::<u64>(),
        "wrote narration manifest"
    );
    Ok(records)
}

/// Scene records for a job whose clips were already measured.
///
/// Reuses `narration.json` when it lists the same narration texts in the same order, after
/// checking every referenced image and clip is on disk. A missing or stale manifest falls back to
/// [`resolve_scene_records`], which measures the clips again and rewrites it.
#[tracing::instrument(skip(job, narrations), fields(job = %job.root().display(), scenes = narrations.len()))]
pub fn load_scene_records(
    job: &JobArtifactSet,
    narrations: &[String],
) -> ReelResult<Vec<SceneRecord>> {
    let manifest_path = job.narration_manifest();
    if !manifest_path.is_file() {
        return resolve_scene_records(job, narrations);
    }

    let records = NarrationManifest::read(&manifest_path)?.to_records(job)?;
    let matches = records.len() == narrations.len()
        && records.iter().zip(narrations).all(|(r, n)| &r.text == n);
    if !matches {
        tracing::warn!(
            path = %manifest_path.display(),
            "narration manifest does not match the script; measuring clips again"
        );
        return resolve_scene_records(job, narrations);
    }

    for record in &records {
        record.validate_assets()?;
    }
    tracing::info!("reusing narration manifest");
    Ok(records)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/duration.rs"]
mod tests;
