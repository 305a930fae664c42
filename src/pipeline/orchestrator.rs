use std::path::PathBuf;

use crate::audio::{load_scene_records, resolve_scene_records};
use crate::captions::{CaptionOptions, build_caption_timeline, write_caption_timeline};
use crate::collab::{ArtMovement, UploadMetadata, Uploader, build_image_prompt};
use crate::compose::composite_job;
use crate::encode::{cleanup_intermediates, finalize, mux_narration};
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::{JobArtifactSet, SceneRecord};
use crate::pipeline::context::JobContext;
use crate::script::{ParsedScript, SceneDirective, normalize_generated_text, parse_script};

/// Outcome of one assembled job.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AssemblyReport {
    /// `final_output.mp4` of the job.
    pub final_path: PathBuf,
    pub scenes: usize,
    pub frames_written: u64,
    pub caption_segments: usize,
    /// Whether `with_narration.mp4` and `temp_video.mp4` were removed.
    pub cleaned_up: bool,
}

/// Run a job end to end from source material.
///
/// Writes `response.txt` and `data.json`, synthesizes every narration (with retry), generates
/// every image (no retry), then assembles the video.
#[tracing::instrument(skip_all, fields(job = %job.root().display()))]
pub fn generate_job(
    ctx: &mut JobContext,
    job: &JobArtifactSet,
    source_material: &str,
) -> ReelResult<AssemblyReport> {
    job.ensure_dirs()?;
    let generators = ctx.generators.as_ref().ok_or_else(|| {
        ReelError::collaborator(format!(
            "script/image/speech generators are not configured (is {} set?)",
            ctx.settings.api.api_key_env
        ))
    })?;

    tracing::info!("generating script");
    let raw = generators.script_writer.write_script(source_material)?;
    let text = normalize_generated_text(&raw);
    let response_path = job.response_text();
    std::fs::write(&response_path, &text).map_err(|e| ReelError::io(&response_path, e))?;

    let script = parse_script(&text)?;
    if script.narrations.is_empty() {
        return Err(ReelError::validation("generated script has no narration lines"));
    }

    let styles: Vec<Option<ArtMovement>> = script
        .image_descriptions()
        .map(|_| {
            let style = ctx.styles.choose(&mut ctx.rng).cloned();
            if let Some(s) = &style {
                tracing::debug!(style = %s.name, "selected art style");
            }
            style
        })
        .collect();
    write_script_data(job, &script, &styles)?;

    tracing::info!(narrations = script.narrations.len(), "generating narration");
    for (i, line) in script.narrations.iter().enumerate() {
        let out = job.narration(i + 1);
        ctx.retry.run(&format!("narration {}", i + 1), |_| {
            generators.speech.synthesize(line, &out)
        })?;
    }

    tracing::info!(images = styles.len(), "generating images");
    for (i, (description, style)) in script.image_descriptions().zip(&styles).enumerate() {
        let prompt = build_image_prompt(description, style.as_ref());
        generators.images.generate_image(&prompt, &job.image(i + 1))?;
    }

    assemble_job(ctx, job, &script)
}

/// `data.json`: the directives in order, each image carrying its chosen art style.
fn write_script_data(
    job: &JobArtifactSet,
    script: &ParsedScript,
    styles: &[Option<ArtMovement>],
) -> ReelResult<()> {
    let mut styles = styles.iter();
    let mut items = Vec::with_capacity(script.directives.len());
    for directive in &script.directives {
        let mut value = serde_json::to_value(directive)
            .map_err(|e| ReelError::serde(format!("serialize directive: {e}")))?;
        if matches!(directive, SceneDirective::Image { .. })
            && let Some(Some(style)) = styles.next()
            && let Some(obj) = value.as_object_mut()
        {
            let style = serde_json::to_value(style)
                .map_err(|e| ReelError::serde(format!("serialize art style: {e}")))?;
            obj.insert("art_style".to_string(), style);
        }
        items.push(value);
    }
    let path = job.script_data();
    let json = serde_json::to_string_pretty(&items)
        .map_err(|e| ReelError::serde(format!("serialize script data: {e}")))?;
    std::fs::write(&path, json).map_err(|e| ReelError::io(&path, e))
}

/// Assemble an already generated job: durations, frames, mux, captions, finalize, cleanup.
///
/// A caption failure leaves `with_narration.mp4` in place and skips finalize and cleanup.
#[tracing::instrument(skip_all, fields(job = %job.root().display()))]
pub fn assemble_job(
    ctx: &JobContext,
    job: &JobArtifactSet,
    script: &ParsedScript,
) -> ReelResult<AssemblyReport> {
    tracing::info!(scenes = script.narrations.len(), "resolving narration durations");
    let records = resolve_scene_records(job, &script.narrations)?;
    assemble_records(ctx, job, &records)
}

fn assemble_records(
    ctx: &JobContext,
    job: &JobArtifactSet,
    records: &[SceneRecord],
) -> ReelResult<AssemblyReport> {
    let settings = &ctx.settings;
    for record in records {
        record.validate_assets()?;
    }

    tracing::info!("compositing frames");
    let stats = composite_job(job, records, settings)?;
    tracing::info!(frames = stats.frames_written, "frames composited");

    tracing::info!("muxing narration");
    mux_narration(job, records)?;

    tracing::info!("adding captions");
    let segments = match caption_stage(ctx, job, records) {
        Ok(segments) => segments,
        Err(e) => {
            tracing::error!(
                error = %e,
                kept = %job.with_narration().display(),
                "captioning failed; skipping finalize and cleanup"
            );
            return Err(e);
        }
    };

    tracing::info!("finalizing");
    finalize(job, settings.video.encoder())?;
    let cleaned_up = cleanup_intermediates(job)?;

    let report = AssemblyReport {
        final_path: job.final_output(),
        scenes: records.len(),
        frames_written: stats.frames_written,
        caption_segments: segments.len(),
        cleaned_up,
    };
    tracing::info!(final_path = %report.final_path.display(), "job done");
    Ok(report)
}

fn caption_stage(
    ctx: &JobContext,
    job: &JobArtifactSet,
    records: &[SceneRecord],
) -> ReelResult<Vec<crate::captions::CaptionSegment>> {
    let segments = build_caption_timeline(records, ctx.transcriber.as_ref())?;
    write_caption_timeline(&job.captions_json(), &segments)?;
    let options = CaptionOptions::new(ctx.settings.captions.clone());
    ctx.caption_burner
        .burn(&job.with_narration(), &segments, &options, &job.captioned())?;
    Ok(segments)
}

/// Parse a job's saved `response.txt`.
pub fn load_job_script(job: &JobArtifactSet) -> ReelResult<ParsedScript> {
    let path = job.response_text();
    let text = std::fs::read_to_string(&path).map_err(|e| ReelError::io(&path, e))?;
    parse_script(&text)
}

/// Re-run assembly on an existing job directory from its `response.txt`.
///
/// Scene timing comes from `narration.json` when it still matches the script.
#[tracing::instrument(skip_all, fields(job = %job.root().display()))]
pub fn assemble_existing(ctx: &JobContext, job: &JobArtifactSet) -> ReelResult<AssemblyReport> {
    let script = load_job_script(job)?;
    let records = load_scene_records(job, &script.narrations)?;
    assemble_records(ctx, job, &records)
}

/// Upload metadata for an existing job.
pub fn load_upload_metadata(
    job: &JobArtifactSet,
    settings: &crate::settings::Settings,
) -> ReelResult<UploadMetadata> {
    let script = load_job_script(job)?;
    Ok(UploadMetadata::from_script(&script, &settings.upload))
}

/// Upload a finished job's `final_output.mp4` with metadata from its script.
///
/// Returns the identifier reported by `uploader`.
#[tracing::instrument(skip_all, fields(job = %job.root().display()))]
pub fn publish_job(
    job: &JobArtifactSet,
    settings: &crate::settings::Settings,
    uploader: &dyn Uploader,
) -> ReelResult<String> {
    let video = job.final_output();
    if !video.is_file() {
        return Err(ReelError::missing_asset(video));
    }
    let metadata = load_upload_metadata(job, settings)?;
    let id = uploader.upload(&video, &metadata)?;
    tracing::info!(id = %id, title = %metadata.title, "uploaded");
    Ok(id)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
