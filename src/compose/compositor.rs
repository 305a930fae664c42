use crate::compose::branding::Logo;
use crate::compose::canvas::load_scene_image;
use crate::compose::plan::{SceneFramePlan, plan_scene_frames};
use crate::compose::wipe::{wipe_frame, wipe_offset};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, FrameRGBA, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::{JobArtifactSet, SceneRecord};
use crate::settings::Settings;

/// Canvas and timing used for one compositor pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOptions {
    pub canvas: Canvas,
    pub fps: Fps,
    pub slide_speed_multiplier: f64,
}

impl CompositorOptions {
    pub fn from_settings(settings: &Settings) -> ReelResult<Self> {
        Ok(Self {
            canvas: settings.video.canvas(),
            fps: settings.video.frame_rate()?,
            slide_speed_multiplier: settings.video.slide_speed_multiplier,
        })
    }
}

/// Counters reported by [`composite_scenes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositorStats {
    /// Frames pushed into the sink.
    pub frames_written: u64,
    /// Scenes composited.
    pub scenes: usize,
    /// Transitions shortened because their scene was too short.
    pub clamped_transitions: usize,
    /// Transitions whose target image could not be loaded and wiped into black instead.
    pub fallback_transitions: usize,
}

struct FrameWriter<'a> {
    sink: &'a mut dyn FrameSink,
    next_idx: u64,
}

impl FrameWriter<'_> {
    fn push(&mut self, frame: &FrameRGBA) -> ReelResult<()> {
        self.sink.push_frame(FrameIndex(self.next_idx), frame)?;
        self.next_idx += 1;
        Ok(())
    }
}

/// Stream every scene of `records` into `sink`.
///
/// Each scene holds its image for the static part of its frame budget, then wipes horizontally
/// into the next scene's image. The last scene has no transition. The optional logo is drawn on
/// every frame.
///
/// All primary scene images are checked before `sink.begin`, so a missing image never starts an
/// output. At most the current image, the next image and one frame buffer are alive at a time.
#[tracing::instrument(skip_all, fields(scenes = records.len()))]
pub fn composite_scenes(
    records: &[SceneRecord],
    opts: &CompositorOptions,
    logo: Option<&Logo>,
    sink: &mut dyn FrameSink,
) -> ReelResult<CompositorStats> {
    if records.is_empty() {
        return Err(ReelError::validation("cannot composite a job with no scenes"));
    }
    for rec in records {
        rec.validate()?;
        if !rec.image_path.is_file() {
            return Err(ReelError::missing_asset(&rec.image_path));
        }
    }

    let durations: Vec<u64> = records.iter().map(|r| r.duration_millis).collect();
    let plans = plan_scene_frames(&durations, opts.fps, opts.slide_speed_multiplier);

    let mut stats = CompositorStats {
        scenes: records.len(),
        ..CompositorStats::default()
    };

    sink.begin(SinkConfig::new(opts.canvas, opts.fps))?;
    let mut writer = FrameWriter { sink, next_idx: 0 };

    // Target of the previous transition, reused as this scene's image when it loaded cleanly.
    let mut carried: Option<FrameRGBA> = None;
    let mut out = FrameRGBA::solid(opts.canvas, [0, 0, 0, 255]);

    for (i, (rec, plan)) in records.iter().zip(&plans).enumerate() {
        let current = match carried.take() {
            Some(img) => img,
            None => load_scene_image(&rec.image_path, opts.canvas)?,
        };

        if plan.clamped {
            stats.clamped_transitions += 1;
            tracing::warn!(
                scene = rec.index,
                total = plan.total,
                slide = plan.slide_frames,
                "scene shorter than its transition; transition clamped"
            );
        }

        write_static(&mut writer, &current, plan, logo, &mut out)?;

        if plan.slide_frames > 0 {
            let next_rec = &records[i + 1];
            let (next, loaded) = match load_scene_image(&next_rec.image_path, opts.canvas) {
                Ok(img) => (img, true),
                Err(e) => {
                    stats.fallback_transitions += 1;
                    tracing::warn!(
                        scene = next_rec.index,
                        error = %e,
                        "next image unavailable; wiping into black"
                    );
                    (FrameRGBA::solid(opts.canvas, [0, 0, 0, 255]), false)
                }
            };
            write_wipe(&mut writer, &current, &next, plan, logo, &mut out)?;
            if loaded {
                carried = Some(next);
            }
        }

        tracing::debug!(
            scene = rec.index,
            static_frames = plan.static_frames,
            slide_frames = plan.slide_frames,
            "scene composited"
        );
    }

    stats.frames_written = writer.next_idx;
    writer.sink.end()?;
    tracing::info!(
        frames = stats.frames_written,
        clamped = stats.clamped_transitions,
        "composite finished"
    );
    Ok(stats)
}

fn write_static(
    writer: &mut FrameWriter<'_>,
    current: &FrameRGBA,
    plan: &SceneFramePlan,
    logo: Option<&Logo>,
    out: &mut FrameRGBA,
) -> ReelResult<()> {
    if plan.static_frames == 0 {
        return Ok(());
    }
    out.data.copy_from_slice(&current.data);
    if let Some(logo) = logo {
        logo.apply(out);
    }
    for _ in 0..plan.static_frames {
        writer.push(out)?;
    }
    Ok(())
}

fn write_wipe(
    writer: &mut FrameWriter<'_>,
    current: &FrameRGBA,
    next: &FrameRGBA,
    plan: &SceneFramePlan,
    logo: Option<&Logo>,
    out: &mut FrameRGBA,
) -> ReelResult<()> {
    for k in 0..plan.slide_frames {
        let offset = wipe_offset(k, plan.slide_frames, current.width);
        wipe_frame(current, next, offset, out)?;
        if let Some(logo) = logo {
            logo.apply(out);
        }
        writer.push(out)?;
    }
    Ok(())
}

/// Composite a job's scenes into its silent `temp_video.mp4`.
///
/// A partially written output is removed when compositing fails.
#[tracing::instrument(skip_all, fields(job = %job.root().display()))]
pub fn composite_job(
    job: &JobArtifactSet,
    records: &[SceneRecord],
    settings: &Settings,
) -> ReelResult<CompositorStats> {
    if !is_ffmpeg_on_path() {
        return Err(ReelError::encode(
            "ffmpeg is required for video encoding, but was not found on PATH",
        ));
    }
    let opts = CompositorOptions::from_settings(settings)?;
    let logo = Logo::from_settings(&settings.branding, opts.canvas)?;

    let out_path = job.silent_video();
    let mut sink_opts = FfmpegSinkOpts::new(&out_path);
    sink_opts.encoder = settings.video.encoder().to_string();
    let mut sink = FfmpegSink::new(sink_opts);

    match composite_scenes(records, &opts, logo.as_ref(), &mut sink) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            drop(sink);
            if out_path.exists() {
                let _ = std::fs::remove_file(&out_path);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
