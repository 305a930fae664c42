use super::*;

use std::cell::Cell;
use std::path::Path;

use crate::captions::{CaptionBurner, CaptionOptions, CaptionSegment, Transcriber};
use crate::collab::{ImageGenerator, ScriptWriter, SpeechSynthesizer};
use crate::pipeline::context::Generators;
use crate::settings::Settings;

const SCRIPT: &str = "###\n\
[A red barn]\n\
Narrator: “The barn is red.”\n\
[A blue sea]\n\
Narrator: \"The sea is blue.\"\n\
###\n";

struct FixedWriter(&'static str);

impl ScriptWriter for FixedWriter {
    fn write_script(&self, _source_material: &str) -> ReelResult<String> {
        Ok(self.0.to_string())
    }
}

struct SolidImages;

impl ImageGenerator for SolidImages {
    fn generate_image(&self, prompt: &str, out_path: &Path) -> ReelResult<()> {
        let rgba = if prompt.contains("barn") {
            [200, 0, 0, 255]
        } else {
            [0, 0, 200, 255]
        };
        image::RgbaImage::from_pixel(32, 32, image::Rgba(rgba))
            .save(out_path)
            .map_err(|e| ReelError::collaborator(e.to_string()))
    }
}

/// Writes a one-second silent WAV; the first call of every line fails.
struct FlakySpeech {
    calls: Cell<u32>,
}

impl SpeechSynthesizer for FlakySpeech {
    fn synthesize(&self, _text: &str, out_path: &Path) -> ReelResult<()> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n % 2 == 0 {
            return Err(ReelError::collaborator("429 too many requests"));
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(out_path, spec).unwrap();
        for _ in 0..8_000 {
            w.write_sample(0i16).unwrap();
        }
        w.finalize().unwrap();
        Ok(())
    }
}

struct NoTranscriber;

impl Transcriber for NoTranscriber {
    fn name(&self) -> &str {
        "none"
    }

    fn transcribe(&self, _audio: &Path, _prompt: &str) -> ReelResult<Vec<CaptionSegment>> {
        Err(ReelError::transcription("not available in tests"))
    }
}

struct NoBurner;

impl CaptionBurner for NoBurner {
    fn burn(
        &self,
        _input: &Path,
        _segments: &[CaptionSegment],
        _options: &CaptionOptions,
        _output: &Path,
    ) -> ReelResult<()> {
        Err(ReelError::caption("not available in tests"))
    }
}

fn small_settings() -> Settings {
    let mut settings = Settings::default();
    settings.video.width = 32;
    settings.video.height = 32;
    settings.video.fps = 10;
    settings
}

fn context(script: &'static str) -> JobContext {
    JobContext::new(small_settings(), Box::new(NoTranscriber), Box::new(NoBurner))
        .unwrap()
        .with_seed(3)
        .with_retry(crate::collab::RetryPolicy::new(2, std::time::Duration::ZERO).unwrap())
        .with_generators(Generators {
            script_writer: Box::new(FixedWriter(script)),
            images: Box::new(SolidImages),
            speech: Box::new(FlakySpeech {
                calls: Cell::new(0),
            }),
        })
}

#[test]
fn generation_requires_generators() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = JobContext::new(Settings::default(), Box::new(NoTranscriber), Box::new(NoBurner));
    let mut ctx = ctx.unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    let err = generate_job(&mut ctx, &job, "owls").unwrap_err();
    assert!(matches!(err, ReelError::Collaborator(_)));
}

#[test]
fn script_without_narration_is_rejected_after_saving_response() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ctx = context("[only an image]\nsome chatter\n");
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    let err = generate_job(&mut ctx, &job, "owls").unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(job.response_text().is_file());
}

#[test]
fn generation_writes_every_artifact_before_assembly() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ctx = context(SCRIPT);
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();

    // Assembly stops at the encoder (no ffmpeg) or at captions (test burner); either way the
    // generated inputs are all on disk.
    let err = generate_job(&mut ctx, &job, "colors").unwrap_err();
    assert!(matches!(
        err,
        ReelError::Encode(_) | ReelError::Transcription(_)
    ));

    let response = std::fs::read_to_string(job.response_text()).unwrap();
    assert!(response.contains("Narrator: \"The barn is red.\""));
    for n in 1..=2 {
        assert!(job.image(n).is_file());
        assert!(job.narration(n).is_file());
    }
    assert!(job.narration_manifest().is_file());

    let data: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(job.script_data()).unwrap()).unwrap();
    let items = data.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["image"]["description"], "A red barn");
    assert!(items[0]["art_style"]["name"].is_string());
    assert_eq!(items[1]["narration"]["text"], "The barn is red.");
    assert!(items[1].get("art_style").is_none());
}

#[test]
fn caption_failure_keeps_the_narrated_video() {
    if !crate::encode::is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let mut ctx = context(SCRIPT);
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();

    let err = generate_job(&mut ctx, &job, "colors").unwrap_err();
    assert!(matches!(err, ReelError::Transcription(_)));
    assert!(job.with_narration().is_file());
    assert!(job.silent_video().is_file());
    assert!(!job.final_output().exists());
}

#[test]
fn upload_metadata_reads_the_saved_response() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    std::fs::write(
        job.response_text(),
        "Title: Colors\nTags: [\"art\"]\nNarrator: hi\n",
    )
    .unwrap();
    let meta = load_upload_metadata(&job, &Settings::default()).unwrap();
    assert_eq!(meta.title, "Colors");
    assert_eq!(meta.tags, vec!["art".to_string()]);
}

#[test]
fn assembling_an_existing_job_reuses_its_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(SCRIPT);
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    std::fs::write(
        job.response_text(),
        "[A red barn]\nNarrator: \"The barn is red.\"\n",
    )
    .unwrap();
    // Not decodable: measuring again would fail with UnreadableAudio.
    std::fs::write(job.narration(1), b"not audio").unwrap();
    let record = SceneRecord {
        index: 1,
        image_path: job.image(1),
        narration_path: job.narration(1),
        duration_millis: 900,
        text: "The barn is red.".to_string(),
    };
    crate::job::NarrationManifest::from_records(&[record])
        .write(&job.narration_manifest())
        .unwrap();

    let err = assemble_existing(&ctx, &job).unwrap_err();
    match err {
        ReelError::MissingAsset { path } => assert_eq!(path, job.image(1)),
        other => panic!("unexpected error: {other}"),
    }
}

struct RecordingUploader {
    seen: std::cell::RefCell<Vec<(std::path::PathBuf, UploadMetadata)>>,
}

impl Uploader for RecordingUploader {
    fn upload(&self, video: &Path, metadata: &UploadMetadata) -> ReelResult<String> {
        self.seen
            .borrow_mut()
            .push((video.to_path_buf(), metadata.clone()));
        Ok("vid-1".to_string())
    }
}

#[test]
fn publishing_uploads_the_final_output() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    std::fs::write(job.response_text(), "Title: Colors\nNarrator: hi\n").unwrap();
    let uploader = RecordingUploader {
        seen: std::cell::RefCell::new(Vec::new()),
    };

    let err = publish_job(&job, &Settings::default(), &uploader).unwrap_err();
    assert!(matches!(err, ReelError::MissingAsset { .. }));
    assert!(uploader.seen.borrow().is_empty());

    std::fs::write(job.final_output(), b"mp4").unwrap();
    let id = publish_job(&job, &Settings::default(), &uploader).unwrap();
    assert_eq!(id, "vid-1");
    let seen = uploader.seen.borrow();
    assert_eq!(seen[0].0, job.final_output());
    assert_eq!(seen[0].1.title, "Colors");
    assert_eq!(seen[0].1.privacy_status, "private");
}
