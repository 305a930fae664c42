use super::*;

fn write_tone(path: &Path, sample_rate: u32, frames: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let s = (t * 440.0 * std::f32::consts::TAU).sin();
        writer.write_sample((s * 8000.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn wav_duration_is_exact() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("tone.wav");
    write_tone(&path, 16_000, 32_000);
    assert_eq!(probe_duration_millis(&path).unwrap(), 2000);

    let path = tmp.path().join("odd.wav");
    // 1234.5ms worth of frames at 8kHz is 9876 frames -> rounds to 1235ms.
    write_tone(&path, 8_000, 9_876);
    assert_eq!(probe_duration_millis(&path).unwrap(), 1235);
}

#[test]
fn garbage_is_unreadable_audio() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("narration_1.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();
    let err = probe_duration_millis(&path).unwrap_err();
    assert!(matches!(err, ReelError::UnreadableAudio { .. }));
}

#[test]
fn missing_file_is_unreadable_audio() {
    let err = probe_duration_millis(Path::new("no/such/clip.mp3")).unwrap_err();
    assert!(matches!(err, ReelError::UnreadableAudio { .. }));
}

#[test]
fn resolver_writes_manifest_in_scene_order() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    // The resolver trusts the container, not the extension.
    write_tone(&job.narration(1), 16_000, 16_000);
    write_tone(&job.narration(2), 16_000, 40_000);

    let records =
        resolve_scene_records(&job, &["first".to_string(), "second".to_string()]).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].duration_millis, 1000);
    assert_eq!(records[1].duration_millis, 2500);
    assert_eq!(records[1].image_path, job.image(2));

    let manifest = NarrationManifest::read(&job.narration_manifest()).unwrap();
    assert_eq!(manifest.entries[1].filename, "narration_2.mp3");
    assert_eq!(manifest.entries[1].duration, 2500);
    assert_eq!(manifest.entries[0].text, "first");
}

#[test]
fn resolver_reports_missing_clip() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    write_tone(&job.narration(1), 16_000, 16_000);
    let err = resolve_scene_records(&job, &["a".to_string(), "b".to_string()]).unwrap_err();
    assert!(matches!(err, ReelError::MissingAsset { .. }));
    assert!(!job.narration_manifest().exists());
}

#[test]
fn loader_reuses_a_matching_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    write_tone(&job.narration(1), 16_000, 16_000);
    std::fs::write(job.image(1), b"png").unwrap();
    // Recorded duration differs from the clip, so a re-measure would be visible.
    let recorded = SceneRecord {
        index: 1,
        image_path: job.image(1),
        narration_path: job.narration(1),
        duration_millis: 4321,
        text: "only".to_string(),
    };
    NarrationManifest::from_records(&[recorded])
        .write(&job.narration_manifest())
        .unwrap();

    let records = load_scene_records(&job, &["only".to_string()]).unwrap();
    assert_eq!(records[0].duration_millis, 4321);
    assert_eq!(records[0].narration_path, job.narration(1));
}

#[test]
fn loader_measures_again_when_the_manifest_is_stale() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    write_tone(&job.narration(1), 16_000, 16_000);
    let stale = SceneRecord {
        index: 1,
        image_path: job.image(1),
        narration_path: job.narration(1),
        duration_millis: 4321,
        text: "old line".to_string(),
    };
    NarrationManifest::from_records(&[stale])
        .write(&job.narration_manifest())
        .unwrap();

    let records = load_scene_records(&job, &["new line".to_string()]).unwrap();
    assert_eq!(records[0].duration_millis, 1000);
    let manifest = NarrationManifest::read(&job.narration_manifest()).unwrap();
    assert_eq!(manifest.entries[0].text, "new line");
}

#[test]
fn loader_checks_manifest_assets_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "job", "short.mp4").unwrap();
    write_tone(&job.narration(1), 16_000, 16_000);
    let recorded = SceneRecord {
        index: 1,
        image_path: job.image(1),
        narration_path: job.narration(1),
        duration_millis: 1000,
        text: "only".to_string(),
    };
    NarrationManifest::from_records(&[recorded])
        .write(&job.narration_manifest())
        .unwrap();

    let err = load_scene_records(&job, &["only".to_string()]).unwrap_err();
    match err {
        ReelError::MissingAsset { path } => assert_eq!(path, job.image(1)),
        other => panic!("unexpected error: {other}"),
    }
}
