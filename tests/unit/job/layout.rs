use super::*;

#[test]
fn paths_follow_the_documented_layout() {
    let job = JobArtifactSet::new("shorts/42", DEFAULT_OUTPUT_FILENAME);
    assert_eq!(job.image(1), Path::new("shorts/42/images/image_1.png"));
    assert_eq!(
        job.narration(3),
        Path::new("shorts/42/narrations/narration_3.mp3")
    );
    assert_eq!(job.narration_manifest(), Path::new("shorts/42/narration.json"));
    assert_eq!(job.silent_video(), Path::new("shorts/42/temp_video.mp4"));
    assert_eq!(job.with_narration(), Path::new("shorts/42/with_narration.mp4"));
    assert_eq!(job.captioned(), Path::new("shorts/42/short.mp4"));
    assert_eq!(job.final_output(), Path::new("shorts/42/final_output.mp4"));
}

#[test]
fn create_makes_asset_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let job = JobArtifactSet::create(tmp.path(), "1700000000", "out.mp4").unwrap();
    assert!(job.images_dir().is_dir());
    assert!(job.narrations_dir().is_dir());
    assert_eq!(job.output_filename(), "out.mp4");
}

#[test]
fn create_rejects_nested_job_ids() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(JobArtifactSet::create(tmp.path(), "a/b", "out.mp4").is_err());
    assert!(JobArtifactSet::create(tmp.path(), "", "out.mp4").is_err());
}

#[test]
fn create_refuses_an_existing_job_root() {
    let tmp = tempfile::tempdir().unwrap();
    JobArtifactSet::create(tmp.path(), "1700000000_owls", "out.mp4").unwrap();
    let err = JobArtifactSet::create(tmp.path(), "1700000000_owls", "out.mp4").unwrap_err();
    match err {
        ReelError::Io { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::AlreadyExists)
        }
        other => panic!("unexpected error: {other}"),
    }
}
