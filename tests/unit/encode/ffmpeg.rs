use super::*;
use crate::foundation::core::Canvas;

#[test]
fn begin_rejects_odd_or_empty_geometry() {
    let fps = Fps::new(30, 1).unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
    let odd = SinkConfig::new(
        Canvas {
            width: 11,
            height: 10,
        },
        fps,
    );
    assert!(matches!(sink.begin(odd), Err(ReelError::Validation(_))));

    let empty = SinkConfig::new(
        Canvas {
            width: 0,
            height: 10,
        },
        fps,
    );
    assert!(sink.begin(empty).is_err());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
    let frame = FrameRGBA::solid(
        Canvas {
            width: 2,
            height: 2,
        },
        [0, 0, 0, 255],
    );
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
    assert_eq!(sink.frames_written(), 0);
}

#[test]
fn run_tool_reports_spawn_failure() {
    let mut cmd = Command::new("reelforge-no-such-binary-on-path");
    assert!(run_tool(&mut cmd).is_err());
}

#[cfg(unix)]
#[test]
fn run_tool_captures_failed_exit() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
    let out = run_tool(&mut cmd).unwrap();
    assert!(!out.success);
    assert_eq!(out.stdout.trim(), "out");
    assert_eq!(out.stderr, "err");
    assert!(out.status.contains('3'));
}
