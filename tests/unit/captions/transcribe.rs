use super::*;

use std::cell::Cell;

struct Scripted {
    name: &'static str,
    result: fn() -> ReelResult<Vec<CaptionSegment>>,
    calls: std::rc::Rc<Cell<u32>>,
}

impl Transcriber for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn transcribe(&self, _audio: &Path, _prompt: &str) -> ReelResult<Vec<CaptionSegment>> {
        self.calls.set(self.calls.get() + 1);
        (self.result)()
    }
}

fn one_segment() -> ReelResult<Vec<CaptionSegment>> {
    Ok(vec![CaptionSegment {
        start: 0.0,
        end: 1.0,
        text: "ok".to_string(),
        words: Vec::new(),
    }])
}

fn transcription_failure() -> ReelResult<Vec<CaptionSegment>> {
    Err(ReelError::transcription("model not installed"))
}

fn missing_clip() -> ReelResult<Vec<CaptionSegment>> {
    Err(ReelError::missing_asset("narration_1.mp3"))
}

fn backends(
    primary: fn() -> ReelResult<Vec<CaptionSegment>>,
    secondary: fn() -> ReelResult<Vec<CaptionSegment>>,
) -> (TranscriptionBackends, std::rc::Rc<Cell<u32>>, std::rc::Rc<Cell<u32>>) {
    let p_calls = std::rc::Rc::new(Cell::new(0));
    let s_calls = std::rc::Rc::new(Cell::new(0));
    let b = TranscriptionBackends::new(
        Box::new(Scripted {
            name: "primary",
            result: primary,
            calls: p_calls.clone(),
        }),
        Box::new(Scripted {
            name: "secondary",
            result: secondary,
            calls: s_calls.clone(),
        }),
    );
    (b, p_calls, s_calls)
}

#[test]
fn primary_success_skips_secondary() {
    let (b, p, s) = backends(one_segment, transcription_failure);
    assert_eq!(b.transcribe(Path::new("a.mp3"), "ok").unwrap().len(), 1);
    assert_eq!((p.get(), s.get()), (1, 0));
}

#[test]
fn transcription_failure_falls_back() {
    let (b, p, s) = backends(transcription_failure, one_segment);
    let segments = b.transcribe(Path::new("a.mp3"), "ok").unwrap();
    assert_eq!(segments[0].text, "ok");
    assert_eq!((p.get(), s.get()), (1, 1));
}

#[test]
fn both_failing_names_both() {
    let (b, _, _) = backends(transcription_failure, transcription_failure);
    let err = b.transcribe(Path::new("a.mp3"), "ok").unwrap_err();
    match err {
        ReelError::Transcription(msg) => {
            assert!(msg.contains("primary failed"), "{msg}");
            assert!(msg.contains("secondary failed"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn other_errors_do_not_fall_back() {
    let (b, _, s) = backends(missing_clip, one_segment);
    let err = b.transcribe(Path::new("a.mp3"), "ok").unwrap_err();
    assert!(matches!(err, ReelError::MissingAsset { .. }));
    assert_eq!(s.get(), 0);
}

#[test]
fn preference_orders_backends() {
    let api = ApiSettings {
        api_key_env: "REELFORGE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..ApiSettings::default()
    };
    let mut t = TranscriptionSettings::default();
    let b = TranscriptionBackends::from_settings(&t, &api);
    assert_eq!(b.primary_name(), "whisper-local");
    assert_eq!(b.secondary_name(), "whisper-api");

    t.prefer = TranscriptionPreference::Api;
    let b = TranscriptionBackends::from_settings(&t, &api);
    assert_eq!(b.primary_name(), "whisper-api");

    // Without an API key the API slot fails as a transcription error, so fallback still applies.
    let err = b.primary.transcribe(Path::new("a.mp3"), "").unwrap_err();
    assert!(matches!(err, ReelError::Transcription(_)));
}
