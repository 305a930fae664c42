use super::*;

const WHISPER_JSON: &str = r#"{
  "text": " Hello world. Second line.",
  "segments": [
    {"id": 0, "start": 0.0, "end": 1.2, "text": " Hello world.",
     "words": [
       {"word": " Hello", "start": 0.0, "end": 0.5, "probability": 0.9},
       {"word": " world.", "start": 0.6, "end": 1.2, "probability": 0.8}
     ]},
    {"id": 1, "start": 1.4, "end": 2.0, "text": "   ", "words": []},
    {"id": 2, "start": 2.0, "end": 3.1, "text": " Second line."}
  ],
  "language": "en"
}"#;

#[test]
fn parses_segments_and_trims_words() {
    let segments = parse_whisper_json(WHISPER_JSON).unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, "Hello world.");
    assert_eq!(segments[0].words.len(), 2);
    assert_eq!(segments[0].words[1].text, "world.");
    assert_eq!(segments[0].words[1].start, 0.6);
    assert_eq!(segments[1].start, 2.0);
    assert!(segments[1].words.is_empty());
}

#[test]
fn malformed_output_is_a_transcription_error() {
    assert!(matches!(
        parse_whisper_json("not json").unwrap_err(),
        ReelError::Transcription(_)
    ));
    assert!(matches!(
        parse_whisper_json(r#"{"text": "x"}"#).unwrap_err(),
        ReelError::Transcription(_)
    ));
}

#[test]
fn command_line_requests_word_timestamps() {
    let w = LocalWhisper::new("whisper", "base");
    let cmd = w.build_command(Path::new("clip.mp3"), "hint text", Path::new("/tmp/out"));
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let joined = args.join(" ");
    assert_eq!(args[0], "clip.mp3");
    assert!(joined.contains("--model base"));
    assert!(joined.contains("--word_timestamps True"));
    assert!(joined.contains("--output_format json"));
    assert!(joined.contains("--output_dir /tmp/out"));
    assert!(args.ends_with(&["--initial_prompt".to_string(), "hint text".to_string()]));
}

#[test]
fn missing_program_is_a_transcription_error() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = tmp.path().join("narration_1.mp3");
    std::fs::write(&clip, b"ID3").unwrap();
    let w = LocalWhisper::new("reelforge-no-such-whisper-binary", "base");
    let err = w.transcribe(&clip, "").unwrap_err();
    assert!(matches!(err, ReelError::Transcription(_)));
}
