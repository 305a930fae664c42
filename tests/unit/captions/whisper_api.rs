use super::*;

#[test]
fn words_are_grouped_into_segments_by_time() {
    let raw = r#"{
      "text": "One two. Three four.",
      "segments": [
        {"start": 0.0, "end": 1.0, "text": " One two."},
        {"start": 1.0, "end": 2.2, "text": " Three four."}
      ],
      "words": [
        {"word": "One", "start": 0.0, "end": 0.4},
        {"word": "two.", "start": 0.5, "end": 0.95},
        {"word": "Three", "start": 1.05, "end": 1.5},
        {"word": "four.", "start": 1.6, "end": 2.2}
      ]
    }"#;
    let segments = parse_verbose_json(raw).unwrap();
    assert_eq!(segments.len(), 2);
    let words0: Vec<&str> = segments[0].words.iter().map(|w| w.text.as_str()).collect();
    let words1: Vec<&str> = segments[1].words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(words0, vec!["One", "two."]);
    assert_eq!(words1, vec!["Three", "four."]);
}

#[test]
fn words_only_become_one_segment() {
    let raw = r#"{"text": "a b", "words": [
        {"word": "a", "start": 0.2, "end": 0.3},
        {"word": "b", "start": 0.4, "end": 0.7}
    ]}"#;
    let segments = parse_verbose_json(raw).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "a b");
    assert_eq!(segments[0].start, 0.2);
    assert_eq!(segments[0].end, 0.7);
}

#[test]
fn silence_is_empty_and_garbage_is_an_error() {
    assert!(parse_verbose_json(r#"{"text": ""}"#).unwrap().is_empty());
    assert!(matches!(
        parse_verbose_json("<html>").unwrap_err(),
        ReelError::Transcription(_)
    ));
}
