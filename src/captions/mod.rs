//! Caption timeline and burn-in.
//!
//! Each narration clip is transcribed on its own and shifted onto the concatenated narration
//! timeline. The resulting segments are rendered into the video by a [`CaptionBurner`].

pub mod burn;
pub mod segment;
pub mod transcribe;
pub mod whisper_api;
pub mod whisper_local;

pub use burn::{
    AssCaptionBurner, AssColor, CaptionBurner, CaptionOptions, CaptionStyle, build_ass_document,
};
pub use segment::{
    CaptionSegment, CaptionWord, build_caption_timeline, ensure_monotonic, offset_segments,
    read_caption_timeline, write_caption_timeline,
};
pub use transcribe::{Transcriber, TranscriptionBackends};
pub use whisper_api::{WhisperApi, parse_verbose_json};
pub use whisper_local::{LocalWhisper, parse_whisper_json};
