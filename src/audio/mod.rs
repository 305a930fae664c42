//! Narration audio: exact clip durations and track concatenation.

pub mod concat;
pub mod duration;

pub use concat::{
    AudioPcm, MUX_CHANNELS, MUX_SAMPLE_RATE, append_pcm, concat_narrations,
    decode_audio_f32_stereo,
};
pub use duration::{load_scene_records, probe_duration_millis, resolve_scene_records};
