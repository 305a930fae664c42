//! Encoding passes.
//!
//! The compositor streams frames into a [`FrameSink`]; narration muxing and the final re-encode
//! are separate `ffmpeg` runs over files in the job directory.

/// `ffmpeg`-based frame sink and process helpers.
pub mod ffmpeg;
/// Final re-encode and intermediate cleanup.
pub mod finalize;
/// Narration concatenation and mux.
pub mod mux;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ToolOutput, ensure_parent_dir, is_ffmpeg_on_path, run_tool,
};
pub use finalize::{cleanup_intermediates, finalize};
pub use mux::{AUDIO_BITRATE, mux_narration, mux_pcm_with_video};
pub use sink::{CountingSink, FrameSink, InMemorySink, SinkConfig};
