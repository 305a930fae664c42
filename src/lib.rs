#![forbid(unsafe_code)]

//! Narrated short-video assembly.
//!
//! A generated scene script (bracketed image descriptions and `Narrator:` lines) becomes one MP4:
//! each scene's image is held for exactly as long as its narration clip, consecutive scenes are
//! joined by a horizontal wipe, the narration is muxed in, captions are burned on top and the
//! result is re-encoded into `final_output.mp4`.
//!
//! The system `ffmpeg` binary does all container work. Script writing, image generation, speech
//! synthesis, transcription and upload are collaborators behind traits in [`collab`] and
//! [`captions`].

pub mod audio;
pub mod captions;
pub mod collab;
pub mod compose;
pub mod encode;
pub mod foundation;
pub mod job;
pub mod pipeline;
pub mod script;
pub mod settings;

pub use foundation::core::{Canvas, FrameIndex, FrameRGBA, Fps};
pub use foundation::error::{ReelError, ReelResult};
pub use job::{JobArtifactSet, SceneRecord};
pub use pipeline::{AssemblyReport, JobContext, assemble_job, generate_job, run_batch};
pub use script::{ParsedScript, SceneDirective, parse_script};
pub use settings::Settings;
