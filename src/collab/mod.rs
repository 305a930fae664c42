//! External collaborators: script writing, image generation, speech synthesis, upload.
//!
//! The pipeline only sees the traits below. [`OpenAiClient`] is the default implementation of
//! the first three.

use std::path::Path;

use crate::foundation::error::ReelResult;

pub mod openai;
pub mod retry;
pub mod styles;
pub mod upload;

pub use openai::OpenAiClient;
pub use retry::RetryPolicy;
pub use styles::{ArtMovement, Characteristic, StyleBible, build_image_prompt};
pub use upload::{UploadMetadata, Uploader};

/// Writes a raw scene script for some source material.
pub trait ScriptWriter {
    fn write_script(&self, source_material: &str) -> ReelResult<String>;
}

/// Renders one image description to a PNG at `out_path`.
pub trait ImageGenerator {
    fn generate_image(&self, prompt: &str, out_path: &Path) -> ReelResult<()>;
}

/// Speaks one narration line into an audio file at `out_path`.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str, out_path: &Path) -> ReelResult<()>;
}
