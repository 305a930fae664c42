//! Job directory layout and the persisted scene manifest.

pub mod layout;
pub mod manifest;

pub use layout::{DEFAULT_OUTPUT_FILENAME, JobArtifactSet, narration_filename};
pub use manifest::{ManifestEntry, NarrationManifest, SceneRecord, scene_offsets_millis};
