use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Default captioned output file name.
pub const DEFAULT_OUTPUT_FILENAME: &str = "short.mp4";

/// On-disk artifact layout of one video job.
///
/// Every artifact is written once by the stage that owns it; later stages only read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobArtifactSet {
    root: PathBuf,
    output_filename: String,
}

impl JobArtifactSet {
    /// Describe an existing (or about to be created) job directory.
    pub fn new(root: impl Into<PathBuf>, output_filename: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            output_filename: output_filename.into(),
        }
    }

    /// Create `<shorts_root>/<job_id>` with its `images/` and `narrations/` subdirectories.
    ///
    /// The job root must not exist yet; an existing directory belongs to another job and fails
    /// with an `AlreadyExists` [`ReelError::Io`].
    pub fn create(
        shorts_root: &Path,
        job_id: &str,
        output_filename: impl Into<String>,
    ) -> ReelResult<Self> {
        if job_id.is_empty() || job_id.contains(['/', '\\']) || job_id == ".." {
            return Err(ReelError::validation(format!(
                "job id '{job_id}' must be a single path component"
            )));
        }
        std::fs::create_dir_all(shorts_root).map_err(|e| ReelError::io(shorts_root, e))?;
        let job = Self::new(shorts_root.join(job_id), output_filename);
        std::fs::create_dir(&job.root).map_err(|e| ReelError::io(&job.root, e))?;
        job.ensure_dirs()?;
        Ok(job)
    }

    /// Create the job root and its asset subdirectories if missing.
    pub fn ensure_dirs(&self) -> ReelResult<()> {
        for dir in [self.root.clone(), self.images_dir(), self.narrations_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| ReelError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Job directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the captioned output inside the job directory.
    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// Raw generated script text.
    pub fn response_text(&self) -> PathBuf {
        self.root.join("response.txt")
    }

    /// Parsed directive list.
    pub fn script_data(&self) -> PathBuf {
        self.root.join("data.json")
    }

    /// Directory of per-scene images.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Directory of per-scene narration clips.
    pub fn narrations_dir(&self) -> PathBuf {
        self.root.join("narrations")
    }

    /// Image of scene `n` (1-based).
    pub fn image(&self, n: usize) -> PathBuf {
        self.images_dir().join(format!("image_{n}.png"))
    }

    /// Narration clip of scene `n` (1-based).
    pub fn narration(&self, n: usize) -> PathBuf {
        self.narrations_dir().join(narration_filename(n))
    }

    /// Scene record manifest.
    pub fn narration_manifest(&self) -> PathBuf {
        self.root.join("narration.json")
    }

    /// Concatenated raw PCM narration handed to the muxer.
    pub fn narration_pcm(&self) -> PathBuf {
        self.root.join("narration.f32le")
    }

    /// Silent composited video.
    pub fn silent_video(&self) -> PathBuf {
        self.root.join("temp_video.mp4")
    }

    /// Silent video muxed with the narration track.
    pub fn with_narration(&self) -> PathBuf {
        self.root.join("with_narration.mp4")
    }

    /// Global caption timeline.
    pub fn captions_json(&self) -> PathBuf {
        self.root.join("captions.json")
    }

    /// Captioned video.
    pub fn captioned(&self) -> PathBuf {
        self.root.join(&self.output_filename)
    }

    /// Final re-encoded artifact.
    pub fn final_output(&self) -> PathBuf {
        self.root.join("final_output.mp4")
    }
}

/// File name of narration clip `n` (1-based).
pub fn narration_filename(n: usize) -> String {
    format!("narration_{n}.mp3")
}

#[cfg(test)]
#[path = "../../tests/unit/job/layout.rs"]
mod tests;
