use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};
use crate::job::layout::{JobArtifactSet, narration_filename};

/// One narrated scene after enrichment with generated assets and measured timing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneRecord {
    /// 1-based position; defines file naming and playback order.
    pub index: usize,
    /// Rendered image on disk.
    pub image_path: PathBuf,
    /// Synthesized narration clip on disk.
    pub narration_path: PathBuf,
    /// Measured clip length. Authoritative for every downstream stage.
    pub duration_millis: u64,
    /// Narration text, used as a transcription hint.
    pub text: String,
}

impl SceneRecord {
    /// Check index and duration invariants.
    pub fn validate(&self) -> ReelResult<()> {
        if self.index == 0 {
            return Err(ReelError::validation("scene index is 1-based"));
        }
        if self.duration_millis == 0 {
            return Err(ReelError::validation(format!(
                "scene {} has a zero narration duration",
                self.index
            )));
        }
        Ok(())
    }

    /// Fail with [`ReelError::MissingAsset`] unless both files exist.
    pub fn validate_assets(&self) -> ReelResult<()> {
        for p in [&self.image_path, &self.narration_path] {
            if !p.is_file() {
                return Err(ReelError::missing_asset(p));
            }
        }
        Ok(())
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_millis as f64 / 1000.0
    }
}

/// Persisted manifest entry (`narration.json`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    /// Clip file name inside `narrations/`.
    pub filename: String,
    /// Clip duration in milliseconds.
    pub duration: u64,
    /// Narration text.
    pub text: String,
}

/// Scene timing manifest persisted next to the job assets, so later stages and re-runs know
/// timing without regenerating audio.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NarrationManifest {
    /// Entries in scene order.
    pub entries: Vec<ManifestEntry>,
}

impl NarrationManifest {
    /// Build from scene records.
    pub fn from_records(records: &[SceneRecord]) -> Self {
        Self {
            entries: records
                .iter()
                .map(|r| ManifestEntry {
                    filename: narration_filename(r.index),
                    duration: r.duration_millis,
                    text: r.text.clone(),
                })
                .collect(),
        }
    }

    /// Resolve entries back to scene records inside `job`.
    pub fn to_records(&self, job: &JobArtifactSet) -> ReelResult<Vec<SceneRecord>> {
        let mut out = Vec::with_capacity(self.entries.len());
        for (i, e) in self.entries.iter().enumerate() {
            let index = i + 1;
            let record = SceneRecord {
                index,
                image_path: job.image(index),
                narration_path: job.narrations_dir().join(&e.filename),
                duration_millis: e.duration,
                text: e.text.clone(),
            };
            record.validate()?;
            out.push(record);
        }
        Ok(out)
    }

    /// Write as pretty JSON.
    pub fn write(&self, path: &Path) -> ReelResult<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| ReelError::serde(format!("narration manifest encode failed: {e}")))?;
        std::fs::write(path, json).map_err(|e| ReelError::io(path, e))
    }

    /// Read a manifest written by [`NarrationManifest::write`].
    pub fn read(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| ReelError::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ReelError::serde(format!(
                "narration manifest '{}' parse failed: {e}",
                path.display()
            ))
        })
    }
}

/// Start offset of every scene in the concatenated narration track, in milliseconds.
///
/// Element `i` is the exact sum of the durations of scenes `0..i`.
pub fn scene_offsets_millis(records: &[SceneRecord]) -> Vec<u64> {
    let mut acc = 0u64;
    records
        .iter()
        .map(|r| {
            let start = acc;
            acc += r.duration_millis;
            start
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/job/manifest.rs"]
mod tests;
