use std::path::PathBuf;

/// Convenience result type used across reelforge.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy for a video job.
///
/// Everything except [`ReelError::Transcription`] from a primary backend is fatal for the job that
/// raised it; the caller decides whether the next queued job still runs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid settings or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A `Tags:` line whose remainder is not a JSON array of strings.
    #[error("malformed tags line '{line}': {reason}")]
    MalformedTags {
        /// The offending script line.
        line: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A narration clip that could not be decoded to a duration.
    #[error("unreadable audio '{}': {reason}", path.display())]
    UnreadableAudio {
        /// Clip path.
        path: PathBuf,
        /// Decoder diagnostic.
        reason: String,
    },

    /// A scene asset (image or narration clip) that is not on disk.
    #[error("missing asset '{}'", path.display())]
    MissingAsset {
        /// Expected asset path.
        path: PathBuf,
    },

    /// Errors while streaming frames into the silent video encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// The narration mux pass exited unsuccessfully.
    #[error("mux failed ({status}): {stderr}")]
    Mux {
        /// Process exit status.
        status: String,
        /// Captured stdout.
        stdout: String,
        /// Captured stderr.
        stderr: String,
    },

    /// The final re-encode pass exited unsuccessfully.
    #[error("finalize failed ({status}): {stderr}")]
    Finalize {
        /// Process exit status.
        status: String,
        /// Captured stdout.
        stdout: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Word-level transcription failed.
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Burning captions onto the muxed video failed.
    #[error("caption error: {0}")]
    Caption(String),

    /// An external service (LLM, image generator, TTS, uploader) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failure on a job artifact.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Transcription`] value.
    pub fn transcription(msg: impl Into<String>) -> Self {
        Self::Transcription(msg.into())
    }

    /// Build a [`ReelError::Caption`] value.
    pub fn caption(msg: impl Into<String>) -> Self {
        Self::Caption(msg.into())
    }

    /// Build a [`ReelError::Collaborator`] value.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ReelError::MissingAsset`] value.
    pub fn missing_asset(path: impl Into<PathBuf>) -> Self {
        Self::MissingAsset { path: path.into() }
    }

    /// Build a [`ReelError::UnreadableAudio`] value.
    pub fn unreadable_audio(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnreadableAudio {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ReelError::Io`] value for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Return `true` for errors that carry captured process output.
    pub fn has_process_output(&self) -> bool {
        matches!(self, Self::Mux { .. } | Self::Finalize { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
