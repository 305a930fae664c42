use std::path::Path;

use crate::foundation::error::ReelResult;
use crate::script::ParsedScript;
use crate::settings::UploadSettings;

/// Video metadata handed to an [`Uploader`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl UploadMetadata {
    /// Metadata from the script's `Title:`/`Description:`/`Tags:` lines; uploads start private.
    pub fn from_script(script: &ParsedScript, upload: &UploadSettings) -> Self {
        Self {
            title: script.title().unwrap_or_default().to_string(),
            description: script.description().unwrap_or_default().to_string(),
            tags: script.tags().map(<[String]>::to_vec).unwrap_or_default(),
            category_id: upload.youtube_category.clone(),
            privacy_status: "private".to_string(),
            channel: upload.youtube_channel.clone(),
        }
    }
}

/// Publishes a finished video; returns a platform identifier for it.
pub trait Uploader {
    fn upload(&self, video: &Path, metadata: &UploadMetadata) -> ReelResult<String>;
}

#[cfg(test)]
#[path = "../../tests/unit/collab/upload.rs"]
mod tests;
