use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::foundation::error::{ReelError, ReelResult};

/// One trait of an art movement; style files list them either as bare strings or as objects.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Characteristic {
    Named { name: String, description: String },
    Plain(String),
}

impl std::fmt::Display for Characteristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { name, description } => write!(f, "{name}: {description}"),
            Self::Plain(text) => f.write_str(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArtMovement {
    pub name: String,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

/// The set of art movements image prompts are styled with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleBible {
    pub art_movements: Vec<ArtMovement>,
}

impl StyleBible {
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        serde_json::from_str(s).map_err(|e| ReelError::serde(format!("style bible: {e}")))
    }

    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ReelError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    /// The configured bible, or the built-in one when no path is set.
    pub fn load_or_builtin(path: Option<&Path>) -> ReelResult<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn builtin() -> Self {
        let movement = |name: &str, traits: &[(&str, &str)]| ArtMovement {
            name: name.to_string(),
            characteristics: traits
                .iter()
                .map(|(n, d)| Characteristic::Named {
                    name: n.to_string(),
                    description: d.to_string(),
                })
                .collect(),
        };
        Self {
            art_movements: vec![
                movement(
                    "Impressionism",
                    &[
                        ("Brushwork", "visible, short, broken strokes"),
                        ("Light", "changing natural light and its reflections"),
                    ],
                ),
                movement(
                    "Art Nouveau",
                    &[
                        ("Line", "long flowing organic curves"),
                        ("Motifs", "stylized plants and flowers"),
                    ],
                ),
                movement(
                    "Ukiyo-e",
                    &[
                        ("Composition", "flat planes of color with bold outlines"),
                        ("Subject", "landscapes and everyday scenes"),
                    ],
                ),
                movement(
                    "Pop Art",
                    &[
                        ("Color", "bright saturated primaries"),
                        ("Technique", "halftone dots and crisp graphic edges"),
                    ],
                ),
                movement(
                    "Watercolor Illustration",
                    &[
                        ("Medium", "soft translucent washes"),
                        ("Edges", "blooms and gentle gradients"),
                    ],
                ),
            ],
        }
    }

    /// Pick a movement uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ArtMovement> {
        self.art_movements.choose(rng)
    }
}

/// Prefix an image description with a style instruction.
pub fn build_image_prompt(description: &str, style: Option<&ArtMovement>) -> String {
    let Some(style) = style else {
        return description.to_string();
    };
    let traits = style
        .characteristics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!(
        "Create an image in the style of {} art. The artwork should incorporate these characteristics: {traits}\n\nScene to create: {description}",
        style.name
    )
}

#[cfg(test)]
#[path = "../../tests/unit/collab/styles.rs"]
mod tests;
