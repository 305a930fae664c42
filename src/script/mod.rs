//! Scene script parsing.

pub mod parser;

pub use parser::{ParsedScript, SceneDirective, normalize_generated_text, parse_script};
