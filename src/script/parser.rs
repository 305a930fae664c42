use crate::foundation::error::{ReelError, ReelResult};

/// One typed line of a generated scene script.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneDirective {
    /// Bracketed background image description.
    Image {
        /// Prompt text for the image generator.
        description: String,
    },
    /// `Narrator:` line.
    Narration {
        /// Text handed to the speech synthesizer.
        text: String,
    },
    /// `Title:` line.
    Title {
        /// Video title.
        text: String,
    },
    /// `Description:` line.
    Description {
        /// Video description.
        text: String,
    },
    /// `Tags:` line.
    Tags {
        /// Tags in source order.
        values: Vec<String>,
    },
}

/// Parser output: directives in source order plus the narration lines alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParsedScript {
    /// Every recognized line, in source order.
    pub directives: Vec<SceneDirective>,
    /// Narration texts in source order.
    pub narrations: Vec<String>,
}

impl ParsedScript {
    /// Image descriptions in source order.
    pub fn image_descriptions(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            SceneDirective::Image { description } => Some(description.as_str()),
            _ => None,
        })
    }

    /// Last `Title:` line, if any.
    pub fn title(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            SceneDirective::Title { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Last `Description:` line, if any.
    pub fn description(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            SceneDirective::Description { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Last `Tags:` line, if any.
    pub fn tags(&self) -> Option<&[String]> {
        self.directives.iter().rev().find_map(|d| match d {
            SceneDirective::Tags { values } => Some(values.as_slice()),
            _ => None,
        })
    }
}

const SEPARATOR: &str = "###";
const NARRATION_QUOTE_LAYERS: usize = 3;

/// Parse generated script text into directives.
///
/// Lines are classified independently, first matching rule wins. Unrecognized lines are skipped;
/// only a malformed `Tags:` line fails the parse.
pub fn parse_script(text: &str) -> ReelResult<ParsedScript> {
    let mut out = ParsedScript::default();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line == SEPARATOR {
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            let description = line[1..line.len() - 1].trim().to_string();
            out.directives.push(SceneDirective::Image { description });
        } else if let Some(rest) = line.strip_prefix("Title:") {
            out.directives.push(SceneDirective::Title {
                text: strip_quote_layer(rest.trim()).to_string(),
            });
        } else if let Some(rest) = line.strip_prefix("Description:") {
            out.directives.push(SceneDirective::Description {
                text: strip_quote_layer(rest.trim()).to_string(),
            });
        } else if let Some(rest) = line.strip_prefix("Tags:") {
            let values = parse_tags(line, rest.trim())?;
            out.directives.push(SceneDirective::Tags { values });
        } else if let Some(rest) = line.strip_prefix("Narrator:") {
            let mut narration = rest.trim();
            for _ in 0..NARRATION_QUOTE_LAYERS {
                let inner = narration.strip_prefix(is_quote_char).unwrap_or(narration);
                let inner = inner.strip_suffix(is_quote_char).unwrap_or(inner);
                if inner.len() == narration.len() {
                    break;
                }
                narration = inner.trim();
            }
            let text = narration.to_string();
            out.narrations.push(text.clone());
            out.directives.push(SceneDirective::Narration { text });
        } else {
            tracing::debug!(line, "ignoring unrecognized script line");
        }
    }

    Ok(out)
}

fn parse_tags(line: &str, rest: &str) -> ReelResult<Vec<String>> {
    serde_json::from_str::<Vec<String>>(rest).map_err(|e| ReelError::MalformedTags {
        line: line.to_string(),
        reason: e.to_string(),
    })
}

fn is_quote_char(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}

/// Remove one matching pair of straight or curly quotes around `s`.
fn strip_quote_layer(s: &str) -> &str {
    const PAIRS: [(char, char); 4] = [
        ('"', '"'),
        ('\'', '\''),
        ('\u{201C}', '\u{201D}'),
        ('\u{2018}', '\u{2019}'),
    ];
    for (open, close) in PAIRS {
        if let Some(inner) = s.strip_prefix(open).and_then(|r| r.strip_suffix(close)) {
            return inner;
        }
    }
    s
}

/// Replace typographic punctuation an LLM tends to emit with plain ASCII.
///
/// Applied to raw generated text before it is persisted and parsed, so narration sent to speech
/// synthesis contains no characters the synthesizer reads aloud oddly.
pub fn normalize_generated_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '`' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/script/parser.rs"]
mod tests;
