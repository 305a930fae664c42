use std::path::Path;
use std::process::Command;

use crate::captions::segment::{CaptionSegment, CaptionWord};
use crate::encode::ffmpeg::{ensure_parent_dir, run_tool};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Opaque caption options from the `captions` settings section.
///
/// Keys are read leniently: a missing key or a value of the wrong type falls back to the default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptionOptions {
    raw: serde_json::Map<String, serde_json::Value>,
}

impl CaptionOptions {
    pub fn new(raw: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.raw
    }

    fn str_opt(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(|v| v.as_str())
    }

    fn f64_opt(&self, key: &str) -> Option<f64> {
        self.raw.get(key).and_then(|v| v.as_f64())
    }

    fn bool_opt(&self, key: &str) -> Option<bool> {
        self.raw.get(key).and_then(|v| v.as_bool())
    }
}

/// Burns a caption timeline into a video.
pub trait CaptionBurner {
    fn burn(
        &self,
        input: &Path,
        segments: &[CaptionSegment],
        options: &CaptionOptions,
        output: &Path,
    ) -> ReelResult<()>;
}

/// An RGB color as used in ASS scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AssColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, `rrggbb` or a basic color name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let named = match s.to_ascii_lowercase().as_str() {
            "white" => Some(Self::WHITE),
            "black" => Some(Self::BLACK),
            "red" => Some(Self::rgb(255, 0, 0)),
            "green" => Some(Self::rgb(0, 128, 0)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "yellow" => Some(Self::rgb(255, 255, 0)),
            _ => None,
        };
        if named.is_some() {
            return named;
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Style-section form: `&H00BBGGRR`.
    pub fn style(self) -> String {
        format!("&H00{:02X}{:02X}{:02X}", self.b, self.g, self.r)
    }

    /// Override-tag form: `&HBBGGRR&`.
    pub fn tag(self) -> String {
        format!("&H{:02X}{:02X}{:02X}&", self.b, self.g, self.r)
    }
}

/// Resolved caption look.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionStyle {
    pub font: String,
    pub font_size: u32,
    pub font_color: AssColor,
    pub stroke_color: AssColor,
    pub stroke_width: u32,
    pub words_per_line: usize,
    pub highlight_current_word: bool,
    pub word_highlight_color: AssColor,
    /// ASS numpad alignment (2 bottom, 5 middle, 8 top).
    pub alignment: u8,
    pub margin_v: u32,
}

impl CaptionStyle {
    pub fn from_options(options: &CaptionOptions, canvas: Canvas) -> Self {
        let color = |key: &str, default: AssColor| match options.str_opt(key) {
            Some(s) => AssColor::parse(s).unwrap_or_else(|| {
                tracing::warn!(key, value = s, "unrecognized caption color, using default");
                default
            }),
            None => default,
        };
        let default_size = ((f64::from(canvas.height) * 0.06).round() as u32).max(18);
        let (alignment, margin_v) = match options.str_opt("position").unwrap_or("center") {
            "bottom" => (2, (f64::from(canvas.height) * 0.12).round() as u32),
            "top" => (8, (f64::from(canvas.height) * 0.08).round() as u32),
            _ => (5, 0),
        };

        Self {
            font: options.str_opt("font").unwrap_or("Arial").to_string(),
            font_size: options
                .f64_opt("font_size")
                .filter(|s| s.is_finite() && *s > 0.0)
                .map(|s| s.round() as u32)
                .unwrap_or(default_size),
            font_color: color("font_color", AssColor::WHITE),
            stroke_color: color("stroke_color", AssColor::BLACK),
            stroke_width: options
                .f64_opt("stroke_width")
                .filter(|w| w.is_finite() && *w >= 0.0)
                .map(|w| w.round() as u32)
                .unwrap_or(3),
            words_per_line: options
                .f64_opt("words_per_line")
                .filter(|n| n.is_finite() && *n >= 1.0)
                .map(|n| n as usize)
                .unwrap_or(4),
            highlight_current_word: options.bool_opt("highlight_current_word").unwrap_or(true),
            word_highlight_color: color("word_highlight_color", AssColor::rgb(255, 0, 0)),
            alignment,
            margin_v,
        }
    }
}

/// Caption burner that writes an ASS script and renders it with ffmpeg's `subtitles` filter.
#[derive(Clone, Debug)]
pub struct AssCaptionBurner {
    canvas: Canvas,
    encoder: String,
}

impl AssCaptionBurner {
    pub fn new(canvas: Canvas, encoder: impl Into<String>) -> Self {
        Self {
            canvas,
            encoder: encoder.into(),
        }
    }
}

impl CaptionBurner for AssCaptionBurner {
    #[tracing::instrument(skip(self, segments, options), fields(segments = segments.len()))]
    fn burn(
        &self,
        input: &Path,
        segments: &[CaptionSegment],
        options: &CaptionOptions,
        output: &Path,
    ) -> ReelResult<()> {
        if !input.is_file() {
            return Err(ReelError::missing_asset(input));
        }
        ensure_parent_dir(output)?;

        let style = CaptionStyle::from_options(options, self.canvas);
        let doc = build_ass_document(self.canvas, &style, segments);
        let ass_path = output.with_extension("ass");
        std::fs::write(&ass_path, doc).map_err(|e| ReelError::io(&ass_path, e))?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-v", "error", "-i"])
            .arg(input)
            .arg("-vf")
            .arg(format!("subtitles={}", escape_filter_path(&ass_path)))
            .args(["-c:v", &self.encoder, "-pix_fmt", "yuv420p", "-c:a", "copy"])
            .arg(output);
        let result = run_tool(&mut cmd);
        let _ = std::fs::remove_file(&ass_path);

        let out = result.map_err(|e| ReelError::caption(e.to_string()))?;
        if !out.success {
            return Err(ReelError::caption(format!(
                "ffmpeg subtitles pass exited with status {}: {}",
                out.status, out.stderr
            )));
        }
        if !output.is_file() {
            return Err(ReelError::caption(format!(
                "caption burn produced no output at '{}'",
                output.display()
            )));
        }
        Ok(())
    }
}

/// Render a full ASS script for `segments`.
pub fn build_ass_document(
    canvas: Canvas,
    style: &CaptionStyle,
    segments: &[CaptionSegment],
) -> String {
    let mut doc = format!(
        "[Script Info]\n\
         ScriptType: v4.00+\n\
         PlayResX: {w}\n\
         PlayResY: {h}\n\
         ScaledBorderAndShadow: yes\n\
         \n\
         [V4+ Styles]\n\
         Format: Name,Fontname,Fontsize,PrimaryColour,SecondaryColour,OutlineColour,BackColour,Bold,Italic,Underline,StrikeOut,ScaleX,ScaleY,Spacing,Angle,BorderStyle,Outline,Shadow,Alignment,MarginL,MarginR,MarginV,Encoding\n\
         Style: Caption,{font},{size},{pri},{pri},{out},&H64000000,-1,0,0,0,100,100,0,0,1,{ow},0,{al},40,40,{mv},1\n\
         \n\
         [Events]\n\
         Format: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text\n",
        w = canvas.width,
        h = canvas.height,
        font = style.font,
        size = style.font_size,
        pri = style.font_color.style(),
        out = style.stroke_color.style(),
        ow = style.stroke_width,
        al = style.alignment,
        mv = style.margin_v,
    );

    for seg in segments {
        let words = segment_words(seg);
        for line in words.chunks(style.words_per_line.max(1)) {
            push_line_events(&mut doc, style, line);
        }
    }
    doc
}

fn push_line_events(doc: &mut String, style: &CaptionStyle, line: &[CaptionWord]) {
    let (Some(first), Some(last)) = (line.first(), line.last()) else {
        return;
    };
    let line_start = secs_to_cs(first.start);
    let line_end = secs_to_cs(last.end).max(line_start + 1);
    let tokens: Vec<String> = line.iter().map(|w| escape_ass_text(&w.text)).collect();

    if !style.highlight_current_word {
        push_dialogue(doc, line_start, line_end, &tokens.join(" "));
        return;
    }

    for (i, _) in line.iter().enumerate() {
        let start = if i == 0 {
            line_start
        } else {
            secs_to_cs(line[i].start).max(line_start)
        };
        let end = match line.get(i + 1) {
            Some(next) => secs_to_cs(next.start).min(line_end),
            None => line_end,
        }
        .max(start + 1);

        let text = tokens
            .iter()
            .enumerate()
            .map(|(j, t)| {
                if j == i {
                    format!(
                        "{{\\c{}}}{t}{{\\c{}}}",
                        style.word_highlight_color.tag(),
                        style.font_color.tag()
                    )
                } else {
                    t.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        push_dialogue(doc, start, end, &text);
    }
}

fn push_dialogue(doc: &mut String, start_cs: i64, end_cs: i64, text: &str) {
    doc.push_str(&format!(
        "Dialogue: 0,{},{},Caption,,0,0,0,,{text}\n",
        cs_to_ass(start_cs),
        cs_to_ass(end_cs)
    ));
}

/// Word timing for a segment; segments without words spread their tokens evenly.
fn segment_words(seg: &CaptionSegment) -> Vec<CaptionWord> {
    if !seg.words.is_empty() {
        return seg.words.clone();
    }
    let tokens: Vec<&str> = seg.text.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    let step = (seg.end - seg.start).max(0.0) / tokens.len() as f64;
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| CaptionWord {
            start: seg.start + step * i as f64,
            end: seg.start + step * (i + 1) as f64,
            text: (*t).to_string(),
        })
        .collect()
}

fn secs_to_cs(secs: f64) -> i64 {
    (secs * 100.0).round().max(0.0) as i64
}

/// `H:MM:SS.cc`, ASS timestamps are centisecond precision.
pub(crate) fn cs_to_ass(cs: i64) -> String {
    let total = cs.max(0);
    let h = total / 360_000;
    let m = (total % 360_000) / 6_000;
    let s = (total % 6_000) / 100;
    let c = total % 100;
    format!("{h}:{m:02}:{s:02}.{c:02}")
}

fn escape_ass_text(s: &str) -> String {
    s.replace('\\', "/")
        .replace('{', "(")
        .replace('}', ")")
        .replace(['\n', '\r'], " ")
}

/// Escape a path for use as a filter option value inside an `-vf` filtergraph.
///
/// ffmpeg unescapes twice: once when splitting the graph into filters, once when splitting a
/// filter's arguments into options. The value is escaped for the option level first, then the
/// result for the graph level.
pub(crate) fn escape_filter_path(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let option = escape_with(&raw, &['\\', '\'', ':']);
    escape_with(&option, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_with(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        if special.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/captions/burn.rs"]
mod tests;
