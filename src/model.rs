//! Data model for a parsed chord chart.
//!
//! A `Document` is built once by the parser and is read-only afterwards;
//! the layout engine and renderer only borrow it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::keys::Key;

/// Leading or trailing marker on a measure token that opens or closes a repeat.
pub const REPEAT_CHAR: char = ':';

/// Shorthand for "same as previous measure"; never transposed.
pub const REPEAT_MEASURE: &str = "%";

/// A complete chart parsed from text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Title of the song (`^` line)
    pub title: Option<String>,
    /// Lines rendered under the title, in order (`>` lines)
    pub metadata_lines: Vec<String>,
    /// Layout scale multiplier (`*scale=` line)
    pub scale: f64,
    /// Sections in source order
    pub sections: Vec<Section>,
}

/// A named group of measures with its own column and lyric-line counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section name; may be empty
    pub name: String,
    /// Measures per layout row
    pub column_count: usize,
    /// Lyric lines declared with `lyrics=`
    pub lyric_line_count: usize,
    /// Measures declared with `pickup=`
    pub pickup: usize,
    pub measures: Vec<Measure>,
    /// Lyric fragments keyed by 1-based line number, one per measure
    pub lyric_lines: BTreeMap<usize, Vec<String>>,
}

/// One bar: one or more simultaneous chord symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub chord_tokens: Vec<String>,
    pub repeat_start: bool,
    pub repeat_end: bool,
}

/// Source and destination keys for transposing subsequent measure lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChange {
    pub from: Key,
    pub to: Key,
}

impl Document {
    pub fn new() -> Self {
        Self {
            title: None,
            metadata_lines: Vec::new(),
            scale: 1.0,
            sections: Vec::new(),
        }
    }

    /// Total number of measures across all sections.
    pub fn measure_count(&self) -> usize {
        self.sections.iter().map(|s| s.measures.len()).sum()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Section {
    pub fn new(name: impl Into<String>, column_count: usize) -> Self {
        Self {
            name: name.into(),
            column_count,
            lyric_line_count: 0,
            pickup: 0,
            measures: Vec::new(),
            lyric_lines: BTreeMap::new(),
        }
    }

    /// Highest lyric line number present (the configured count, or more if
    /// the text supplied extra lines).
    pub fn lyric_line_total(&self) -> usize {
        self.lyric_lines
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .max(self.lyric_line_count)
    }

    /// Lyric fragment for a line number and measure index; empty when absent.
    pub fn lyric(&self, line: usize, measure_idx: usize) -> &str {
        self.lyric_lines
            .get(&line)
            .and_then(|frags| frags.get(measure_idx))
            .map_or("", String::as_str)
    }
}

impl Measure {
    /// Build a measure from one (already transposed) `|`-delimited token,
    /// stripping its repeat marker and splitting simultaneous chords.
    ///
    /// Only one marker is taken per token: a leading `:` wins, so in `:C G:`
    /// the trailing `:` stays on the last chord.
    pub fn from_token(token: &str) -> Self {
        let (body, repeat_start, repeat_end) = if let Some(rest) = token.strip_prefix(REPEAT_CHAR) {
            (rest, true, false)
        } else if let Some(rest) = token.strip_suffix(REPEAT_CHAR) {
            (rest, false, true)
        } else {
            (token, false, false)
        };

        Self {
            chord_tokens: body.split(' ').map(String::from).collect(),
            repeat_start,
            repeat_end,
        }
    }

    /// The chords joined back as they appeared in the source, without markers.
    pub fn label(&self) -> String {
        self.chord_tokens.join(" ")
    }
}
