//! Error types for chart parsing, transposition and layout.
//!
//! All authoring errors are fatal for the document being processed, but they
//! are returned as values; only the binary decides to abort.

use std::fmt;

use thiserror::Error;

/// A chord symbol could not be mapped onto the source key's scale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransposeError {
    #[error("bad chord [{chord}]: root not found in the scale of {key}")]
    UnrecognizedRoot { chord: String, key: String },
}

/// Malformed chart text. Every variant carries the 1-based input line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: bad section option [{item}], expected key=value")]
    BadSectionOption { line: usize, item: String },

    #[error("line {line}: unknown section option [{key}]")]
    UnknownSectionOption { line: usize, key: String },

    #[error("line {line}: bad value [{value}] for section option {key}")]
    BadSectionValue { line: usize, key: String, value: String },

    #[error("line {line}: lyrics line has too many measures ({found} for {expected})")]
    TooManyLyricSegments {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unexpected line [{text}]")]
    UnexpectedLine { line: usize, text: String },

    #[error("line {line}: bad key change [{text}]")]
    BadKeyChange { line: usize, text: String },

    #[error("line {line}: bad scale setting [{text}]")]
    BadScale { line: usize, text: String },

    #[error("line {line}: {source}")]
    Transpose {
        line: usize,
        #[source]
        source: TransposeError,
    },
}

impl ParseError {
    /// Input line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::BadSectionOption { line, .. }
            | ParseError::UnknownSectionOption { line, .. }
            | ParseError::BadSectionValue { line, .. }
            | ParseError::TooManyLyricSegments { line, .. }
            | ParseError::UnexpectedLine { line, .. }
            | ParseError::BadKeyChange { line, .. }
            | ParseError::BadScale { line, .. }
            | ParseError::Transpose { line, .. } => *line,
        }
    }
}

/// What kind of cell a piece of text was being fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Chord,
    Lyric,
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextKind::Chord => f.write_str("chord"),
            TextKind::Lyric => f.write_str("lyric"),
        }
    }
}

/// Text that cannot be made to fit its cell at any font size.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("can't print this {kind}: [{text}] too wide at any size")]
    TextTooWide { kind: TextKind, text: String },
}

/// Top-level error for the convenience API and the binary.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
