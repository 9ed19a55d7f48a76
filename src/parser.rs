//! Chart text parser: converts line-oriented chart text into the Document model.
//!
//! Every line is first classified by its leading character. A pure
//! transition function then maps `(state, line)` to the next state and an
//! `Action`, and a `DocumentBuilder` applies the actions in order.

use log::{debug, warn};

use crate::error::ParseError;
use crate::keys::Key;
use crate::model::*;
use crate::transpose::Transposer;

pub const SECTION_START: char = '+';
pub const MEASURE_SPLIT: char = '|';
pub const SECTION_LINE_SPLIT: char = '~';
pub const TITLE_START: char = '^';
pub const METADATA_START: char = '>';
pub const SCALE_START: char = '*';
pub const KEY_CHANGE_START: char = '}';
pub const KEY_CHANGE_SPLIT: char = '~';

/// Columns per row when a section header does not give `width=`.
pub const DEFAULT_COLUMN_COUNT: usize = 4;

/// Parse chart text into a Document.
pub fn parse_chart(text: &str) -> Result<Document, ParseError> {
    let mut state = ParserState::Idle;
    let mut builder = DocumentBuilder::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let (next, action) = transition(state, classify_line(line), line_no)?;
        builder.apply(action, line_no)?;
        state = next;
    }

    Ok(builder.finish())
}

// ─── Line classification ────────────────────────────────────────────

/// What a single input line is, judged by its first character alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Title(&'a str),
    Metadata(&'a str),
    Scale(&'a str),
    KeyChange(&'a str),
    Section(&'a str),
    /// A measure line or a lyrics line, depending on parser state
    Content(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    let mut chars = line.chars();
    let first = chars.next();
    let body = chars.as_str();
    match first {
        Some(TITLE_START) => LineKind::Title(body),
        Some(METADATA_START) => LineKind::Metadata(body),
        Some(SCALE_START) => LineKind::Scale(body),
        Some(KEY_CHANGE_START) => LineKind::KeyChange(body),
        Some(SECTION_START) => LineKind::Section(body),
        _ => LineKind::Content(line),
    }
}

// ─── State machine ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No section is open yet
    Idle,
    /// The next content line is a measure line
    ExpectMeasureLine { first_in_section: bool },
    /// The next content line is lyric line `line_number` of the current
    /// measure group, which is `group_width` measures wide
    ExpectLyricsLine { line_number: usize, group_width: usize },
}

/// Options parsed from a `+` section line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub name: String,
    pub column_count: usize,
    pub lyric_line_count: usize,
    pub pickup: usize,
}

/// Side effect of one line on the document under construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<'a> {
    None,
    SetTitle(&'a str),
    AddMetadata(&'a str),
    SetScale(f64),
    SetKeyChange(Option<KeyChange>),
    OpenSection(SectionHeader),
    AddMeasures {
        tokens: Vec<&'a str>,
        pad_previous_group: bool,
    },
    AddLyrics {
        line_number: usize,
        group_width: usize,
        segments: Vec<&'a str>,
    },
}

/// Decide the next state and the action for one classified line.
pub fn transition<'a>(
    state: ParserState,
    kind: LineKind<'a>,
    line_no: usize,
) -> Result<(ParserState, Action<'a>), ParseError> {
    use ParserState::*;

    let step = match (kind, state) {
        (LineKind::Blank, ExpectLyricsLine { .. }) => (
            ExpectMeasureLine {
                first_in_section: false,
            },
            Action::None,
        ),
        (LineKind::Blank, other) => (other, Action::None),

        (LineKind::Title(body), s) => (s, Action::SetTitle(body.trim())),
        (LineKind::Metadata(body), s) => (s, Action::AddMetadata(body)),
        (LineKind::Scale(body), s) => (s, Action::SetScale(parse_scale(body, line_no)?)),
        (LineKind::KeyChange(body), s) => (s, Action::SetKeyChange(parse_key_change(body, line_no)?)),

        (LineKind::Section(body), _) => (
            ExpectMeasureLine {
                first_in_section: true,
            },
            Action::OpenSection(parse_section_header(body, line_no)?),
        ),

        (LineKind::Content(line), ExpectMeasureLine { first_in_section }) => {
            let tokens = measure_split(line);
            (
                ExpectLyricsLine {
                    line_number: 1,
                    group_width: tokens.len(),
                },
                Action::AddMeasures {
                    tokens,
                    pad_previous_group: !first_in_section,
                },
            )
        }

        (LineKind::Content(line), ExpectLyricsLine { line_number, group_width }) => {
            let segments = lyrics_split(line);
            if segments.len() > group_width {
                return Err(ParseError::TooManyLyricSegments {
                    line: line_no,
                    expected: group_width,
                    found: segments.len(),
                });
            }
            (
                ExpectLyricsLine {
                    line_number: line_number + 1,
                    group_width,
                },
                Action::AddLyrics {
                    line_number,
                    group_width,
                    segments,
                },
            )
        }

        (LineKind::Content(line), Idle) => {
            return Err(ParseError::UnexpectedLine {
                line: line_no,
                text: line.to_string(),
            })
        }
    };

    Ok(step)
}

/// Split a measure line into raw chord tokens; outer delimiters are dropped.
pub fn measure_split(line: &str) -> Vec<&str> {
    line.trim()
        .trim_matches(MEASURE_SPLIT)
        .split(MEASURE_SPLIT)
        .map(str::trim)
        .collect()
}

/// Split a lyrics line into fragments. Outer delimiters are kept, so a
/// leading `|` leaves the first measure without lyrics.
pub fn lyrics_split(line: &str) -> Vec<&str> {
    line.split(MEASURE_SPLIT).collect()
}

// ─── Marker line bodies ─────────────────────────────────────────────

fn parse_section_header(body: &str, line_no: usize) -> Result<SectionHeader, ParseError> {
    let mut items = body.split(SECTION_LINE_SPLIT);
    let mut header = SectionHeader {
        name: items.next().unwrap_or("").trim().to_string(),
        column_count: DEFAULT_COLUMN_COUNT,
        lyric_line_count: 0,
        pickup: 0,
    };

    for item in items {
        let (key, value) = item.split_once('=').ok_or_else(|| ParseError::BadSectionOption {
            line: line_no,
            item: item.to_string(),
        })?;
        let (key, value) = (key.trim(), value.trim());
        let bad_value = || ParseError::BadSectionValue {
            line: line_no,
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "width" => {
                header.column_count = value.parse().map_err(|_| bad_value())?;
                if header.column_count == 0 {
                    return Err(bad_value());
                }
            }
            "lyrics" => header.lyric_line_count = value.parse().map_err(|_| bad_value())?,
            "pickup" => header.pickup = value.parse().map_err(|_| bad_value())?,
            _ => {
                return Err(ParseError::UnknownSectionOption {
                    line: line_no,
                    key: key.to_string(),
                })
            }
        }
    }

    Ok(header)
}

fn parse_key_change(body: &str, line_no: usize) -> Result<Option<KeyChange>, ParseError> {
    // No source key (`}`, `}~`, `}~D`) means no transposition.
    if body.split(KEY_CHANGE_SPLIT).next().is_some_and(|from| from.trim().is_empty()) {
        return Ok(None);
    }
    let bad = || ParseError::BadKeyChange {
        line: line_no,
        text: body.to_string(),
    };

    let mut keys = body.split(KEY_CHANGE_SPLIT).map(|k| Key::from_name(k.trim()));
    match (keys.next(), keys.next(), keys.next()) {
        (Some(Some(from)), Some(Some(to)), None) => Ok(Some(KeyChange { from, to })),
        _ => Err(bad()),
    }
}

fn parse_scale(body: &str, line_no: usize) -> Result<f64, ParseError> {
    let bad = || ParseError::BadScale {
        line: line_no,
        text: body.to_string(),
    };

    let (name, value) = body.split_once('=').ok_or_else(bad)?;
    if !matches!(name.trim(), "scale" | "scaleFactor") {
        return Err(bad());
    }
    let scale: f64 = value.trim().parse().map_err(|_| bad())?;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(bad());
    }
    Ok(scale)
}

// ─── Document builder ───────────────────────────────────────────────

/// Accumulates actions into a Document.
pub struct DocumentBuilder {
    doc: Document,
    current: Option<Section>,
    transposer: Transposer,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            current: None,
            transposer: Transposer::identity(),
        }
    }

    pub fn apply(&mut self, action: Action<'_>, line_no: usize) -> Result<(), ParseError> {
        match action {
            Action::None => {}
            Action::SetTitle(title) => self.doc.title = Some(title.to_string()),
            Action::AddMetadata(line) => self.doc.metadata_lines.push(line.to_string()),
            Action::SetScale(scale) => {
                debug!("scale factor set to {scale}");
                self.doc.scale = scale;
            }
            Action::SetKeyChange(change) => {
                match change {
                    Some(KeyChange { from, to }) => debug!("transposing from {from} to {to}"),
                    None => debug!("transposition cleared"),
                }
                self.transposer = Transposer::new(change);
            }
            Action::OpenSection(header) => self.open_section(header),
            Action::AddMeasures {
                tokens,
                pad_previous_group,
            } => {
                let chords = self
                    .transposer
                    .transpose_tokens(&tokens)
                    .map_err(|source| ParseError::Transpose { line: line_no, source })?;
                let section = self.section_mut(line_no)?;
                if pad_previous_group {
                    pad_lyric_lines(section);
                }
                section.measures.extend(chords.iter().map(|c| Measure::from_token(c)));
            }
            Action::AddLyrics {
                line_number,
                group_width,
                segments,
            } => {
                let section = self.section_mut(line_no)?;
                let end = section.measures.len();
                let group_start = end.saturating_sub(group_width);
                let frags = section.lyric_lines.entry(line_number).or_default();
                pad_to(frags, group_start);
                frags.extend(segments.iter().map(|s| s.to_string()));
                pad_to(frags, end);
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Document {
        self.close_section();
        if self.doc.title.is_none() {
            warn!("chart has no title");
        }
        self.doc
    }

    fn open_section(&mut self, header: SectionHeader) {
        self.close_section();
        let number = self.doc.sections.len() + 1;
        if header.name.is_empty() {
            warn!("section {number} has no name");
        }
        debug!(
            "section {number} [{}]: width={} lyrics={} pickup={}",
            header.name, header.column_count, header.lyric_line_count, header.pickup
        );

        let mut section = Section::new(header.name, header.column_count);
        section.lyric_line_count = header.lyric_line_count;
        section.pickup = header.pickup;
        self.current = Some(section);
    }

    fn close_section(&mut self) {
        if let Some(mut section) = self.current.take() {
            pad_lyric_lines(&mut section);
            self.doc.sections.push(section);
        }
    }

    fn section_mut(&mut self, line_no: usize) -> Result<&mut Section, ParseError> {
        self.current.as_mut().ok_or(ParseError::UnexpectedLine {
            line: line_no,
            text: String::new(),
        })
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bring every lyric line up to the section's measure count.
fn pad_lyric_lines(section: &mut Section) {
    let len = section.measures.len();
    for line in 1..=section.lyric_line_total() {
        pad_to(section.lyric_lines.entry(line).or_default(), len);
    }
}

fn pad_to(frags: &mut Vec<String>, len: usize) {
    if frags.len() < len {
        frags.resize(len, String::new());
    }
}
