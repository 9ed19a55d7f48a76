//! Layout computation: packs a section's measures into fixed-width rows,
//! decides how many lyric lines each row shows, and fits every chord and
//! lyric to its cell.
//!
//! `pack_rows` is pure geometry over the model. `layout_section` adds the
//! sizes from a `LayoutConfig` and shrinks text with a `TextMetrics`.

use std::collections::BTreeSet;
use std::ops::Range;

use log::debug;
use serde::Serialize;

use crate::config::{LayoutConfig, CELL_MARGIN_H};
use crate::error::{LayoutError, TextKind};
use crate::metrics::{line_count, Font, TextMetrics};
use crate::model::{Document, Section};

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

/// One row of a section's grid, before any sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescriptor {
    /// Measures drawn in this row
    pub measure_indices: Range<usize>,
    /// Columns in this row; smaller than the section's for a short last row
    pub column_count: usize,
    /// Lyric lines drawn under the chords
    pub visible_lyric_lines: usize,
    /// Row-relative columns that open a repeat
    pub repeat_start_columns: BTreeSet<usize>,
    /// Row-relative columns that close a repeat
    pub repeat_end_columns: BTreeSet<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
}

/// Style descriptor for one run of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub style: TextStyle,
}

/// Header cell of one measure: one sub-cell per simultaneous chord.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordCell {
    pub chords: Vec<FittedText>,
    pub sub_width: f64,
}

/// A row with its geometry resolved and all text fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub row: RowDescriptor,
    pub column_width: f64,
    pub chord_cells: Vec<ChordCell>,
    /// `lyric_rows[line - 1][column]` for lines `1..=visible_lyric_lines`
    pub lyric_rows: Vec<Vec<FittedText>>,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub name: String,
    pub rows: Vec<RowLayout>,
}

// ═══════════════════════════════════════════════════════════════════════
// Row packing
// ═══════════════════════════════════════════════════════════════════════

/// Columns in the row starting at measure `start`.
///
/// The last row is short when the measure count does not divide evenly and
/// fewer than a full row of measures remain.
pub fn row_column_count(total: usize, start: usize, column_count: usize) -> usize {
    let column_count = column_count.max(1);
    let hanging = total % column_count;
    if hanging != 0 && total.saturating_sub(start) < column_count {
        hanging
    } else {
        column_count
    }
}

/// Highest lyric line with any text in `range`, or 0 when the range has no lyrics.
pub fn visible_lyric_lines(section: &Section, range: Range<usize>) -> usize {
    (1..=section.lyric_line_total())
        .rev()
        .find(|&line| range.clone().any(|i| !section.lyric(line, i).is_empty()))
        .unwrap_or(0)
}

/// Group a section's measures into rows.
pub fn pack_rows(section: &Section) -> Vec<RowDescriptor> {
    let total = section.measures.len();
    let cols = section.column_count.max(1);
    let mut rows = Vec::new();
    let mut start = 0;

    while start < total {
        let column_count = row_column_count(total, start, cols);
        let end = (start + column_count).min(total);

        let mut repeat_start_columns = BTreeSet::new();
        let mut repeat_end_columns = BTreeSet::new();
        for (col, measure) in section.measures[start..end].iter().enumerate() {
            if measure.repeat_start {
                repeat_start_columns.insert(col);
            }
            if measure.repeat_end {
                repeat_end_columns.insert(col);
            }
        }

        rows.push(RowDescriptor {
            measure_indices: start..end,
            column_count,
            visible_lyric_lines: visible_lyric_lines(section, start..end),
            repeat_start_columns,
            repeat_end_columns,
        });
        start = end;
    }

    rows
}

// ═══════════════════════════════════════════════════════════════════════
// Text fitting
// ═══════════════════════════════════════════════════════════════════════

/// Shrink `nominal` in `step` decrements until `text` sits on one line no
/// wider than `max_width`.
///
/// Fails once the size drops to (about) zero; chords and single lyric
/// words are never wrapped.
pub fn fit_text(
    text: &str,
    kind: TextKind,
    nominal: TextStyle,
    max_width: f64,
    step: f64,
    metrics: &dyn TextMetrics,
) -> Result<TextStyle, LayoutError> {
    let floor = step / 2.0;
    let mut size = nominal.size;

    while size > 0.0 && size >= floor {
        let width = metrics.string_width(text, nominal.font, size);
        let lines = line_count(text, nominal.font, size, max_width, metrics);
        if lines <= 1 && width <= max_width {
            if size < nominal.size {
                debug!("{kind} [{text}] shrunk from {:.1} to {size:.1}", nominal.size);
            }
            return Ok(TextStyle { size, ..nominal });
        }
        if step <= 0.0 {
            break;
        }
        size -= step;
    }

    Err(LayoutError::TextTooWide {
        kind,
        text: text.to_string(),
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Section layout
// ═══════════════════════════════════════════════════════════════════════

pub fn layout_document(
    doc: &Document,
    config: &LayoutConfig,
    metrics: &dyn TextMetrics,
) -> Result<Vec<SectionLayout>, LayoutError> {
    doc.sections
        .iter()
        .map(|section| layout_section(section, config, metrics))
        .collect()
}

pub fn layout_section(
    section: &Section,
    config: &LayoutConfig,
    metrics: &dyn TextMetrics,
) -> Result<SectionLayout, LayoutError> {
    let rows = pack_rows(section)
        .into_iter()
        .map(|row| layout_row(section, row, config, metrics))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SectionLayout {
        name: section.name.clone(),
        rows,
    })
}

fn layout_row(
    section: &Section,
    row: RowDescriptor,
    config: &LayoutConfig,
    metrics: &dyn TextMetrics,
) -> Result<RowLayout, LayoutError> {
    // A short row spreads the full width over its own column count.
    let column_width = config.column_width(row.column_count);

    let chord_style = TextStyle {
        font: config.chord_font,
        size: config.chord_font_size,
        align: Align::Center,
    };
    let lyric_style = TextStyle {
        font: config.lyric_font,
        size: config.lyric_font_size,
        align: Align::Left,
    };

    let mut chord_cells = Vec::with_capacity(row.column_count);
    for measure in &section.measures[row.measure_indices.clone()] {
        let n = measure.chord_tokens.len().max(1);
        let sub_width = (column_width - config.chord_right_padding) / n as f64;
        let avail = sub_width - config.minichord_left_padding - config.minichord_right_padding;

        let chords = measure
            .chord_tokens
            .iter()
            .map(|chord| {
                let style = fit_text(chord, TextKind::Chord, chord_style, avail, config.fit_step, metrics)?;
                Ok(FittedText {
                    text: chord.clone(),
                    style,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        chord_cells.push(ChordCell { chords, sub_width });
    }

    let lyric_width = column_width - 2.0 * CELL_MARGIN_H;
    let mut lyric_rows = Vec::with_capacity(row.visible_lyric_lines);
    for line in 1..=row.visible_lyric_lines {
        let cells = row
            .measure_indices
            .clone()
            .map(|i| {
                let text = section.lyric(line, i);
                let style = fit_text(text, TextKind::Lyric, lyric_style, lyric_width, config.fit_step, metrics)?;
                Ok(FittedText {
                    text: text.to_string(),
                    style,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        lyric_rows.push(cells);
    }

    let height = config.chord_row_height + row.visible_lyric_lines as f64 * config.lyric_row_height;

    Ok(RowLayout {
        row,
        column_width,
        chord_cells,
        lyric_rows,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::StandardMetrics;
    use crate::model::Measure;
    use crate::parser::parse_chart;
    use pretty_assertions::assert_eq;

    fn section_with(count: usize, cols: usize) -> Section {
        let mut s = Section::new("Verse", cols);
        s.measures = (0..count).map(|_| Measure::from_token("C")).collect();
        s
    }

    #[test]
    fn partial_last_row() {
        let rows = pack_rows(&section_with(10, 4));
        let counts: Vec<_> = rows.iter().map(|r| r.column_count).collect();
        assert_eq!(counts, vec![4, 4, 2]);
        assert_eq!(rows[2].measure_indices, 8..10);
    }

    #[test]
    fn exact_multiple_has_no_short_row() {
        let rows = pack_rows(&section_with(8, 4));
        let counts: Vec<_> = rows.iter().map(|r| r.column_count).collect();
        assert_eq!(counts, vec![4, 4]);
    }

    #[test]
    fn row_column_count_degenerate_input() {
        assert_eq!(row_column_count(5, 0, 0), 1);
        assert_eq!(row_column_count(10, 12, 4), 2);
        assert_eq!(row_column_count(8, 12, 4), 4);
    }

    #[test]
    fn fewer_measures_than_columns() {
        let rows = pack_rows(&section_with(3, 4));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column_count, 3);
        assert!(pack_rows(&section_with(0, 4)).is_empty());
    }

    #[test]
    fn short_row_width_uses_its_own_column_count() {
        let config = LayoutConfig::default();
        let layout = layout_section(&section_with(10, 4), &config, &StandardMetrics).unwrap();
        assert_eq!(layout.rows[0].column_width, config.content_width() / 4.0);
        assert_eq!(layout.rows[2].column_width, config.content_width() / 2.0);
    }

    #[test]
    fn lyric_visibility_is_trimmed_per_row() {
        let text = "\
+Verse~width=2~lyrics=3
C|G
one|two

F|C


Am|G
|
|
|end
";
        let doc = parse_chart(text).unwrap();
        let rows = pack_rows(&doc.sections[0]);
        let visible: Vec<_> = rows.iter().map(|r| r.visible_lyric_lines).collect();
        assert_eq!(visible, vec![1, 0, 3]);
    }

    #[test]
    fn repeat_columns_are_row_relative() {
        let doc = parse_chart("+~width=3\n:C|F|G:|:Am|F|G:\n").unwrap();
        let rows = pack_rows(&doc.sections[0]);
        assert_eq!(rows[0].repeat_start_columns, BTreeSet::from([0]));
        assert_eq!(rows[0].repeat_end_columns, BTreeSet::from([2]));
        assert_eq!(rows[1].repeat_start_columns, BTreeSet::from([0]));
        assert_eq!(rows[1].repeat_end_columns, BTreeSet::from([2]));
    }

    #[test]
    fn end_to_end_single_row() {
        let doc = parse_chart("+~width=2\nC|G\nhello|world\n").unwrap();
        let rows = pack_rows(&doc.sections[0]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column_count, 2);
        assert_eq!(rows[0].visible_lyric_lines, 1);

        let config = LayoutConfig::default();
        let layout = layout_section(&doc.sections[0], &config, &StandardMetrics).unwrap();
        let row = &layout.rows[0];
        assert_eq!(row.lyric_rows.len(), 1);
        assert_eq!(row.lyric_rows[0][1].text, "world");
        assert_eq!(row.height, config.chord_row_height + config.lyric_row_height);
    }

    #[test]
    fn multi_chord_cells_split_the_width() {
        let doc = parse_chart("+~width=2\nC G|F\n").unwrap();
        let config = LayoutConfig::default();
        let layout = layout_section(&doc.sections[0], &config, &StandardMetrics).unwrap();
        let cells = &layout.rows[0].chord_cells;
        assert_eq!(cells[0].chords.len(), 2);
        assert!((cells[0].sub_width * 2.0 - cells[1].sub_width).abs() < 1e-9);
    }

    #[test]
    fn fitting_keeps_nominal_size_when_text_fits() {
        let nominal = TextStyle { font: Font::HelveticaBold, size: 16.0, align: Align::Center };
        let style = fit_text("C", TextKind::Chord, nominal, 100.0, 0.5, &StandardMetrics).unwrap();
        assert_eq!(style, nominal);

        let style = fit_text("", TextKind::Lyric, nominal, 10.0, 0.5, &StandardMetrics).unwrap();
        assert_eq!(style.size, 16.0);
    }

    #[test]
    fn fitting_shrinks_wide_text() {
        let nominal = TextStyle { font: Font::Helvetica, size: 11.0, align: Align::Left };
        let text = "something from the";
        let style = fit_text(text, TextKind::Lyric, nominal, 60.0, 0.5, &StandardMetrics).unwrap();
        assert!(style.size < 11.0);
        assert!(StandardMetrics.string_width(text, Font::Helvetica, style.size) <= 60.0);
        assert!(StandardMetrics.string_width(text, Font::Helvetica, style.size + 0.5) > 60.0);
    }

    #[test]
    fn fitting_fails_when_nothing_fits() {
        let nominal = TextStyle { font: Font::HelveticaBold, size: 16.0, align: Align::Center };
        let err = fit_text("Cmaj7", TextKind::Chord, nominal, 0.0, 0.5, &StandardMetrics).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TextTooWide { kind: TextKind::Chord, text: "Cmaj7".into() }
        );
    }

    #[test]
    fn overcrowded_row_is_a_layout_error() {
        let chords = vec!["C"; 200].join(" ");
        let doc = parse_chart(&format!("+~width=8\n{chords}\n")).unwrap();
        let err = layout_section(&doc.sections[0], &LayoutConfig::default(), &StandardMetrics).unwrap_err();
        assert!(matches!(err, LayoutError::TextTooWide { kind: TextKind::Chord, .. }));
    }
}
