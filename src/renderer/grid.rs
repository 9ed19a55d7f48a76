//! Chord/lyric grid drawing for one laid-out row.

use crate::config::{LayoutConfig, CELL_MARGIN_H, CHORD_BORDER_COLOR, LYRIC_BACK_COLOR, TEXT_COLOR};
use crate::layout::RowLayout;
use super::constants::*;
use super::svg_builder::SvgBuilder;

/// Draw `row` with its top-left corner at `(x0, y0)`.
pub(super) fn render_row(svg: &mut SvgBuilder, row: &RowLayout, config: &LayoutConfig, x0: f64, y0: f64) {
    let cols = row.row.column_count;
    let col_w = row.column_width;
    let total_w = col_w * cols as f64;
    let chord_h = config.chord_row_height;
    let lyric_h = config.lyric_row_height;

    // ── Lyric shading, every other lyric row ──
    for line in 1..=row.lyric_rows.len() {
        if line % 2 == 0 {
            let y = y0 + chord_h + (line - 1) as f64 * lyric_h;
            svg.rect(x0, y, total_w, lyric_h, LYRIC_BACK_COLOR, "none", 0.0);
        }
    }

    // ── Chord row grid ──
    for col in 0..cols {
        let x = x0 + col as f64 * col_w;
        svg.rect(x, y0, col_w, chord_h, "none", CHORD_BORDER_COLOR, config.chord_border_width);
    }

    // ── Chords, one sub-cell per simultaneous chord ──
    let chord_mid_y = y0 + (chord_h - config.minichord_bottom_padding + config.minichord_top_padding) / 2.0;
    for (col, cell) in row.chord_cells.iter().enumerate() {
        let cell_x = x0 + col as f64 * col_w;
        let inner_w = cell.sub_width * cell.chords.len() as f64;
        let start_x = cell_x + (col_w - config.chord_right_padding - inner_w) / 2.0;

        for (k, chord) in cell.chords.iter().enumerate() {
            let cx = start_x + cell.sub_width * (k as f64 + 0.5);
            let baseline = chord_mid_y + chord.style.size * CAP_CENTER_RATIO;
            svg.text(cx, baseline, &chord.text, chord.style, TEXT_COLOR);
        }
    }

    // ── Lyrics ──
    for (l, line) in row.lyric_rows.iter().enumerate() {
        let row_y = y0 + chord_h + l as f64 * lyric_h;
        for (col, frag) in line.iter().enumerate() {
            let x = x0 + col as f64 * col_w + CELL_MARGIN_H;
            let baseline = row_y + lyric_h / 2.0 + frag.style.size * CAP_CENTER_RATIO;
            svg.text(x, baseline, &frag.text, frag.style, TEXT_COLOR);
        }
    }

    // ── Repeat bars on the chord row ──
    let repeat_w = REPEAT_BORDER_FACTOR * config.chord_border_width;
    for &col in &row.row.repeat_start_columns {
        let x = x0 + col as f64 * col_w;
        svg.line(x, y0, x, y0 + chord_h, CHORD_BORDER_COLOR, repeat_w);
    }
    for &col in &row.row.repeat_end_columns {
        let x = x0 + (col + 1) as f64 * col_w;
        svg.line(x, y0, x, y0 + chord_h, CHORD_BORDER_COLOR, repeat_w);
    }
}
