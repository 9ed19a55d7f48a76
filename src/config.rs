//! Layout configuration: every size the layout engine and renderer use,
//! derived once from the document's scale factor.

use crate::metrics::Font;
use crate::model::Document;

// ── Page & margins (points, unscaled) ───────────────────────────────
pub const LETTER_WIDTH: f64 = 612.0;
pub const LETTER_HEIGHT: f64 = 792.0;
pub const TOP_MARGIN: f64 = 18.0; // 0.25 in
pub const LEFT_MARGIN: f64 = 54.0; // 0.75 in

// ── Cell margins (unscaled) ─────────────────────────────────────────
pub const CELL_MARGIN_H: f64 = 6.0;

// ── Nominal sizes, multiplied by the scale factor ───────────────────
const TITLE_FONT_SIZE: f64 = 24.0;
const MDATA_FONT_SIZE: f64 = 12.0;
const CHORD_FONT_SIZE: f64 = 16.0;
const LYRIC_FONT_SIZE: f64 = 11.0;
const SECTION_FONT_SIZE: f64 = 14.0;
const CHORD_TABLE_BORDER_WIDTH: f64 = 1.0;
const TABLE_SPACER_SIZE: f64 = 20.0;
const FIT_STEP: f64 = 0.5;

// ── Colors ──────────────────────────────────────────────────────────
pub const CHORD_BORDER_COLOR: &str = "#000000";
pub const LYRIC_BACK_COLOR: &str = "#bfbfbf";
pub const TEXT_COLOR: &str = "#000000";

/// Immutable sizing for one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub scale: f64,

    pub page_width: f64,
    pub page_height: f64,
    pub top_margin: f64,
    pub left_margin: f64,

    pub title_font_size: f64,
    pub mdata_font_size: f64,
    pub chord_font_size: f64,
    pub lyric_font_size: f64,
    pub section_font_size: f64,

    pub chord_border_width: f64,
    pub lyric_row_height: f64,
    pub chord_row_height: f64,
    pub chord_right_padding: f64,
    pub table_spacer: f64,

    /// Padding inside each simultaneous-chord sub-cell
    pub minichord_left_padding: f64,
    pub minichord_right_padding: f64,
    pub minichord_top_padding: f64,
    pub minichord_bottom_padding: f64,

    /// Font size decrement used while shrinking text to fit
    pub fit_step: f64,

    pub title_font: Font,
    pub mdata_font: Font,
    pub section_font: Font,
    pub chord_font: Font,
    pub lyric_font: Font,
}

impl LayoutConfig {
    pub fn with_scale(scale: f64) -> Self {
        let s = |n: f64| n * scale;
        let chord_font_size = s(CHORD_FONT_SIZE);
        let lyric_font_size = s(LYRIC_FONT_SIZE);

        Self {
            scale,
            page_width: LETTER_WIDTH,
            page_height: LETTER_HEIGHT,
            top_margin: TOP_MARGIN,
            left_margin: LEFT_MARGIN,
            title_font_size: s(TITLE_FONT_SIZE),
            mdata_font_size: s(MDATA_FONT_SIZE),
            chord_font_size,
            lyric_font_size,
            section_font_size: s(SECTION_FONT_SIZE),
            chord_border_width: s(CHORD_TABLE_BORDER_WIDTH),
            lyric_row_height: lyric_font_size * 1.2,
            chord_row_height: chord_font_size * 2.0,
            chord_right_padding: chord_font_size / 1.6,
            table_spacer: s(TABLE_SPACER_SIZE),
            minichord_left_padding: s(0.0),
            minichord_right_padding: s(0.0),
            minichord_top_padding: s(0.0),
            minichord_bottom_padding: chord_font_size / 1.6,
            fit_step: s(FIT_STEP),
            title_font: Font::HelveticaBold,
            mdata_font: Font::Helvetica,
            section_font: Font::HelveticaBold,
            chord_font: Font::HelveticaBold,
            lyric_font: Font::Helvetica,
        }
    }

    pub fn for_document(doc: &Document) -> Self {
        Self::with_scale(doc.scale)
    }

    /// Width available to a row of measures.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.left_margin
    }

    /// Height available for content on one page.
    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.top_margin
    }

    pub fn column_width(&self, column_count: usize) -> f64 {
        self.content_width() / column_count.max(1) as f64
    }

    /// Space after the title; scaled twice, as the title font already is.
    pub fn title_spacer(&self) -> f64 {
        0.8 * self.title_font_size * self.scale
    }

    pub fn mdata_spacer(&self) -> f64 {
        self.mdata_font_size * self.scale
    }

    pub fn section_title_spacer(&self) -> f64 {
        self.mdata_font_size / 2.0
    }

    pub fn post_row_spacer(&self) -> f64 {
        self.lyric_font_size
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::with_scale(1.0)
    }
}
