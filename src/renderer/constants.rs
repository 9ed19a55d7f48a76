//! Shared constants for the chart renderer (all in SVG user units = points).

// ── Page stacking ───────────────────────────────────────────────────
pub(super) const PAGE_GAP: f64 = 24.0; // vertical space between stacked pages
pub(super) const PAGE_BACKGROUND: &str = "white";
pub(super) const PAGE_EDGE_COLOR: &str = "#999999";
pub(super) const PAGE_EDGE_WIDTH: f64 = 0.5;
pub(super) const CANVAS_BACKGROUND: &str = "#e6e6e6";

// ── Text placement ──────────────────────────────────────────────────
pub(super) const PARAGRAPH_LEADING: f64 = 1.2; // line height as a multiple of font size
pub(super) const BASELINE_RATIO: f64 = 0.9; // baseline offset in a paragraph line, × font size
pub(super) const CAP_CENTER_RATIO: f64 = 0.35; // baseline below a cell's middle, × font size

// ── Repeat bars ─────────────────────────────────────────────────────
pub(super) const REPEAT_BORDER_FACTOR: f64 = 3.0; // × chord table border width
