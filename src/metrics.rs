//! Text measurement.
//!
//! Layout only needs two questions answered: how wide is a string at a
//! given font and size, and how many lines does it take when wrapped to a
//! width. `StandardMetrics` answers them from the Helvetica AFM tables.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// The two faces charts are set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// CSS font-family value.
    pub fn family(self) -> &'static str {
        "Helvetica, Arial, sans-serif"
    }

    /// CSS font-weight value.
    pub fn weight(self) -> &'static str {
        match self {
            Font::Helvetica => "normal",
            Font::HelveticaBold => "bold",
        }
    }
}

/// String-width primitive supplied to the layout engine.
pub trait TextMetrics {
    /// Advance width of `text` in points.
    fn string_width(&self, text: &str, font: Font, size: f64) -> f64;
}

/// Advance widths from the standard Helvetica / Helvetica-Bold metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

// Printable ASCII 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // 'p'..'~'
];

const FALLBACK_WIDTH: u16 = 556;

fn char_units(c: char, font: Font) -> u32 {
    let table = match font {
        Font::Helvetica => &HELVETICA_WIDTHS,
        Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
    };
    match c as u32 {
        code @ 0x20..=0x7E => table[(code - 0x20) as usize] as u32,
        _ => c.width().unwrap_or(0) as u32 * FALLBACK_WIDTH as u32,
    }
}

impl TextMetrics for StandardMetrics {
    fn string_width(&self, text: &str, font: Font, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| char_units(c, font)).sum();
        units as f64 * size / 1000.0
    }
}

/// Number of lines `text` occupies when greedily wrapped on whitespace to
/// `max_width`. A word wider than the line sits on a line of its own.
/// Empty text takes no lines.
pub fn line_count(text: &str, font: Font, size: f64, max_width: f64, metrics: &dyn TextMetrics) -> usize {
    let space = metrics.string_width(" ", font, size);
    let mut lines = 0;
    let mut current = 0.0;

    for word in text.split_whitespace() {
        let w = metrics.string_width(word, font, size);
        if lines == 0 {
            lines = 1;
            current = w;
        } else if current + space + w <= max_width {
            current += space + w;
        } else {
            lines += 1;
            current = w;
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_widths() {
        let m = StandardMetrics;
        // "Cmaj7" in Helvetica-Bold: 722 + 889 + 556 + 278 + 556
        assert!((m.string_width("Cmaj7", Font::HelveticaBold, 10.0) - 30.01).abs() < 1e-9);
        assert_eq!(m.string_width("", Font::Helvetica, 12.0), 0.0);
        assert!(m.string_width("W", Font::Helvetica, 10.0) > m.string_width("i", Font::Helvetica, 10.0));
    }

    #[test]
    fn width_scales_with_size() {
        let m = StandardMetrics;
        let a = m.string_width("hello", Font::Helvetica, 10.0);
        let b = m.string_width("hello", Font::Helvetica, 20.0);
        assert!((b - 2.0 * a).abs() < 1e-9);
    }

    #[test]
    fn non_ascii_uses_fallback() {
        let m = StandardMetrics;
        assert!((m.string_width("é", Font::Helvetica, 1.0) - 0.556).abs() < 1e-9);
        assert!((m.string_width("童", Font::Helvetica, 1.0) - 1.112).abs() < 1e-9);
    }

    #[test]
    fn wrapping_counts_lines() {
        let m = StandardMetrics;
        assert_eq!(line_count("", Font::Helvetica, 10.0, 100.0, &m), 0);
        assert_eq!(line_count("one two", Font::Helvetica, 10.0, 1000.0, &m), 1);
        assert_eq!(line_count("one two", Font::Helvetica, 10.0, 20.0, &m), 2);
        assert_eq!(line_count("unbreakable", Font::Helvetica, 10.0, 5.0, &m), 1);
    }
}
