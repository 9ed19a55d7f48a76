//! Chart renderer: converts laid-out sections into paginated SVG output.
//!
//! The document is flattened into a list of flowables (paragraphs, spacers
//! and row grids), the flowables are distributed over US-Letter pages, and
//! the pages are stacked vertically in one self-contained SVG.

mod constants;
mod grid;
mod svg_builder;

use crate::config::{LayoutConfig, TEXT_COLOR};
use crate::error::LayoutError;
use crate::layout::{layout_document, Align, RowLayout, SectionLayout, TextStyle};
use crate::metrics::TextMetrics;
use crate::model::Document;
use constants::*;
use grid::render_row;
use svg_builder::SvgBuilder;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Lay out and render a parsed Document into a complete SVG string.
pub fn render_document(
    doc: &Document,
    config: &LayoutConfig,
    metrics: &dyn TextMetrics,
) -> Result<String, LayoutError> {
    let sections = layout_document(doc, config, metrics)?;
    let flow = build_flow(doc, &sections, config);
    let pages = paginate(&flow, config);
    Ok(draw_pages(&pages, config))
}

// ═══════════════════════════════════════════════════════════════════════
// Flowables
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
enum Flowable<'a> {
    Paragraph { text: &'a str, style: TextStyle },
    Spacer(f64),
    Row(&'a RowLayout),
}

impl Flowable<'_> {
    fn height(&self) -> f64 {
        match self {
            Flowable::Paragraph { style, .. } => style.size * PARAGRAPH_LEADING,
            Flowable::Spacer(h) => *h,
            Flowable::Row(row) => row.height,
        }
    }
}

fn build_flow<'a>(doc: &'a Document, sections: &'a [SectionLayout], config: &LayoutConfig) -> Vec<Flowable<'a>> {
    let mut flow = Vec::new();

    if let Some(ref title) = doc.title {
        flow.push(Flowable::Paragraph {
            text: title,
            style: TextStyle {
                font: config.title_font,
                size: config.title_font_size,
                align: Align::Center,
            },
        });
    }

    if !doc.metadata_lines.is_empty() {
        flow.push(Flowable::Spacer(config.title_spacer()));
        for line in &doc.metadata_lines {
            flow.push(Flowable::Paragraph {
                text: line,
                style: TextStyle {
                    font: config.mdata_font,
                    size: config.mdata_font_size,
                    align: Align::Center,
                },
            });
            flow.push(Flowable::Spacer(config.mdata_spacer()));
        }
    }

    for section in sections {
        flow.push(Flowable::Spacer(config.table_spacer));
        if !section.name.is_empty() {
            flow.push(Flowable::Paragraph {
                text: &section.name,
                style: TextStyle {
                    font: config.section_font,
                    size: config.section_font_size,
                    align: Align::Left,
                },
            });
            flow.push(Flowable::Spacer(config.section_title_spacer()));
        }
        for row in &section.rows {
            flow.push(Flowable::Row(row));
            flow.push(Flowable::Spacer(config.post_row_spacer()));
        }
    }

    flow
}

// ═══════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════

struct Placed<'f, 'a> {
    y: f64,
    item: &'f Flowable<'a>,
}

/// Place flowables top to bottom; one that does not fit starts a new page.
/// Spacers are dropped at the top of a page.
fn paginate<'f, 'a>(flow: &'f [Flowable<'a>], config: &LayoutConfig) -> Vec<Vec<Placed<'f, 'a>>> {
    let top = config.top_margin;
    let bottom = top + config.content_height();

    let mut pages = Vec::new();
    let mut current: Vec<Placed<'f, 'a>> = Vec::new();
    let mut y = top;

    for item in flow {
        let h = item.height();
        if y + h > bottom && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            y = top;
        }
        if current.is_empty() && matches!(item, Flowable::Spacer(_)) && !pages.is_empty() {
            continue;
        }
        current.push(Placed { y, item });
        y += h;
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

// ═══════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════

fn draw_pages(pages: &[Vec<Placed<'_, '_>>], config: &LayoutConfig) -> String {
    let page_count = pages.len() as f64;
    let total_height = page_count * config.page_height + (page_count - 1.0).max(0.0) * PAGE_GAP;

    let mut svg = SvgBuilder::new(config.page_width, total_height);
    svg.rect(0.0, 0.0, config.page_width, total_height, CANVAS_BACKGROUND, "none", 0.0);

    for (i, page) in pages.iter().enumerate() {
        let offset = i as f64 * (config.page_height + PAGE_GAP);
        svg.begin_group("page", offset);
        svg.rect(
            0.0,
            0.0,
            config.page_width,
            config.page_height,
            PAGE_BACKGROUND,
            PAGE_EDGE_COLOR,
            PAGE_EDGE_WIDTH,
        );

        for placed in page {
            match placed.item {
                Flowable::Paragraph { text, style } => {
                    let x = match style.align {
                        Align::Center => config.page_width / 2.0,
                        Align::Left => config.left_margin,
                    };
                    svg.text(x, placed.y + style.size * BASELINE_RATIO, text, *style, TEXT_COLOR);
                }
                Flowable::Spacer(_) => {}
                Flowable::Row(row) => render_row(&mut svg, row, config, config.left_margin, placed.y),
            }
        }

        svg.end_group();
    }

    svg.build()
}
