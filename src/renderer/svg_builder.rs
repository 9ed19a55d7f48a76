//! SVG builder: accumulates SVG elements and produces the final string.

use crate::layout::{Align, TextStyle};

pub(super) struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
    depth: usize,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            depth: 0,
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Open a group translated down by `dy`; must be paired with `end_group`.
    pub(super) fn begin_group(&mut self, class: &str, dy: f64) {
        self.depth += 1;
        self.elements.push(format!(
            r#"<g class="{}" transform="translate(0,{:.1})">"#,
            class, dy
        ));
    }

    pub(super) fn end_group(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
            self.elements.push("</g>".to_string());
        }
    }

    pub(super) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="square"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str, stroke_width: f64) {
        if stroke_width > 0.0 {
            self.elements.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
                x, y, w, h, fill, stroke, stroke_width
            ));
        } else {
            self.elements.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                x, y, w, h, fill
            ));
        }
    }

    /// Text anchored at `x` according to the style's alignment, baseline at `y`.
    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle, fill: &str) {
        if content.is_empty() {
            return;
        }
        let anchor = match style.align {
            Align::Left => "start",
            Align::Center => "middle",
        };
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="{}" xml:space="preserve">{}</text>"#,
            x,
            y,
            style.font.family(),
            style.size,
            style.font.weight(),
            fill,
            anchor,
            escape(content)
        ));
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
