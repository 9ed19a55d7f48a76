//! boxchart: chord-chart parser, transposer and page renderer.
//!
//! Reads the line-oriented chart format (title, metadata, sections of
//! `|`-separated measures with lyric lines underneath), transposes chords
//! between keys by scale degree, and lays the measures out into grids on
//! US-Letter pages rendered as SVG.
//!
//! # Example
//! ```no_run
//! use boxchart::{parse_file, write_chart};
//!
//! let doc = parse_file("path/to/song.txt").unwrap();
//! println!("Title: {:?}", doc.title);
//! println!("Sections: {}", doc.sections.len());
//! println!("Measures: {}", doc.measure_count());
//! let out = write_chart(&doc, "svg").unwrap();
//! println!("Wrote {}", out.display());
//! ```

pub mod config;
pub mod error;
pub mod keys;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod transpose;

use std::path::{Path, PathBuf};

pub use config::LayoutConfig;
pub use error::{ChartError, LayoutError, ParseError, Result, TransposeError};
pub use keys::Key;
pub use metrics::{StandardMetrics, TextMetrics};
pub use model::*;
pub use parser::parse_chart;
pub use transpose::Transposer;

/// Directory the binary writes rendered charts into.
pub const OUTPUT_DIR: &str = "svg";

/// File stem used when a chart has no title.
pub const UNTITLED: &str = "untitled";

/// Parse chart text held in memory.
pub fn parse_str(text: &str) -> Result<Document> {
    Ok(parse_chart(text)?)
}

/// Parse a chart from a file path.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_str(&text)
}

/// Convert a parsed document to a JSON string.
pub fn document_to_json(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Render a document with the sizes implied by its own scale factor.
pub fn render_document_to_svg(doc: &Document) -> Result<String> {
    let config = LayoutConfig::for_document(doc);
    Ok(renderer::render_document(doc, &config, &StandardMetrics)?)
}

/// Parse a chart file and render it directly to SVG.
pub fn render_file_to_svg<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render_document_to_svg(&doc)
}

/// Where `write_chart` puts a document: `<dir>/<title>.svg`.
///
/// Path separators in the title are replaced so the file always lands
/// directly inside `dir`.
pub fn output_path_for<P: AsRef<Path>>(doc: &Document, dir: P) -> PathBuf {
    let stem = match doc.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.replace(['/', '\\'], "_"),
        _ => UNTITLED.to_string(),
    };
    dir.as_ref().join(format!("{stem}.svg"))
}

/// Render `doc` and write it under `dir`, creating the directory if needed.
/// Returns the path written.
pub fn write_chart<P: AsRef<Path>>(doc: &Document, dir: P) -> Result<PathBuf> {
    let svg = render_document_to_svg(doc)?;
    std::fs::create_dir_all(dir.as_ref())?;
    let path = output_path_for(doc, dir);
    std::fs::write(&path, svg)?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_uses_title() {
        let mut doc = Document::new();
        assert_eq!(output_path_for(&doc, "svg"), Path::new("svg/untitled.svg"));
        doc.title = Some("Amazing Grace".into());
        assert_eq!(output_path_for(&doc, "svg"), Path::new("svg/Amazing Grace.svg"));
        doc.title = Some("AC/DC".into());
        assert_eq!(output_path_for(&doc, "out"), Path::new("out/AC_DC.svg"));
    }

    #[test]
    fn parse_errors_surface_as_chart_errors() {
        let err = parse_str("+Verse~width=x\n").unwrap_err();
        assert!(matches!(err, ChartError::Parse(ParseError::BadSectionValue { line: 1, .. })));
    }

    #[test]
    fn json_contains_sections() {
        let doc = parse_str("^Song\n+Verse\nC|G\n").unwrap();
        let json = document_to_json(&doc).unwrap();
        assert!(json.contains("\"title\": \"Song\""));
        assert!(json.contains("\"name\": \"Verse\""));
    }
}
