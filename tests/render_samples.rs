//! Rendering tests: parse sample charts and render to SVG.

use boxchart::{
    parse_file, parse_str, render_document_to_svg, render_file_to_svg, write_chart, ChartError, LayoutError,
};
use boxchart::error::TextKind;
use std::path::PathBuf;

fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
}

fn texts<'a>(doc: &'a roxmltree::Document) -> Vec<&'a str> {
    doc.descendants()
        .filter(|n| n.has_tag_name("text"))
        .filter_map(|n| n.text())
        .collect()
}

fn count_tag(doc: &roxmltree::Document, tag: &str) -> usize {
    doc.descendants().filter(|n| n.has_tag_name(tag)).count()
}

fn page_count(doc: &roxmltree::Document) -> usize {
    doc.descendants()
        .filter(|n| n.has_tag_name("g") && n.attribute("class") == Some("page"))
        .count()
}

#[test]
fn render_amazing_grace_svg() {
    let svg = render_file_to_svg(samples_dir().join("amazing_grace.txt")).expect("Failed to render amazing_grace");
    let doc = roxmltree::Document::parse(&svg).expect("SVG should be well-formed XML");

    assert_eq!(doc.root_element().tag_name().name(), "svg");
    assert_eq!(page_count(&doc), 1);

    let texts = texts(&doc);
    assert!(texts.contains(&"Amazing Grace"), "SVG should contain title");
    assert!(texts.contains(&"John Newton"), "SVG should contain metadata");
    assert!(texts.contains(&"Verse"));
    assert!(texts.contains(&"Chorus"));
    assert!(texts.contains(&"sound that"));
    assert!(texts.contains(&"%"));

    // Two chords in the third measure are drawn separately
    assert_eq!(texts.iter().filter(|t| **t == "G").count(), 7);

    // One repeat opens and one closes in the verse
    assert_eq!(count_tag(&doc, "line"), 2);

    // Both verse rows show two lyric lines; the second is shaded
    let shaded = doc
        .descendants()
        .filter(|n| n.has_tag_name("rect") && n.attribute("fill") == Some("#bfbfbf"))
        .count();
    assert_eq!(shaded, 2);
}

#[test]
fn render_twelve_bar_svg() {
    let svg = render_file_to_svg(samples_dir().join("twelve_bar.txt")).expect("Failed to render twelve_bar");
    let doc = roxmltree::Document::parse(&svg).expect("SVG should be well-formed XML");

    let texts = texts(&doc);
    assert!(texts.contains(&"Twelve Bar in D"));
    assert!(texts.contains(&"D7"));
    assert!(texts.contains(&"A7"));
    assert!(!texts.contains(&"C7"), "Chords should be transposed");
    assert!(texts.contains(&"Outro"));
    assert_eq!(count_tag(&doc, "line"), 1);

    // Six chord cells per blues row, two in the outro
    let bordered = doc
        .descendants()
        .filter(|n| n.has_tag_name("rect") && n.attribute("stroke") == Some("#000000"))
        .count();
    assert_eq!(bordered, 6 + 6 + 2);
}

#[test]
fn long_chart_stacks_pages() {
    let mut text = String::from("^Long Song\n+Verse~width=4~lyrics=2\n");
    for _ in 0..50 {
        text.push_str("C|F|G|C\nla la|la|la|la\nlo|lo|lo|lo lo\n\n");
    }
    let chart = parse_str(&text).unwrap();
    let svg = render_document_to_svg(&chart).unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let pages = page_count(&doc);
    assert!(pages > 1, "Expected several pages, got {pages}");

    let expected_height = pages as f64 * 792.0 + (pages - 1) as f64 * 24.0;
    let height: f64 = doc.root_element().attribute("height").unwrap().parse().unwrap();
    assert_eq!(height, expected_height);
}

#[test]
fn chord_too_wide_is_a_layout_error() {
    let text = format!("+Solo~width=12\n{}\n", "W".repeat(400));
    let chart = parse_str(&text).unwrap();
    match render_document_to_svg(&chart) {
        Err(ChartError::Layout(LayoutError::TextTooWide { kind, text })) => {
            assert_eq!(kind, TextKind::Chord);
            assert_eq!(text.len(), 400);
        }
        other => panic!("expected a layout error, got {other:?}"),
    }
}

// ─── Output files ───────────────────────────────────────────────────

#[test]
fn write_chart_names_file_after_title() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("svg");

    let chart = parse_file(samples_dir().join("amazing_grace.txt")).unwrap();
    let path = write_chart(&chart, &out_dir).expect("Failed to write chart");

    assert_eq!(path, out_dir.join("Amazing Grace.svg"));
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(roxmltree::Document::parse(&svg).is_ok());
}

#[test]
fn write_chart_without_title_uses_untitled() {
    let dir = tempfile::tempdir().unwrap();
    let chart = parse_str("+A~width=2\nC|G\n").unwrap();
    let path = write_chart(&chart, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("untitled.svg"));
    assert!(path.exists());
}
