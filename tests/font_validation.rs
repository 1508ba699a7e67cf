mod common;

use markpress::{RenderSettings, render_markdown_with};

fn fallback_settings() -> RenderSettings {
    RenderSettings {
        font_family: "NoSuchFamilyZZZ".to_string(),
        ..RenderSettings::default()
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

#[test]
fn fallback_uses_core_helvetica_variants() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");

    // Regular for body, bold for headings and table headers, oblique for
    // the emphasised words and the running header.
    assert!(contains(&pdf, b"/Helvetica-Bold"));
    assert!(contains(&pdf, b"/Helvetica-Oblique"));
    assert!(contains(&pdf, b"/Helvetica"));
    assert!(contains(&pdf, b"/WinAnsiEncoding"));
}

#[test]
fn font_resources_are_registered_per_variant() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");

    // At least regular, bold, and italic variants in the resource dict.
    assert!(contains(&pdf, b"/F1"));
    assert!(contains(&pdf, b"/F2"));
    assert!(contains(&pdf, b"/F3"));
}

#[test]
fn untitled_document_needs_no_bold_variant() {
    // A leading `---` leaves the title block empty. With no title line
    // (always bold) the only variants are the regular body and the
    // italic footer.
    let pdf = render_markdown_with("---\nplain body text\n", &fallback_settings()).expect("render");

    assert!(contains(&pdf, b"/F1"));
    assert!(contains(&pdf, b"/F2"));
    assert!(!contains(&pdf, b"/F3"));
    assert!(!contains(&pdf, b"/Helvetica-Bold"));
}
