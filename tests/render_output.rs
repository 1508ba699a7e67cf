mod common;

use markpress::{RenderSettings, render_markdown, render_markdown_with};

fn fallback_settings() -> RenderSettings {
    // A family no system provides, so output uses the builtin core fonts
    // and content streams stay WinAnsi-readable.
    RenderSettings {
        font_family: "NoSuchFamilyZZZ".to_string(),
        ..RenderSettings::default()
    }
}

#[test]
fn fixture_renders_to_valid_pdf() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");

    assert!(pdf.starts_with(b"%PDF-"));
    assert!(pdf.len() > 1000);
    assert!(common::page_count(&pdf).expect("page count") >= 2);
}

#[test]
fn title_page_is_separate_from_body() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");
    let streams = common::decoded_content_streams(&pdf);
    assert!(streams.len() >= 2);

    let first = common::shown_text(&streams[0]);
    let second = common::shown_text(&streams[1]);

    // Title-block words on page one, first body heading on page two.
    assert!(first.contains("Assignment"));
    assert!(second.contains("Purpose"));
    assert!(!first.contains("Purpose"));
}

#[test]
fn body_text_and_table_content_appear() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");
    let all: String = common::decoded_content_streams(&pdf)
        .iter()
        .map(|s| common::shown_text(s))
        .collect::<Vec<_>>()
        .join(" ");

    assert!(all.contains("Deliverables"));
    assert!(all.contains("Objective"));
    assert!(all.contains("prototype"));
    // Emphasis markers never reach the output.
    assert!(!all.contains("**"));
}

#[test]
fn footer_numbers_every_page() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");
    let streams = common::decoded_content_streams(&pdf);

    for (i, stream) in streams.iter().enumerate() {
        let text = common::shown_text(stream);
        let expected = format!("Page {}", i + 1);
        assert!(text.contains(&expected), "page {} lacks footer", i + 1);
    }
}

#[test]
fn no_footer_setting_removes_page_numbers() {
    let source = common::load_fixture("thesis_structure.md");
    let settings = RenderSettings {
        page_footer: false,
        ..fallback_settings()
    };
    let pdf = render_markdown_with(&source, &settings).expect("render");

    for stream in common::decoded_content_streams(&pdf) {
        assert!(!common::shown_text(&stream).contains("Page 1"));
    }
}

#[test]
fn header_title_override_skips_first_page() {
    let source = common::load_fixture("thesis_structure.md");
    let settings = RenderSettings {
        header_title: Some("CONFIDENTIAL".to_string()),
        ..fallback_settings()
    };
    let pdf = render_markdown_with(&source, &settings).expect("render");
    let streams = common::decoded_content_streams(&pdf);
    assert!(streams.len() >= 2);

    assert!(!common::shown_text(&streams[0]).contains("CONFIDENTIAL"));
    for stream in &streams[1..] {
        assert!(common::shown_text(stream).contains("CONFIDENTIAL"));
    }
}

#[test]
fn empty_source_renders_single_blank_page() {
    let pdf = render_markdown("").expect("render");
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(common::page_count(&pdf), Some(1));
}
