mod common;

use markpress::{RenderSettings, render_markdown_with};

fn fallback_settings() -> RenderSettings {
    RenderSettings {
        font_family: "NoSuchFamilyZZZ".to_string(),
        ..RenderSettings::default()
    }
}

const A4_WIDTH: f32 = 595.276;
const A4_HEIGHT: f32 = 841.89;

#[test]
fn every_page_is_a4() {
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");

    let boxes = common::media_boxes(&pdf);
    assert_eq!(boxes.len(), common::page_count(&pdf).expect("page count"));
    for (w, h) in boxes {
        assert!((w - A4_WIDTH).abs() < 0.01);
        assert!((h - A4_HEIGHT).abs() < 0.01);
    }
}

#[test]
fn title_only_document_fits_one_page() {
    let pdf = render_markdown_with("Short title\n---\n", &fallback_settings()).expect("render");
    assert_eq!(common::page_count(&pdf), Some(1));
}

#[test]
fn long_body_paginates() {
    let mut source = String::from("Title\n---\n");
    for i in 0..200 {
        source.push_str(&format!("Line {i} with a handful of ordinary words on it.\n"));
    }
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");

    // 200 lines at 5 mm pitch need well over two body pages after the
    // title page.
    let pages = common::page_count(&pdf).expect("page count");
    assert!(pages >= 4, "got {pages} pages");
}

#[test]
fn more_content_means_more_pages() {
    let short = render_markdown_with("Title\n---\none line\n", &fallback_settings()).expect("render");
    let mut long_src = String::from("Title\n---\n");
    for _ in 0..120 {
        long_src.push_str("another body line\n");
    }
    let long = render_markdown_with(&long_src, &fallback_settings()).expect("render");

    assert!(common::page_count(&long) > common::page_count(&short));
}

#[test]
fn text_stays_inside_margins() {
    // Every text positioning operator in the body stream must start at or
    // right of the left margin (42.5 pt) minus the bullet label overhang.
    let source = common::load_fixture("thesis_structure.md");
    let pdf = render_markdown_with(&source, &fallback_settings()).expect("render");
    let streams = common::decoded_content_streams(&pdf);

    for stream in &streams {
        let text = String::from_utf8_lossy(stream);
        let mut absolute_next = false;
        for line in text.lines() {
            if line.trim() == "BT" {
                absolute_next = true;
                continue;
            }
            // Only the first Td after BT is absolute; later ones are
            // relative moves and may be negative.
            if absolute_next && let Some(rest) = line.strip_suffix(" Td") {
                absolute_next = false;
                if let Some(x) = rest.split_whitespace().next()
                    && let Ok(x) = x.parse::<f32>()
                {
                    assert!(x > 20.0, "text positioned at x={x}");
                }
            }
        }
    }
}
