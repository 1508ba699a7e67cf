use std::path::Path;

pub fn load_fixture(name: &str) -> String {
    let path = Path::new("tests/fixtures").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read fixture {}: {e}", path.display()))
}

/// Page count from the page tree's /Count entry.
pub fn page_count(pdf: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(pdf);
    let idx = text.find("/Count ")?;
    let rest = &text[idx + 7..];
    let end = rest.find(|c: char| !c.is_ascii_digit())?;
    rest[..end].parse().ok()
}

/// All /MediaBox rectangles as (width, height).
pub fn media_boxes(pdf: &[u8]) -> Vec<(f32, f32)> {
    let text = String::from_utf8_lossy(pdf);
    let mut boxes = Vec::new();
    let mut rest = text.as_ref();
    while let Some(idx) = rest.find("/MediaBox") {
        rest = &rest[idx + 9..];
        let Some(open) = rest.find('[') else { break };
        let Some(close) = rest.find(']') else { break };
        let nums: Vec<f32> = rest[open + 1..close]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if nums.len() == 4 {
            boxes.push((nums[2] - nums[0], nums[3] - nums[1]));
        }
        rest = &rest[close..];
    }
    boxes
}

/// Decompressed page content streams, in document order. Streams that do not
/// inflate (embedded font programs) are skipped.
pub fn decoded_content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(idx) = find(&pdf[pos..], b"stream\n") {
        let start = pos + idx + 7;
        let Some(end_rel) = find(&pdf[start..], b"endstream") else {
            break;
        };
        let mut data = &pdf[start..start + end_rel];
        // pdf-writer terminates stream data with a newline before endstream.
        if let [rest @ .., b'\n'] = data {
            data = rest;
        }
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(data) {
            out.push(raw);
        }
        pos = start + end_rel + 9;
    }
    out
}

/// Text shown by a content stream: the bytes of every literal string,
/// concatenated with spaces. Only meaningful for WinAnsi-encoded output.
pub fn shown_text(content: &[u8]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < content.len() {
        if content[i] == b'(' {
            i += 1;
            let mut word = Vec::new();
            while i < content.len() && content[i] != b')' {
                if content[i] == b'\\' && i + 1 < content.len() {
                    i += 1;
                }
                word.push(content[i]);
                i += 1;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&String::from_utf8_lossy(&word));
        }
        i += 1;
    }
    out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
