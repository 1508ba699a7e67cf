use std::collections::HashMap;

use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, encode_as_gids, font_key, to_winansi_bytes};
use crate::model::{Alignment, Run};

pub(super) struct WordChunk {
    pub(super) pdf_font: String,
    pub(super) text: String,
    pub(super) font_size: f32,
    pub(super) color: Option<[u8; 3]>,
    pub(super) x_offset: f32, // x relative to line start
    pub(super) width: f32,
}

pub(super) struct TextLine {
    pub(super) chunks: Vec<WordChunk>,
    pub(super) total_width: f32,
}

/// True when a paragraph carries no visible text (blank-line gap paragraphs).
pub(super) fn is_text_empty(runs: &[Run]) -> bool {
    runs.iter().all(|r| r.text.trim().is_empty())
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    let total_width = chunks.last().map(|c| c.x_offset + c.width).unwrap_or(0.0);
    TextLine {
        chunks: std::mem::take(chunks),
        total_width,
    }
}

/// Greedy word wrap of styled runs into lines of at most `max_width`.
/// Handles cross-run contiguous text correctly: no space is inserted between
/// runs unless the preceding text ended with whitespace or the new run starts
/// with whitespace ("bold" + ", " → "bold," not "bold ,").
pub(super) fn build_paragraph_lines(
    runs: &[Run],
    seen_fonts: &HashMap<String, FontEntry>,
    max_width: f32,
) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_chunks: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_with_ws = false;
    let mut prev_space_w: f32 = 0.0;

    for run in runs {
        let Some(entry) = seen_fonts.get(&font_key(run)) else {
            continue;
        };
        let space_w = entry.space_width(run.font_size);
        let starts_with_ws = run.text.starts_with(char::is_whitespace);

        for (i, word) in run.text.split_whitespace().enumerate() {
            let ww = entry.word_width(word, run.font_size);

            let need_space =
                !current_chunks.is_empty() && (i > 0 || starts_with_ws || prev_ended_with_ws);

            // The space belongs to whichever run contains the whitespace:
            // within this run or at its start → this run's width, otherwise
            // the trailing space of the previous run.
            let effective_space_w = if i > 0 || starts_with_ws {
                space_w
            } else {
                prev_space_w
            };

            let proposed_x = if need_space {
                current_x + effective_space_w
            } else {
                current_x
            };

            if !current_chunks.is_empty() && proposed_x + ww > max_width {
                lines.push(finish_line(&mut current_chunks));
                current_x = 0.0;
            } else {
                current_x = proposed_x;
            }

            current_chunks.push(WordChunk {
                pdf_font: entry.pdf_name.clone(),
                text: word.to_string(),
                font_size: run.font_size,
                color: run.color,
                x_offset: current_x,
                width: ww,
            });
            current_x += ww;
        }

        prev_ended_with_ws = run.text.ends_with(char::is_whitespace);
        prev_space_w = space_w;
    }

    if !current_chunks.is_empty() {
        lines.push(finish_line(&mut current_chunks));
    }

    if lines.is_empty() {
        lines.push(TextLine {
            chunks: vec![],
            total_width: 0.0,
        });
    }
    lines
}

fn encode_text_for_pdf(
    text: &str,
    pdf_font: &str,
    seen_fonts: &HashMap<String, FontEntry>,
) -> Vec<u8> {
    let entry = seen_fonts.values().find(|e| e.pdf_name == pdf_font);
    match entry.and_then(|e| e.char_to_gid.as_ref()) {
        Some(map) => encode_as_gids(text, map),
        None => to_winansi_bytes(text),
    }
}

/// Render pre-built lines applying the paragraph alignment. Font and fill
/// color operators are emitted only on change.
pub(super) fn render_paragraph_lines(
    content: &mut Content,
    lines: &[TextLine],
    alignment: Alignment,
    left_x: f32,
    avail_width: f32,
    first_baseline_y: f32,
    line_pitch: f32,
    seen_fonts: &HashMap<String, FontEntry>,
) {
    let mut current_color: Option<[u8; 3]> = None;
    let mut cur_font_name = String::new();
    let mut cur_font_size: f32 = -1.0;

    for (line_num, line) in lines.iter().enumerate() {
        if line.chunks.is_empty() {
            continue;
        }
        let y = first_baseline_y - line_num as f32 * line_pitch;

        let line_start_x = match alignment {
            Alignment::Center => left_x + (avail_width - line.total_width) / 2.0,
            Alignment::Right => left_x + avail_width - line.total_width,
            Alignment::Left => left_x,
        };

        content.begin_text();
        let mut td_x = 0.0_f32;
        let mut td_y = 0.0_f32;

        for chunk in &line.chunks {
            let x = line_start_x + chunk.x_offset;

            if chunk.color != current_color {
                if let Some([r, g, b]) = chunk.color {
                    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                } else {
                    content.set_fill_gray(0.0);
                }
                current_color = chunk.color;
            }

            if cur_font_name != chunk.pdf_font || cur_font_size != chunk.font_size {
                content.set_font(Name(chunk.pdf_font.as_bytes()), chunk.font_size);
                cur_font_name.clear();
                cur_font_name.push_str(&chunk.pdf_font);
                cur_font_size = chunk.font_size;
            }

            content.next_line(x - td_x, y - td_y);
            td_x = x;
            td_y = y;

            let text_bytes = encode_text_for_pdf(&chunk.text, &chunk.pdf_font, seen_fonts);
            content.show(Str(&text_bytes));
        }
        content.end_text();
    }

    if current_color.is_some() {
        content.set_fill_gray(0.0);
    }
}

/// Ascender ratio of the first run's font, for placing the first baseline
/// below the paragraph's top edge.
pub(super) fn ascender_ratio(runs: &[Run], seen_fonts: &HashMap<String, FontEntry>) -> f32 {
    runs.first()
        .map(font_key)
        .and_then(|k| seen_fonts.get(&k))
        .and_then(|e| e.ascender_ratio)
        .unwrap_or(0.75)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_writer::Ref;

    fn fixed_width_entry(pdf_name: &str) -> FontEntry {
        // Every WinAnsi char 500 units wide, so word widths are predictable.
        FontEntry {
            pdf_name: pdf_name.to_string(),
            font_ref: Ref::new(1),
            widths_1000: vec![500.0; 224],
            ascender_ratio: None,
            char_to_gid: None,
            char_widths_1000: None,
        }
    }

    fn fonts_with(entries: &[&str]) -> HashMap<String, FontEntry> {
        entries
            .iter()
            .enumerate()
            .map(|(i, key)| ((*key).to_string(), fixed_width_entry(&format!("F{}", i + 1))))
            .collect()
    }

    fn run(text: &str) -> Run {
        Run::plain(text, 10.0, "Test")
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let fonts = fonts_with(&["Test"]);
        let lines = build_paragraph_lines(&[run("ab cd")], &fonts, 500.0);
        assert_eq!(lines.len(), 1);
        // ab(10) + space(5) + cd(10) at 10pt with 500-unit chars.
        assert!((lines[0].total_width - 25.0).abs() < 0.001);
    }

    #[test]
    fn wraps_at_max_width() {
        let fonts = fonts_with(&["Test"]);
        // Each word 20pt wide, plus 5pt space; three words need 70pt.
        let lines = build_paragraph_lines(&[run("aaaa bbbb cccc")], &fonts, 50.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chunks.len(), 2);
        assert_eq!(lines[1].chunks[0].text, "cccc");
        assert!((lines[1].chunks[0].x_offset - 0.0).abs() < 0.001);
    }

    #[test]
    fn overlong_word_gets_its_own_line_unclipped() {
        let fonts = fonts_with(&["Test"]);
        let lines = build_paragraph_lines(&[run("tiny extraordinarily")], &fonts, 30.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].chunks[0].text, "extraordinarily");
    }

    #[test]
    fn no_space_between_runs_without_whitespace() {
        let fonts = fonts_with(&["Test", "Test/B"]);
        let mut bold = run("bold");
        bold.bold = true;
        let lines = build_paragraph_lines(&[bold, run(", tail")], &fonts, 500.0);
        let chunks = &lines[0].chunks;
        assert_eq!(chunks[0].text, "bold");
        assert_eq!(chunks[1].text, ",");
        // "," starts exactly where "bold" ends.
        assert!((chunks[1].x_offset - (chunks[0].x_offset + chunks[0].width)).abs() < 0.001);
    }

    #[test]
    fn trailing_whitespace_in_previous_run_inserts_space() {
        let fonts = fonts_with(&["Test"]);
        let lines = build_paragraph_lines(&[run("lead "), run("next")], &fonts, 500.0);
        let chunks = &lines[0].chunks;
        let gap = chunks[1].x_offset - (chunks[0].x_offset + chunks[0].width);
        assert!((gap - 5.0).abs() < 0.001);
    }

    #[test]
    fn empty_runs_produce_single_empty_line() {
        let fonts = fonts_with(&["Test"]);
        let lines = build_paragraph_lines(&[run("  ")], &fonts, 500.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].chunks.is_empty());
        assert!(is_text_empty(&[run("  ")]));
    }
}
