mod inline;

use std::path::Path;

use crate::error::Error;
use crate::model::{
    Alignment, Block, Document, FieldCode, HeaderFooter, PageSetup, RenderSettings, Rule, Run,
    Table, TableCell, TableRow,
};
use crate::style;

use inline::{BaseStyle, styled_runs};

/// Replace characters WinAnsi cannot represent with ASCII equivalents.
/// Dashes, ellipses and smart quotes are representable and pass through.
pub(crate) fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2192}' => out.push_str("->"),  // right arrow
            '\u{2116}' => out.push_str("No."), // numero sign
            '\u{2212}' => out.push('-'),       // minus sign
            '\u{00a0}' => out.push(' '),       // nbsp
            _ => out.push(ch),
        }
    }
    out
}

pub fn parse_file(path: &Path, settings: &RenderSettings) -> Result<Document, Error> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    if bytes.contains(&0) {
        return Err(Error::InvalidMarkdown(
            "input contains NUL bytes (is this a text file?)".into(),
        ));
    }
    let source = String::from_utf8(bytes)
        .map_err(|_| Error::InvalidMarkdown("input is not valid UTF-8".into()))?;
    parse(&source, settings)
}

pub fn parse(source: &str, settings: &RenderSettings) -> Result<Document, Error> {
    let lines: Vec<&str> = source.lines().collect();
    let sep_idx = lines.iter().position(|l| l.trim() == "---");
    let (title_lines, body_lines): (&[&str], &[&str]) = match sep_idx {
        Some(idx) => (&lines[..idx], &lines[idx + 1..]),
        // No separator: the leading lines double as the title block.
        None => (&lines[..lines.len().min(8)], &lines[..]),
    };

    let font = settings.font_family.as_str();
    let mut title = Vec::new();
    let mut running_title: Option<String> = None;
    let mut first = true;
    for raw in title_lines {
        let text = sanitize(raw.trim());
        if text.is_empty() {
            if !first {
                title.push(style::blank_gap());
            }
            continue;
        }
        if running_title.is_none() {
            running_title = Some(strip_markers(&text));
        }
        let base = BaseStyle {
            font_size: if first { style::TITLE_SIZE } else { style::SUBTITLE_SIZE },
            font_name: font,
            bold: first,
            color: None,
        };
        title.push(style::title_line(styled_runs(&text, &base), first));
        first = false;
    }

    let blocks = parse_body(body_lines, font);

    let header_title = settings
        .header_title
        .clone()
        .or(running_title)
        .unwrap_or_default();
    let setup = page_setup(&header_title, settings.page_footer, font);

    Ok(Document { title, blocks, setup })
}

fn parse_body(body_lines: &[&str], font: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < body_lines.len() {
        let line = body_lines[i].trim_end();
        let stripped = line.trim_start();

        if stripped.is_empty() {
            blocks.push(Block::Paragraph(style::blank_gap()));
            i += 1;
            continue;
        }

        if stripped == "---" {
            blocks.push(Block::Rule(Rule { color: style::RULE_COLOR }));
            i += 1;
            continue;
        }

        if let Some(level) = heading_level(stripped) {
            let text = sanitize(stripped[level as usize + 1..].trim());
            let (size, _, _) = style::heading_metrics(level);
            let base = BaseStyle {
                font_size: size,
                font_name: font,
                bold: true,
                color: None,
            };
            blocks.push(Block::Paragraph(style::heading(
                styled_runs(&text, &base),
                level,
            )));
            i += 1;
            continue;
        }

        if is_table_line(stripped) {
            let start = i;
            while i < body_lines.len() && is_table_line(body_lines[i].trim()) {
                i += 1;
            }
            if let Some(table) = parse_table(&body_lines[start..i], font) {
                blocks.push(Block::Table(table));
            }
            continue;
        }

        if let Some(item) = stripped.strip_prefix("- ") {
            let leading = line.len() - stripped.len();
            let nest = leading / 2;
            let base = BaseStyle {
                font_size: style::BODY_SIZE,
                font_name: font,
                bold: false,
                color: None,
            };
            blocks.push(Block::Paragraph(style::bullet(
                styled_runs(&sanitize(item.trim()), &base),
                nest,
            )));
            i += 1;
            continue;
        }

        let base = BaseStyle {
            font_size: style::BODY_SIZE,
            font_name: font,
            bold: false,
            color: None,
        };
        blocks.push(Block::Paragraph(style::body(
            styled_runs(&sanitize(stripped), &base),
            0.0,
        )));
        i += 1;
    }
    blocks
}

fn heading_level(stripped: &str) -> Option<u8> {
    for level in 1..=3u8 {
        let prefix: String = "#".repeat(level as usize) + " ";
        if stripped.starts_with(&prefix) {
            return Some(level);
        }
    }
    None
}

fn is_table_line(stripped: &str) -> bool {
    stripped.len() > 1 && stripped.starts_with('|') && stripped.ends_with('|')
}

/// A row whose cells hold only `-` and `:` is a Markdown alignment
/// separator, not content.
fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| c.chars().all(|ch| ch == '-' || ch == ':'))
}

fn parse_table(table_lines: &[&str], font: &str) -> Option<Table> {
    let mut rows_text: Vec<Vec<String>> = Vec::new();
    for line in table_lines {
        let s = line.trim();
        if !is_table_line(s) {
            continue;
        }
        let cells: Vec<String> = s
            .trim_matches('|')
            .split('|')
            .map(|c| sanitize(c.trim()))
            .collect();
        if is_separator_row(&cells) {
            continue;
        }
        rows_text.push(cells);
    }
    if rows_text.is_empty() {
        return None;
    }

    let col_count = rows_text.iter().map(|r| r.len()).max().unwrap_or(0);
    let rows = rows_text
        .into_iter()
        .enumerate()
        .map(|(ri, mut cells)| {
            cells.resize(col_count, String::new());
            let header = ri == 0;
            let base = BaseStyle {
                font_size: style::CELL_FONT_SIZE,
                font_name: font,
                bold: header,
                color: None,
            };
            TableRow {
                cells: cells
                    .iter()
                    .map(|c| TableCell {
                        runs: styled_runs(c, &base),
                    })
                    .collect(),
                header,
            }
        })
        .collect();

    Some(Table { rows })
}

/// Emphasis markers don't belong in the running-header text.
fn strip_markers(text: &str) -> String {
    text.replace("**", "").replace('*', "")
}

fn page_setup(header_title: &str, page_footer: bool, font: &str) -> PageSetup {
    let header = if header_title.is_empty() {
        None
    } else {
        let mut run = Run::plain(header_title, style::HEADER_TEXT_SIZE, font);
        run.italic = true;
        run.color = Some(style::HEADER_TEXT_COLOR);
        Some(HeaderFooter {
            runs: vec![run],
            alignment: Alignment::Right,
            hairline: Some(style::HAIRLINE_COLOR),
        })
    };

    let footer = if page_footer {
        let mut label = Run::plain("Page ", style::FOOTER_TEXT_SIZE, font);
        label.italic = true;
        label.color = Some(style::FOOTER_TEXT_COLOR);
        let mut number = Run::plain("", style::FOOTER_TEXT_SIZE, font);
        number.italic = true;
        number.color = Some(style::FOOTER_TEXT_COLOR);
        number.field_code = Some(FieldCode::Page);
        Some(HeaderFooter {
            runs: vec![label, number],
            alignment: Alignment::Center,
            hairline: None,
        })
    } else {
        None
    };

    PageSetup {
        page_width: style::A4_WIDTH,
        page_height: style::A4_HEIGHT,
        margin_top: style::MARGIN,
        margin_bottom: style::MARGIN,
        margin_left: style::MARGIN,
        margin_right: style::MARGIN,
        header_margin: style::HEADER_MARGIN,
        footer_margin: style::FOOTER_MARGIN,
        header,
        footer,
        skip_header_on_first_page: true,
    }
}
