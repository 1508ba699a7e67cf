//! Hard-coded stylesheet for the rendered documents.
//!
//! The source format has no styling syntax beyond structure, so every
//! dimension lives here. Geometry is in PDF points; the source documents
//! were designed in millimeters, hence the `MM` factor.

use crate::model::{Alignment, Paragraph, Run};

pub(crate) const MM: f32 = 72.0 / 25.4;

pub(crate) const A4_WIDTH: f32 = 595.276;
pub(crate) const A4_HEIGHT: f32 = 841.89;
pub(crate) const MARGIN: f32 = 15.0 * MM;
pub(crate) const HEADER_MARGIN: f32 = 9.0 * MM;
pub(crate) const FOOTER_MARGIN: f32 = 12.0 * MM;

pub(crate) const BODY_SIZE: f32 = 10.5;
pub(crate) const BODY_LINE_H: f32 = 5.0 * MM;

pub(crate) const TITLE_SIZE: f32 = 16.0;
pub(crate) const TITLE_LINE_H: f32 = 8.0 * MM;
pub(crate) const SUBTITLE_SIZE: f32 = 12.0;
pub(crate) const SUBTITLE_LINE_H: f32 = 7.0 * MM;
pub(crate) const TITLE_TOP_SPACE: f32 = 12.0 * MM;

/// Vertical gap emitted for a blank source line.
pub(crate) const BLANK_GAP: f32 = 2.0 * MM;

pub(crate) const BULLET_INDENT: f32 = 4.0 * MM;
pub(crate) const BULLET_LABEL: &str = "-";
/// Gap between the bullet marker and the first word.
pub(crate) const BULLET_LABEL_GAP: f32 = 6.0;

pub(crate) const CELL_FONT_SIZE: f32 = 9.5;
pub(crate) const CELL_LINE_H: f32 = 5.0 * MM;
pub(crate) const CELL_PADDING: f32 = 1.5 * MM;
pub(crate) const HEADER_FILL: [u8; 3] = [245, 245, 245];
/// Tuned for the objective/sections/methods/results mapping table.
pub(crate) const FOUR_COLUMN_WEIGHTS: [f32; 4] = [0.10, 0.25, 0.27, 0.38];

pub(crate) const RULE_COLOR: [u8; 3] = [180, 180, 180];
pub(crate) const RULE_SPACE_BEFORE: f32 = 2.0 * MM;
pub(crate) const RULE_SPACE_AFTER: f32 = 4.0 * MM;

pub(crate) const HEADER_TEXT_SIZE: f32 = 9.0;
pub(crate) const HEADER_TEXT_COLOR: [u8; 3] = [100, 100, 115];
pub(crate) const HAIRLINE_COLOR: [u8; 3] = [210, 220, 235];
pub(crate) const FOOTER_TEXT_SIZE: f32 = 8.0;
pub(crate) const FOOTER_TEXT_COLOR: [u8; 3] = [128, 128, 128];

/// (font_size, line_h, space_after) per heading level; level 1 covers `#`
/// and anything deeper than `###` clamps to 3.
pub(crate) fn heading_metrics(level: u8) -> (f32, f32, f32) {
    match level {
        1 => (14.0, 7.0 * MM, 1.0 * MM),
        2 => (13.0, 7.0 * MM, 1.0 * MM),
        _ => (11.0, 6.0 * MM, 0.0),
    }
}

pub(crate) fn heading(runs: Vec<Run>, level: u8) -> Paragraph {
    let (_, line_h, space_after) = heading_metrics(level);
    Paragraph {
        runs,
        space_before: 1.0 * MM,
        space_after,
        alignment: Alignment::Left,
        indent_left: 0.0,
        line_h,
        list_label: String::new(),
    }
}

pub(crate) fn body(runs: Vec<Run>, indent_left: f32) -> Paragraph {
    Paragraph {
        runs,
        space_before: 0.0,
        space_after: 0.0,
        alignment: Alignment::Left,
        indent_left,
        line_h: BODY_LINE_H,
        list_label: String::new(),
    }
}

pub(crate) fn bullet(runs: Vec<Run>, nest: usize) -> Paragraph {
    Paragraph {
        runs,
        space_before: 0.0,
        space_after: 0.0,
        alignment: Alignment::Left,
        indent_left: BULLET_INDENT * (1 + nest) as f32,
        line_h: BODY_LINE_H,
        list_label: BULLET_LABEL.to_string(),
    }
}

pub(crate) fn title_line(runs: Vec<Run>, first: bool) -> Paragraph {
    Paragraph {
        runs,
        space_before: if first { TITLE_TOP_SPACE } else { 0.0 },
        space_after: if first { 2.0 * MM } else { 0.0 },
        alignment: Alignment::Center,
        indent_left: 0.0,
        line_h: if first { TITLE_LINE_H } else { SUBTITLE_LINE_H },
        list_label: String::new(),
    }
}

pub(crate) fn blank_gap() -> Paragraph {
    Paragraph {
        runs: Vec::new(),
        space_before: 0.0,
        space_after: 0.0,
        alignment: Alignment::Left,
        indent_left: 0.0,
        line_h: BLANK_GAP,
        list_label: String::new(),
    }
}
