use std::collections::HashMap;

use crate::fonts::FontEntry;
use crate::model::{Alignment, PageSetup, Table};
use crate::style::{CELL_LINE_H, CELL_PADDING, FOUR_COLUMN_WEIGHTS, HEADER_FILL, MM};

use super::PageFlow;
use super::layout::{TextLine, ascender_ratio, build_paragraph_lines, render_paragraph_lines};

/// Column widths across the text area. The four-column case uses hand-tuned
/// weights; any other arity splits the width evenly.
fn column_widths(col_count: usize, text_width: f32) -> Vec<f32> {
    if col_count == FOUR_COLUMN_WEIGHTS.len() {
        FOUR_COLUMN_WEIGHTS.iter().map(|w| w * text_width).collect()
    } else {
        vec![text_width / col_count.max(1) as f32; col_count]
    }
}

struct RowLayout {
    height: f32,
    cell_lines: Vec<Vec<TextLine>>,
}

fn compute_row_layouts(
    table: &Table,
    col_widths: &[f32],
    seen_fonts: &HashMap<String, FontEntry>,
) -> Vec<RowLayout> {
    table
        .rows
        .iter()
        .map(|row| {
            let mut max_lines = 1usize;
            let cell_lines: Vec<Vec<TextLine>> = row
                .cells
                .iter()
                .enumerate()
                .map(|(ci, cell)| {
                    let col_w = col_widths.get(ci).copied().unwrap_or(0.0);
                    let wrap_w = (col_w - 2.0 * CELL_PADDING).max(1.0);
                    let lines = build_paragraph_lines(&cell.runs, seen_fonts, wrap_w);
                    max_lines = max_lines.max(lines.len());
                    lines
                })
                .collect();

            RowLayout {
                height: max_lines as f32 * CELL_LINE_H + 2.0 * CELL_PADDING,
                cell_lines,
            }
        })
        .collect()
}

pub(super) fn render_table(
    table: &Table,
    sp: &PageSetup,
    seen_fonts: &HashMap<String, FontEntry>,
    flow: &mut PageFlow,
) {
    let col_count = table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    if col_count == 0 {
        return;
    }
    let col_widths = column_widths(col_count, sp.text_width());
    let row_layouts = compute_row_layouts(table, &col_widths, seen_fonts);

    for (ri, (row, layout)) in table.rows.iter().zip(row_layouts.iter()).enumerate() {
        let row_h = layout.height;
        log::debug!(
            "table row={} row_h={:.2} slot_top={:.2}",
            ri,
            row_h,
            flow.slot_top
        );

        if !flow.at_page_top(sp) && flow.slot_top - row_h < sp.margin_bottom {
            flow.break_page(sp);
        }

        let row_top = flow.slot_top;
        let row_bottom = row_top - row_h;

        for (ci, (cell, lines)) in row.cells.iter().zip(layout.cell_lines.iter()).enumerate() {
            let cell_x = sp.margin_left + col_widths[..ci].iter().sum::<f32>();
            let col_w = col_widths[ci];

            if row.header {
                let [r, g, b] = HEADER_FILL;
                flow.content.save_state();
                flow.content
                    .set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                flow.content.rect(cell_x, row_bottom, col_w, row_h);
                flow.content.fill_nonzero();
                flow.content.restore_state();
            }

            if !lines.iter().all(|l| l.chunks.is_empty()) {
                let font_size = cell.runs.first().map_or(9.5, |r| r.font_size);
                let ascent = font_size * ascender_ratio(&cell.runs, seen_fonts);
                render_paragraph_lines(
                    &mut flow.content,
                    lines,
                    Alignment::Left,
                    cell_x + CELL_PADDING,
                    col_w - 2.0 * CELL_PADDING,
                    row_top - CELL_PADDING - ascent,
                    CELL_LINE_H,
                    seen_fonts,
                );
            }

            flow.content.save_state();
            flow.content.set_line_width(0.5);
            flow.content.rect(cell_x, row_bottom, col_w, row_h);
            flow.content.stroke();
            flow.content.restore_state();
        }

        flow.slot_top = row_bottom;
    }

    flow.slot_top -= 2.0 * MM;
}
