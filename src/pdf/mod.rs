mod layout;
mod table;

use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::fonts::{FontEntry, encode_as_gids, font_key, register_font, to_winansi_bytes};
use crate::model::{Block, Document, FieldCode, HeaderFooter, PageSetup, Paragraph, Run};
use crate::style::{BULLET_LABEL_GAP, MM, RULE_SPACE_AFTER, RULE_SPACE_BEFORE};

use layout::{
    ascender_ratio, build_paragraph_lines, is_text_empty, render_paragraph_lines,
};
use table::render_table;

/// Running layout state: the page being filled and the descending cursor.
/// `slot_top` is the y coordinate of the next free slot's top edge.
pub(crate) struct PageFlow {
    content: Content,
    pages: Vec<Content>,
    slot_top: f32,
}

impl PageFlow {
    fn new(sp: &PageSetup) -> Self {
        PageFlow {
            content: Content::new(),
            pages: Vec::new(),
            slot_top: sp.page_height - sp.margin_top,
        }
    }

    fn at_page_top(&self, sp: &PageSetup) -> bool {
        (self.slot_top - (sp.page_height - sp.margin_top)).abs() < 1.0
    }

    fn break_page(&mut self, sp: &PageSetup) {
        self.pages
            .push(std::mem::replace(&mut self.content, Content::new()));
        self.slot_top = sp.page_height - sp.margin_top;
    }

    fn finish(mut self) -> Vec<Content> {
        self.pages.push(self.content);
        self.pages
    }
}

fn collect_runs(doc: &Document) -> Vec<&Run> {
    let block_runs = doc.blocks.iter().flat_map(|block| -> Vec<&Run> {
        match block {
            Block::Paragraph(para) => para.runs.iter().collect(),
            Block::Table(table) => table
                .rows
                .iter()
                .flat_map(|row| row.cells.iter())
                .flat_map(|cell| cell.runs.iter())
                .collect(),
            Block::Rule(_) => Vec::new(),
        }
    });

    let hf_runs = [&doc.setup.header, &doc.setup.footer]
        .into_iter()
        .filter_map(|hf| hf.as_ref())
        .flat_map(|hf| hf.runs.iter());

    doc.title
        .iter()
        .flat_map(|p| p.runs.iter())
        .chain(block_runs)
        .chain(hf_runs)
        .collect()
}

/// Per-font character sets for subsetting. Page-number fields need all
/// digits; list labels ride on the paragraph's first run.
fn collect_used_chars(doc: &Document, all_runs: &[&Run]) -> HashMap<String, HashSet<char>> {
    let mut used: HashMap<String, HashSet<char>> = HashMap::new();
    for run in all_runs {
        let chars = used.entry(font_key(run)).or_default();
        chars.extend(run.text.chars());
        if let Some(FieldCode::Page) = run.field_code {
            chars.extend('0'..='9');
        }
    }

    let labelled = doc.blocks.iter().filter_map(|b| match b {
        Block::Paragraph(p) if !p.list_label.is_empty() => Some(p),
        _ => None,
    });
    for para in labelled {
        if let Some(run) = para.runs.first() {
            used.entry(font_key(run))
                .or_default()
                .extend(para.list_label.chars());
        }
    }

    for chars in used.values_mut() {
        chars.insert(' ');
    }
    used
}

fn label_for_run<'a>(
    run: &Run,
    seen_fonts: &'a HashMap<String, FontEntry>,
    label: &str,
) -> Option<(&'a FontEntry, Vec<u8>)> {
    let entry = seen_fonts.get(&font_key(run))?;
    let bytes = match &entry.char_to_gid {
        Some(map) => encode_as_gids(label, map),
        None => to_winansi_bytes(label),
    };
    Some((entry, bytes))
}

/// Flow one paragraph through the page cursor, line by line, breaking to a
/// new page whenever the next line would cross the bottom margin.
fn render_paragraph(
    para: &Paragraph,
    sp: &PageSetup,
    seen_fonts: &HashMap<String, FontEntry>,
    flow: &mut PageFlow,
) {
    if is_text_empty(&para.runs) {
        // Blank-line gap paragraph; just advance the cursor.
        flow.slot_top -= para.space_before + para.line_h + para.space_after;
        return;
    }

    flow.slot_top -= para.space_before;

    let avail_width = (sp.text_width() - para.indent_left).max(1.0);
    let lines = build_paragraph_lines(&para.runs, seen_fonts, avail_width);
    let font_size = para.runs.first().map_or(10.5, |r| r.font_size);
    let ascent = font_size * ascender_ratio(&para.runs, seen_fonts);
    let left_x = sp.margin_left + para.indent_left;

    for (i, line) in lines.iter().enumerate() {
        if !flow.at_page_top(sp) && flow.slot_top - para.line_h < sp.margin_bottom {
            flow.break_page(sp);
        }
        let baseline_y = flow.slot_top - ascent;

        if i == 0
            && !para.list_label.is_empty()
            && let Some(run) = para.runs.first()
            && let Some((entry, bytes)) = label_for_run(run, seen_fonts, &para.list_label)
        {
            let label_w = entry.word_width(&para.list_label, run.font_size);
            flow.content.begin_text();
            flow.content
                .set_font(Name(entry.pdf_name.as_bytes()), run.font_size);
            flow.content
                .next_line(left_x - BULLET_LABEL_GAP - label_w, baseline_y);
            flow.content.show(Str(&bytes));
            flow.content.end_text();
        }

        render_paragraph_lines(
            &mut flow.content,
            std::slice::from_ref(line),
            para.alignment,
            left_x,
            avail_width,
            baseline_y,
            para.line_h,
            seen_fonts,
        );
        flow.slot_top -= para.line_h;
    }

    flow.slot_top -= para.space_after;
}

fn render_rule(color: [u8; 3], sp: &PageSetup, flow: &mut PageFlow) {
    let needed = RULE_SPACE_BEFORE + RULE_SPACE_AFTER;
    if !flow.at_page_top(sp) && flow.slot_top - needed < sp.margin_bottom {
        flow.break_page(sp);
    }
    flow.slot_top -= RULE_SPACE_BEFORE;

    let [r, g, b] = color;
    flow.content.save_state();
    flow.content
        .set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    flow.content.set_line_width(0.5);
    flow.content.move_to(sp.margin_left, flow.slot_top);
    flow.content
        .line_to(sp.page_width - sp.margin_right, flow.slot_top);
    flow.content.stroke();
    flow.content.restore_state();

    flow.slot_top -= RULE_SPACE_AFTER;
}

fn hairline(content: &mut Content, color: [u8; 3], sp: &PageSetup, y: f32) {
    let [r, g, b] = color;
    content.save_state();
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content.set_line_width(0.4);
    content.move_to(sp.margin_left, y);
    content.line_to(sp.page_width - sp.margin_right, y);
    content.stroke();
    content.restore_state();
}

fn render_header_footer(
    content: &mut Content,
    hf: &HeaderFooter,
    seen_fonts: &HashMap<String, FontEntry>,
    sp: &PageSetup,
    is_header: bool,
    page_num: usize,
) {
    let substituted_runs: Vec<Run> = hf
        .runs
        .iter()
        .map(|run| {
            let mut r = run.clone();
            if let Some(FieldCode::Page) = r.field_code.take() {
                r.text = page_num.to_string();
            }
            r
        })
        .collect();

    if is_text_empty(&substituted_runs) {
        return;
    }

    let font_size = substituted_runs.first().map_or(9.0, |r| r.font_size);
    let ar = ascender_ratio(&substituted_runs, seen_fonts);
    let baseline_y = if is_header {
        sp.page_height - sp.header_margin - font_size * ar
    } else {
        sp.footer_margin + font_size * (1.0 - ar)
    };

    let lines = build_paragraph_lines(&substituted_runs, seen_fonts, sp.text_width());
    render_paragraph_lines(
        content,
        &lines,
        hf.alignment,
        sp.margin_left,
        sp.text_width(),
        baseline_y,
        font_size * 1.2,
        seen_fonts,
    );

    if let Some(color) = hf.hairline {
        let y = if is_header {
            baseline_y - 1.5 * MM
        } else {
            baseline_y + font_size + 1.5 * MM
        };
        hairline(content, color, sp, y);
    }
}

pub fn render(doc: &Document) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let sp = &doc.setup;

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: collect runs and register each (family, bold, italic) variant
    // once, subsetted to the characters it actually shows.
    let all_runs = collect_runs(doc);
    let used_chars_per_font = collect_used_chars(doc, &all_runs);
    let t_collect = t0.elapsed();

    let mut seen_fonts: HashMap<String, FontEntry> = HashMap::new();
    let mut font_order: Vec<String> = Vec::new();
    for run in &all_runs {
        let key = font_key(run);
        if !seen_fonts.contains_key(&key) {
            let pdf_name = format!("F{}", font_order.len() + 1);
            let used = used_chars_per_font.get(&key).cloned().unwrap_or_default();
            let entry = register_font(
                &mut pdf,
                &run.font_name,
                run.bold,
                run.italic,
                pdf_name,
                &mut alloc,
                &used,
            );
            seen_fonts.insert(key.clone(), entry);
            font_order.push(key);
        }
    }
    if seen_fonts.is_empty() {
        let entry = register_font(
            &mut pdf,
            "Helvetica",
            false,
            false,
            "F1".to_string(),
            &mut alloc,
            &HashSet::new(),
        );
        seen_fonts.insert("Helvetica".to_string(), entry);
        font_order.push("Helvetica".to_string());
    }
    let t_fonts = t0.elapsed();

    // Phase 2: flow the title block and body blocks into pages.
    let mut flow = PageFlow::new(sp);

    for para in &doc.title {
        render_paragraph(para, sp, &seen_fonts, &mut flow);
    }
    if !doc.title.is_empty() && !doc.blocks.is_empty() {
        flow.break_page(sp);
    }

    for block in &doc.blocks {
        match block {
            Block::Paragraph(para) => render_paragraph(para, sp, &seen_fonts, &mut flow),
            Block::Table(tbl) => render_table(tbl, sp, &seen_fonts, &mut flow),
            Block::Rule(rule) => render_rule(rule.color, sp, &mut flow),
        }
    }

    let mut page_contents = flow.finish();
    let t_layout = t0.elapsed();

    // Phase 3: headers and footers, now that the page count is known.
    for (i, content) in page_contents.iter_mut().enumerate() {
        let page_num = i + 1;
        if let Some(ref header) = sp.header
            && !(page_num == 1 && sp.skip_header_on_first_page)
        {
            render_header_footer(content, header, &seen_fonts, sp, true, page_num);
        }
        if let Some(ref footer) = sp.footer {
            render_header_footer(content, footer, &seen_fonts, sp, false, page_num);
        }
    }
    let t_headers = t0.elapsed();

    // Phase 4: assembly.
    let n = page_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in page_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let font_pairs: Vec<(String, Ref)> = font_order
        .iter()
        .map(|name| (seen_fonts[name].pdf_name.clone(), seen_fonts[name].font_ref))
        .collect();

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, sp.page_width, sp.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (name, font_ref) in &font_pairs {
            fonts.pair(Name(name.as_bytes()), *font_ref);
        }
    }
    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: collect_runs={:.1}ms, font_embed={:.1}ms, layout={:.1}ms, headers={:.1}ms, assembly={:.1}ms",
        t_collect.as_secs_f64() * 1000.0,
        (t_fonts - t_collect).as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_headers - t_layout).as_secs_f64() * 1000.0,
        (t_assembly - t_headers).as_secs_f64() * 1000.0,
    );

    pdf.finish()
}
