#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Placeholder substituted during rendering, once the page count is known.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldCode {
    Page,
}

#[derive(Clone)]
pub struct Run {
    pub text: String,
    pub font_size: f32,
    pub font_name: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<[u8; 3]>, // None = automatic (black)
    pub field_code: Option<FieldCode>,
}

impl Run {
    pub fn plain(text: impl Into<String>, font_size: f32, font_name: &str) -> Self {
        Run {
            text: text.into(),
            font_size,
            font_name: font_name.to_string(),
            bold: false,
            italic: false,
            color: None,
            field_code: None,
        }
    }
}

pub struct Paragraph {
    pub runs: Vec<Run>,
    pub space_before: f32,
    pub space_after: f32,
    pub alignment: Alignment,
    pub indent_left: f32,
    /// Line pitch in points. Authoritative: the stylesheet fixes it per
    /// paragraph kind instead of deriving it from font metrics.
    pub line_h: f32,
    /// Hanging label drawn left of the first line (bullet marker).
    pub list_label: String,
}

pub struct Table {
    pub rows: Vec<TableRow>,
}

pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub header: bool,
}

pub struct TableCell {
    pub runs: Vec<Run>,
}

pub struct Rule {
    pub color: [u8; 3],
}

pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Rule(Rule),
}

/// A single header or footer line rendered on every page.
pub struct HeaderFooter {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    /// Hairline rule separating the header/footer from the body.
    pub hairline: Option<[u8; 3]>,
}

pub struct PageSetup {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub header_margin: f32,
    pub footer_margin: f32,
    pub header: Option<HeaderFooter>,
    pub footer: Option<HeaderFooter>,
    pub skip_header_on_first_page: bool,
}

impl PageSetup {
    pub fn text_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }
}

pub struct Document {
    /// Title-block paragraphs, rendered centered on the first page.
    pub title: Vec<Paragraph>,
    pub blocks: Vec<Block>,
    pub setup: PageSetup,
}

/// Document-level rendering knobs exposed through the CLI.
pub struct RenderSettings {
    /// Font family to look up in the system font index. Falls back to the
    /// builtin Helvetica core fonts when not found.
    pub font_family: String,
    /// Running-header text. Defaults to the first title-block line.
    pub header_title: Option<String>,
    /// Emit the "Page N" footer.
    pub page_footer: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            font_family: "Helvetica".to_string(),
            header_title: None,
            page_footer: true,
        }
    }
}
