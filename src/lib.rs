mod error;
mod fonts;
mod markdown;
mod model;
mod pdf;
mod style;

pub use error::Error;
pub use model::RenderSettings;

use std::path::Path;
use std::time::Instant;

/// Render a Markdown file to a PDF file with default settings.
pub fn convert_markdown_to_pdf(input: &Path, output: &Path) -> Result<(), Error> {
    convert_markdown_to_pdf_with(input, output, &RenderSettings::default())
}

pub fn convert_markdown_to_pdf_with(
    input: &Path,
    output: &Path,
    settings: &RenderSettings,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let doc = markdown::parse_file(input, settings)?;
    let t_parse = t0.elapsed();

    let bytes = pdf::render(&doc);
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}

/// Render already-loaded Markdown source straight to a PDF file.
pub fn convert_markdown_str_to_pdf(source: &str, output: &Path) -> Result<(), Error> {
    let bytes = render_markdown(source)?;
    std::fs::write(output, &bytes).map_err(Error::Io)
}

/// Render Markdown source to PDF bytes with default settings.
pub fn render_markdown(source: &str) -> Result<Vec<u8>, Error> {
    render_markdown_with(source, &RenderSettings::default())
}

pub fn render_markdown_with(source: &str, settings: &RenderSettings) -> Result<Vec<u8>, Error> {
    let doc = markdown::parse(source, settings)?;
    Ok(pdf::render(&doc))
}
