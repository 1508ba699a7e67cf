use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use markpress::RenderSettings;

/// Render a Markdown file to PDF.
#[derive(Parser, Debug)]
#[command(name = "markpress", version, about = "Render a Markdown file to PDF")]
struct Cli {
    /// Input Markdown file.
    input: PathBuf,

    /// Output PDF path. Defaults to the input path with a .pdf extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Font family to use (looked up in the system font directories).
    #[arg(long, default_value = "Helvetica")]
    font: String,

    /// Override the running-header text.
    #[arg(long)]
    title: Option<String>,

    /// Omit the "Page N" footer.
    #[arg(long)]
    no_footer: bool,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    let settings = RenderSettings {
        font_family: cli.font,
        header_title: cli.title,
        page_footer: !cli.no_footer,
    };

    match markpress::convert_markdown_to_pdf_with(&cli.input, &output, &settings) {
        Ok(()) => {
            log::info!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
