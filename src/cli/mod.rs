pub mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "extract-pdf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract layout-preserved text from a digital PDF and print it as JSON", long_about = None)]
pub struct ExtractCli {
    /// Path to the PDF file
    pub pdf_path: Option<PathBuf>,

    /// Configuration file (default: <config dir>/pdftext/config.toml)
    #[arg(long, env = "PDFTEXT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "ocr-pdf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "OCR a scanned PDF with Poppler and Tesseract and print the text as JSON", long_about = None)]
pub struct OcrCli {
    /// Path to the PDF file
    pub pdf_path: Option<PathBuf>,

    /// Tesseract language code(s), e.g. "eng" or "ind+eng" [default: ind+eng]
    #[arg(short, long, env = "PDFTEXT_OCR_LANG")]
    pub lang: Option<String>,

    /// Configuration file (default: <config dir>/pdftext/config.toml)
    #[arg(long, env = "PDFTEXT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Install the tracing subscriber. Logs go to stderr so stdout carries only
/// the JSON record; only warnings are shown unless RUST_LOG says otherwise.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definitions_are_valid() {
        ExtractCli::command().debug_assert();
        OcrCli::command().debug_assert();
    }

    #[test]
    fn test_ocr_lang_flag() {
        let cli = OcrCli::try_parse_from(["ocr-pdf", "scan.pdf", "--lang", "eng"]).unwrap();
        assert_eq!(cli.pdf_path, Some(PathBuf::from("scan.pdf")));
        assert_eq!(cli.lang.as_deref(), Some("eng"));
    }

    #[test]
    fn test_path_is_optional() {
        let cli = ExtractCli::try_parse_from(["extract-pdf"]).unwrap();
        assert!(cli.pdf_path.is_none());
    }
}
