use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::ExtractCli;
use crate::config::{Config, LayoutConfig};
use crate::error::{PdfTextError, Result};
use crate::parser;
use crate::report::{ExtractReport, FailureReport, join_pages};

/// Run the text extractor. Extraction failures are reported in the JSON
/// record with exit status 0; only a missing argument exits with 1.
pub async fn run(cli: ExtractCli) -> ExitCode {
    let Some(pdf_path) = cli.pdf_path else {
        return super::missing_argument("No file path provided");
    };

    match extract(pdf_path, cli.config.as_deref()).await {
        Ok(report) => super::finish(&report, 0),
        Err(e) => {
            super::log_failure(&e);
            super::finish(&FailureReport::new(e.to_string()).with_empty_text(), 0)
        }
    }
}

async fn extract(pdf_path: PathBuf, config_path: Option<&Path>) -> Result<ExtractReport> {
    if !pdf_path.exists() {
        return Err(PdfTextError::FileNotFound(pdf_path));
    }

    let config = Config::load(config_path).map_err(|e| PdfTextError::Config(format!("{e:#}")))?;
    extract_with_layout(pdf_path, config.layout).await
}

/// Extract on the blocking pool so a panic inside the PDF parser surfaces
/// as an error instead of tearing down the process.
pub async fn extract_with_layout(pdf_path: PathBuf, layout: LayoutConfig) -> Result<ExtractReport> {
    tracing::info!("Extracting text from {}", pdf_path.display());

    let pages = tokio::task::spawn_blocking(move || parser::extract_pages(&pdf_path, &layout))
        .await
        .map_err(|e| PdfTextError::Pdf(format!("PDF extraction aborted: {e}")))?
        .map_err(|e| PdfTextError::Pdf(format!("{e:#}")))?;

    let report = ExtractReport::new(join_pages(&pages.texts), pages.page_count);
    tracing::info!(
        "Extracted {} page(s), {} word(s)",
        report.pages,
        report.quality.word_count
    );
    Ok(report)
}
