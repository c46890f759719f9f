use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::OcrCli;
use crate::config::Config;
use crate::error::{PdfTextError, Result};
use crate::ocr::OcrPipeline;
use crate::report::{FailureReport, OcrReport};

/// Run the OCR extractor. Every failure exits with status 1.
pub async fn run(cli: OcrCli) -> ExitCode {
    let Some(pdf_path) = cli.pdf_path else {
        return super::missing_argument("No PDF path provided");
    };

    match ocr(pdf_path, cli.lang, cli.config.as_deref()).await {
        Ok(report) => super::finish(&report, 0),
        Err(e) => {
            super::log_failure(&e);
            super::finish(&FailureReport::new(e.to_string()), 1)
        }
    }
}

async fn ocr(pdf_path: PathBuf, lang: Option<String>, config_path: Option<&Path>) -> Result<OcrReport> {
    // Checked before any tool lookup so a bad path never reports a missing dependency.
    if !pdf_path.exists() {
        return Err(PdfTextError::FileNotFound(pdf_path));
    }

    let config = Config::load(config_path).map_err(|e| PdfTextError::Config(format!("{e:#}")))?;
    let language = lang.unwrap_or_else(|| config.ocr.language.clone());
    tracing::info!("Running OCR on {} (lang: {})", pdf_path.display(), language);

    OcrPipeline::from_config(&config.ocr, &language)
        .run(&pdf_path)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_checked_first() {
        let err = ocr(
            PathBuf::from("/nonexistent/scan.pdf"),
            None,
            Some(Path::new("/nonexistent/config.toml")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "file_not_found");
        assert_eq!(err.to_string(), "File not found: /nonexistent/scan.pdf");
    }

    #[tokio::test]
    async fn test_bad_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let err = ocr(pdf, None, Some(dir.path().join("missing.toml").as_path()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
