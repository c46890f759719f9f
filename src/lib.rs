//! Layout-aware PDF text extraction and Tesseract OCR, reported as JSON.
//!
//! The `extract-pdf` and `ocr-pdf` binaries are thin wrappers around
//! [`cli::commands`]; the pieces they use are public so the same pipelines
//! can be driven from other code.

pub mod cli;
pub mod config;
pub mod error;
pub mod ocr;
pub mod parser;
pub mod quality;
pub mod report;

pub use error::{PdfTextError, Result};
pub use ocr::OcrPipeline;
pub use report::{ExtractReport, FailureReport, OcrReport};
