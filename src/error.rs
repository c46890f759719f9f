use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the extraction tools.
///
/// Only the `Display` text of an error reaches the JSON output; the variant is
/// kept for logging so distinct failure modes stay visible on stderr.
#[derive(Debug, Error)]
pub enum PdfTextError {
    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing dependency: {detail}. Install with: {hint}")]
    MissingDependency { detail: String, hint: &'static str },

    #[error("{0}")]
    Pdf(String),

    #[error("{tool} failed: {message}")]
    Tool { tool: &'static str, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),
}

impl PdfTextError {
    /// Short, stable name of the failure class for log records.
    pub fn kind(&self) -> &'static str {
        match self {
            PdfTextError::MissingArgument(_) => "missing_argument",
            PdfTextError::FileNotFound(_) => "file_not_found",
            PdfTextError::MissingDependency { .. } => "missing_dependency",
            PdfTextError::Pdf(_) => "pdf",
            PdfTextError::Tool { .. } => "tool",
            PdfTextError::Io(_) => "io",
            PdfTextError::Config(_) => "config",
            PdfTextError::Usage(_) => "usage",
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfTextError>;
