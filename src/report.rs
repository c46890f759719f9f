use serde::Serialize;
use std::io::{self, Write};

use crate::quality::{
    EXTRACT_LONG_WORD_LEN, OCR_LONG_WORD_LEN, WordStats, ocr_quality_score, round2,
};

/// Tag identifying the OCR pipeline in its JSON record.
pub const OCR_METHOD: &str = "tesseract_ocr";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextQuality {
    pub avg_word_length: f64,
    pub long_word_count: usize,
    pub word_count: usize,
}

/// Successful text-extractor record
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub success: bool,
    pub text: String,
    pub pages: usize,
    pub chars: usize,
    pub quality: TextQuality,
}

impl ExtractReport {
    pub fn new(text: String, pages: usize) -> Self {
        let stats = WordStats::compute(&text, EXTRACT_LONG_WORD_LEN);
        Self {
            success: true,
            chars: text.chars().count(),
            pages,
            quality: TextQuality {
                avg_word_length: round2(stats.avg_word_length()),
                long_word_count: stats.long_word_count,
                word_count: stats.word_count,
            },
            text,
        }
    }
}

/// Successful OCR record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrReport {
    pub success: bool,
    pub text: String,
    pub pages: usize,
    pub chars: usize,
    pub words: usize,
    pub avg_word_len: f64,
    pub quality: f64,
    pub method: &'static str,
}

impl OcrReport {
    pub fn new(text: String, pages: usize) -> Self {
        let stats = WordStats::compute(&text, OCR_LONG_WORD_LEN);
        Self {
            success: true,
            chars: text.chars().count(),
            pages,
            words: stats.word_count,
            avg_word_len: round2(stats.avg_word_length()),
            quality: ocr_quality_score(&stats),
            method: OCR_METHOD,
            text,
        }
    }
}

/// Failure record. The text extractor also echoes an empty `text` field.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl FailureReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            text: None,
        }
    }

    pub fn with_empty_text(mut self) -> Self {
        self.text = Some(String::new());
        self
    }
}

/// Write a record as a single JSON line to stdout
pub fn emit<T: Serialize>(record: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_line(&mut handle, record)?;
    handle.flush()
}

fn write_line<W: Write, T: Serialize>(writer: &mut W, record: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writeln!(writer)
}

/// Join page texts with a blank line, skipping pages that produced nothing.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .filter(|p| !p.as_ref().is_empty())
        .map(|p| p.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prefix every page with a `--- Page N ---` marker and join with blank lines.
pub fn join_ocr_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("--- Page {} ---\n{}", i + 1, text.as_ref()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
