use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::Recognizer;
use super::toolchain::{TESSERACT_INSTALL_HINT, spawn_error};
use crate::error::{PdfTextError, Result};

/// Runs the `tesseract` CLI on one image and returns the recognised text
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
    psm: u8,
}

impl TesseractRecognizer {
    pub fn new(program: PathBuf, language: impl Into<String>, psm: u8) -> Self {
        Self {
            program,
            language: language.into(),
            psm,
        }
    }

    fn args(&self, image: &Path) -> Vec<String> {
        vec![
            image.to_string_lossy().into_owned(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--psm".to_string(),
            self.psm.to_string(),
        ]
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    async fn recognize(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(self.args(image))
            .output()
            .await
            .map_err(|e| spawn_error(&self.program, e, TESSERACT_INSTALL_HINT))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfTextError::Tool {
                tool: "tesseract",
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}
