mod poppler;
mod tesseract;
pub mod toolchain;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::OcrConfig;
use crate::error::Result;
use crate::report::{OcrReport, join_ocr_pages};

pub use poppler::PopplerRasterizer;
pub use tesseract::TesseractRecognizer;
pub use toolchain::Toolchain;

/// Converts PDF pages into images for recognition
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Render every page of `pdf_path` into `out_dir`, returning the image
    /// paths in page order.
    async fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>>;

    fn name(&self) -> &'static str;
}

/// Recognises the text on a single page image
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Rasterize, recognise page by page, then score the joined text
pub struct OcrPipeline {
    rasterizer: Box<dyn Rasterizer>,
    recognizer: Box<dyn Recognizer>,
}

impl OcrPipeline {
    pub fn new(rasterizer: Box<dyn Rasterizer>, recognizer: Box<dyn Recognizer>) -> Self {
        Self {
            rasterizer,
            recognizer,
        }
    }

    /// Build the Poppler + Tesseract pipeline for `language`
    pub fn from_config(config: &OcrConfig, language: &str) -> Self {
        let toolchain = Toolchain::resolve(config);
        Self::new(
            Box::new(PopplerRasterizer::new(
                &toolchain,
                config.dpi,
                config.thread_count,
            )),
            Box::new(TesseractRecognizer::new(
                toolchain.tesseract.clone(),
                language,
                config.psm,
            )),
        )
    }

    pub async fn run(&self, pdf_path: &Path) -> Result<OcrReport> {
        let workdir = tempfile::Builder::new().prefix("pdftext-ocr-").tempdir()?;
        tracing::debug!(
            "Running {} + {} in {}",
            self.rasterizer.name(),
            self.recognizer.name(),
            workdir.path().display()
        );

        let images = self.rasterizer.rasterize(pdf_path, workdir.path()).await?;
        let total = images.len();

        let mut pages = Vec::with_capacity(total);
        for (i, image) in images.iter().enumerate() {
            tracing::debug!("Recognising page {}/{}", i + 1, total);
            pages.push(self.recognizer.recognize(image).await?);
        }

        let report = OcrReport::new(join_ocr_pages(&pages), total);
        tracing::info!(
            "OCR finished: {} page(s), {} word(s), quality {}",
            report.pages,
            report.words,
            report.quality
        );
        Ok(report)
    }
}
