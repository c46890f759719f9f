use anyhow::{Context, Result};
use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use std::path::Path;

use super::layout::{Glyph, PageBox, render_page};
use crate::config::LayoutConfig;

/// Per-page text of a PDF
#[derive(Debug, Clone)]
pub struct ExtractedPages {
    pub page_count: usize,
    pub texts: Vec<String>,
}

/// Extract layout-preserved text from every page of a PDF file
pub fn extract_pages(path: &Path, layout: &LayoutConfig) -> Result<ExtractedPages> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF file: {}", path.display()))?;

    extract_pages_from_mem(&bytes, layout)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))
}

pub fn extract_pages_from_mem(bytes: &[u8], layout: &LayoutConfig) -> Result<ExtractedPages> {
    let mut doc = Document::load_mem(bytes).map_err(|e| anyhow::anyhow!("{e}"))?;
    if doc.is_encrypted() {
        doc.decrypt("")
            .map_err(|e| anyhow::anyhow!("Failed to decrypt PDF: {e}"))?;
    }

    let page_count = doc.get_pages().len();
    tracing::debug!("Loaded PDF with {} page(s)", page_count);

    let mut collector = GlyphCollector::default();
    pdf_extract::output_doc(&doc, &mut collector).context("Failed to walk page content")?;

    let texts = collector
        .pages
        .iter()
        .map(|page| render_page(&page.glyphs, page.bounds, layout))
        .collect();

    Ok(ExtractedPages { page_count, texts })
}

struct PageGlyphs {
    bounds: PageBox,
    top: f64,
    glyphs: Vec<Glyph>,
}

/// Records glyph positions instead of writing text, so layout can be
/// rebuilt on a grid afterwards.
#[derive(Default)]
struct GlyphCollector {
    pages: Vec<PageGlyphs>,
    current: Option<PageGlyphs>,
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.current = Some(PageGlyphs {
            bounds: PageBox::new(
                media_box.llx,
                media_box.urx - media_box.llx,
                media_box.ury - media_box.lly,
            ),
            top: media_box.ury,
            glyphs: Vec::new(),
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let Some(page) = self.current.as_mut() else {
            return Ok(());
        };

        // `width` is the advance in text space per unit of font size; the
        // length of trm's x axis maps text space onto the page.
        let scale = trm.m11.hypot(trm.m12);
        page.glyphs.push(Glyph::new(
            char,
            trm.m31,
            page.top - trm.m32,
            width * font_size * scale,
        ));
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}
