use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::process::Command;
use walkdir::WalkDir;

use super::Rasterizer;
use super::toolchain::{POPPLER_INSTALL_HINT, Toolchain, spawn_error};
use crate::error::{PdfTextError, Result};

/// `pdftoppm` names its output `<prefix>-<page>.jpg`, zero-padding the page.
static PAGE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)\.jpg$").expect("valid page image pattern"));

/// Renders PDF pages to JPEG with Poppler's `pdftoppm`
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
    dpi: u32,
    thread_count: usize,
}

impl PopplerRasterizer {
    pub fn new(toolchain: &Toolchain, dpi: u32, thread_count: usize) -> Self {
        Self {
            pdfinfo: toolchain.pdfinfo(),
            pdftoppm: toolchain.pdftoppm(),
            dpi,
            thread_count: thread_count.max(1),
        }
    }

    async fn page_count(&self, pdf_path: &Path) -> Result<usize> {
        let output = Command::new(&self.pdfinfo)
            .arg(pdf_path)
            .output()
            .await
            .map_err(|e| spawn_error(&self.pdfinfo, e, POPPLER_INSTALL_HINT))?;

        if !output.status.success() {
            return Err(PdfTextError::Tool {
                tool: "pdfinfo",
                message: failure_message(&output),
            });
        }

        parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            PdfTextError::Tool {
                tool: "pdfinfo",
                message: format!("no page count reported for {}", pdf_path.display()),
            }
        })
    }

    async fn render_range(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
        chunk: usize,
        (first, last): (usize, usize),
    ) -> Result<()> {
        let prefix = out_dir.join(format!("chunk{chunk}"));
        tracing::debug!("Rasterizing pages {}-{} at {} DPI", first, last, self.dpi);

        let output = Command::new(&self.pdftoppm)
            .arg("-jpeg")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(first.to_string())
            .arg("-l")
            .arg(last.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .await
            .map_err(|e| spawn_error(&self.pdftoppm, e, POPPLER_INSTALL_HINT))?;

        if !output.status.success() {
            return Err(PdfTextError::Tool {
                tool: "pdftoppm",
                message: failure_message(&output),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Rasterizer for PopplerRasterizer {
    async fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let pages = self.page_count(pdf_path).await?;
        tracing::info!("Rasterizing {} page(s) of {}", pages, pdf_path.display());

        let jobs = page_ranges(pages, self.thread_count)
            .into_iter()
            .enumerate()
            .map(|(chunk, range)| self.render_range(pdf_path, out_dir, chunk, range));
        futures::future::try_join_all(jobs).await?;

        let images = collect_page_images(out_dir);
        if images.len() != pages {
            return Err(PdfTextError::Tool {
                tool: "pdftoppm",
                message: format!("expected {} page image(s), found {}", pages, images.len()),
            });
        }
        Ok(images)
    }

    fn name(&self) -> &'static str {
        "pdftoppm"
    }
}

fn failure_message(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

/// Read the `Pages:` line of `pdfinfo` output
fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}

/// Split `1..=pages` into at most `workers` contiguous ranges whose sizes
/// differ by at most one, larger ranges first.
fn page_ranges(pages: usize, workers: usize) -> Vec<(usize, usize)> {
    let workers = workers.clamp(1, pages.max(1));
    let base = pages / workers;
    let mut remainder = pages % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut first = 1;
    for _ in 0..workers {
        let mut size = base;
        if remainder > 0 {
            size += 1;
            remainder -= 1;
        }
        if size == 0 {
            break;
        }
        ranges.push((first, first + size - 1));
        first += size;
    }
    ranges
}

/// Rendered images in `dir`, ordered by page number
fn collect_page_images(dir: &Path) -> Vec<PathBuf> {
    let mut pages: Vec<(usize, PathBuf)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let page = PAGE_IMAGE.captures(&name)?.get(1)?.as_str().parse().ok()?;
            Some((page, e.into_path()))
        })
        .collect();

    pages.sort_by_key(|(page, _)| *page);
    pages.into_iter().map(|(_, path)| path).collect()
}
