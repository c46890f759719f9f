use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::OcrConfig;
use crate::error::PdfTextError;

/// Default install location of the Tesseract Windows installer.
pub const TESSERACT_WINDOWS_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

pub const POPPLER_INSTALL_HINT: &str =
    "poppler-utils (pdfinfo, pdftoppm), or unpack a poppler-* release next to the binaries";
pub const TESSERACT_INSTALL_HINT: &str = "tesseract-ocr plus the traineddata for each language";

/// Locations of the external programs used by the OCR pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Toolchain {
    /// Directory holding the Poppler binaries, `None` to use `PATH`
    pub poppler_dir: Option<PathBuf>,
    /// Tesseract executable, a bare name when taken from `PATH`
    pub tesseract: PathBuf,
}

impl Toolchain {
    /// Resolve tool locations from configuration and the local install layout.
    pub fn resolve(config: &OcrConfig) -> Self {
        let poppler_dir = config
            .poppler_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| install_base().and_then(|base| find_local_poppler(&base)));

        let tesseract = config
            .tesseract_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| {
                let platform = PathBuf::from(TESSERACT_WINDOWS_PATH);
                platform.exists().then_some(platform)
            })
            .unwrap_or_else(|| PathBuf::from("tesseract"));

        match &poppler_dir {
            Some(dir) => tracing::info!("Using Poppler from {}", dir.display()),
            None => tracing::debug!("Using Poppler from PATH"),
        }
        tracing::debug!("Using Tesseract at {}", tesseract.display());

        Self {
            poppler_dir,
            tesseract,
        }
    }

    pub fn pdfinfo(&self) -> PathBuf {
        self.poppler_tool("pdfinfo")
    }

    pub fn pdftoppm(&self) -> PathBuf {
        self.poppler_tool("pdftoppm")
    }

    fn poppler_tool(&self, name: &str) -> PathBuf {
        let file_name = format!("{name}{}", std::env::consts::EXE_SUFFIX);
        match &self.poppler_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Root of the install layout: the parent of the directory holding the
/// running executable (binaries live in `<root>/bin` or `<root>/target/*`).
pub fn install_base() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.parent()?.to_path_buf())
}

/// Find the first `poppler-*/Library/bin` directory directly under `base`.
pub fn find_local_poppler(base: &Path) -> Option<PathBuf> {
    WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter(|e| e.file_name().to_string_lossy().starts_with("poppler-"))
        .map(|e| e.path().join("Library").join("bin"))
        .find(|bin| bin.is_dir())
}

/// Map a failure to start an external program onto the error reported to users.
pub(crate) fn spawn_error(program: &Path, err: io::Error, hint: &'static str) -> PdfTextError {
    if err.kind() == io::ErrorKind::NotFound {
        PdfTextError::MissingDependency {
            detail: format!("{}: {}", program.display(), err),
            hint,
        }
    } else {
        PdfTextError::Io(err)
    }
}
