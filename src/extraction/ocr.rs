use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use image::GenericImageView;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::{OcrSession, PageOcr};
use crate::config::OcrConfig;
use crate::error::BackendError;
use crate::source::DocumentBytes;

/// Page OCR through external tools: `pdftoppm` renders the page, `tesseract`
/// recognizes it.
///
/// Requires poppler-utils and Tesseract on the PATH (or configured paths):
/// - Linux: sudo apt-get install poppler-utils tesseract-ocr
/// - Mac: brew install poppler tesseract
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    /// Check for both tools, returning `None` if either is missing
    pub fn detect(config: &OcrConfig) -> Option<Self> {
        if !tool_runs(&config.pdftoppm_path, "-v") {
            warn!("pdftoppm not found at {:?}, OCR disabled", config.pdftoppm_path);
            return None;
        }
        if !tool_runs(&config.tesseract_path, "--version") {
            warn!("tesseract not found at {:?}, OCR disabled", config.tesseract_path);
            return None;
        }

        info!("OCR available (dpi={}, lang={})", config.dpi, config.language);
        Some(Self {
            config: config.clone(),
        })
    }

    /// Rasterize one page to PNG, returning the image path
    fn render_page(
        &self,
        pdf_path: &Path,
        page_number: u32,
        workdir: &Path,
    ) -> Result<PathBuf, BackendError> {
        let page = page_number.to_string();
        let prefix = workdir.join(format!("page-{}", page_number));

        let output = Command::new(&self.config.pdftoppm_path)
            .args(["-f", page.as_str(), "-l", page.as_str()])
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .args(["-png", "-singlefile"])
            .arg(pdf_path)
            .arg(&prefix)
            .output()?;

        if !output.status.success() {
            return Err(BackendError::ocr(format!(
                "pdftoppm failed for page {}: {}",
                page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(prefix.with_extension("png"))
    }

    /// Convert the raster to grayscale for recognition
    fn normalize_raster(
        &self,
        raster: &Path,
        page_number: u32,
        workdir: &Path,
    ) -> Result<PathBuf, BackendError> {
        let image = image::open(raster)
            .map_err(|e| BackendError::ocr(format!("failed to decode page raster: {}", e)))?;
        debug!("Rendered page raster {}x{}", image.width(), image.height());

        let gray_path = workdir.join(format!("page-{}-gray.png", page_number));
        image
            .to_luma8()
            .save(&gray_path)
            .map_err(|e| BackendError::ocr(format!("failed to write page raster: {}", e)))?;
        Ok(gray_path)
    }
}

impl PageOcr for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn open<'a>(
        &'a self,
        document: &DocumentBytes,
    ) -> Result<Box<dyn OcrSession + 'a>, BackendError> {
        let workdir = tempfile::tempdir()?;
        let pdf_path = workdir.path().join("document.pdf");
        fs::write(&pdf_path, document.as_bytes())?;
        debug!("Staged {} bytes for OCR in {:?}", document.len(), workdir.path());

        Ok(Box::new(TesseractSession {
            engine: self,
            workdir,
            pdf_path,
        }))
    }
}

/// A document written once to a private working directory
struct TesseractSession<'a> {
    engine: &'a TesseractOcr,
    workdir: TempDir,
    pdf_path: PathBuf,
}

impl OcrSession for TesseractSession<'_> {
    fn recognize_page(&mut self, page_number: u32) -> Result<String, BackendError> {
        let workdir = self.workdir.path();
        let raster = self.engine.render_page(&self.pdf_path, page_number, workdir)?;
        let image_path = self.engine.normalize_raster(&raster, page_number, workdir)?;

        let output = Command::new(&self.engine.config.tesseract_path)
            .arg(&image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.engine.config.language)
            .output()?;

        if !output.status.success() {
            return Err(BackendError::ocr(format!(
                "tesseract failed for page {}: {}",
                page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn tool_runs(program: &Path, version_flag: &str) -> bool {
    Command::new(program)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_missing_tools() {
        let config = OcrConfig {
            pdftoppm_path: PathBuf::from("/nonexistent/pdftoppm"),
            tesseract_path: PathBuf::from("/nonexistent/tesseract"),
            ..OcrConfig::default()
        };
        assert!(TesseractOcr::detect(&config).is_none());
    }

    #[test]
    fn test_tool_runs_reports_missing_binary() {
        assert!(!tool_runs(Path::new("/nonexistent/tool"), "--version"));
    }

    fn missing_tools() -> TesseractOcr {
        TesseractOcr {
            config: OcrConfig {
                pdftoppm_path: PathBuf::from("/nonexistent/pdftoppm"),
                tesseract_path: PathBuf::from("/nonexistent/tesseract"),
                ..OcrConfig::default()
            },
        }
    }

    #[test]
    fn test_session_survives_page_failures() {
        let engine = missing_tools();
        let document = DocumentBytes::from(&b"%PDF-1.4 staged"[..]);
        let mut session = engine.open(&document).unwrap();

        assert!(matches!(session.recognize_page(1), Err(BackendError::Io(_))));
        assert!(matches!(session.recognize_page(2), Err(BackendError::Io(_))));
    }
}
