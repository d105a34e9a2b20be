//! Layered PDF text extraction
//!
//! Backends are tried in registry order by the [`Extractor`]. The primary
//! structural backend can hand pages without a text layer to an OCR engine.

mod coordinator;
mod registry;

#[cfg(all(test, any(feature = "lopdf-backend", feature = "pdf-extract-backend")))]
pub(crate) mod fixtures;

#[cfg(feature = "lopdf-backend")]
mod lopdf_backend;
#[cfg(feature = "ocr")]
mod ocr;
#[cfg(feature = "pdf-extract-backend")]
mod pdf_extract_backend;

use crate::error::BackendError;
use crate::source::DocumentBytes;

pub use coordinator::Extractor;
pub use registry::BackendRegistry;

#[cfg(feature = "lopdf-backend")]
pub use lopdf_backend::LopdfBackend;
#[cfg(feature = "ocr")]
pub use ocr::TesseractOcr;
#[cfg(feature = "pdf-extract-backend")]
pub use pdf_extract_backend::PdfExtractBackend;

/// Separator placed between page texts
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Text and page count produced by one successful backend attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    pub text: String,
    pub page_count: u32,
    pub backend: &'static str,
    /// Page numbers (1-based) whose text came from OCR
    pub ocr_pages: Vec<u32>,
}

impl ExtractionOutcome {
    pub fn empty(backend: &'static str) -> Self {
        Self {
            text: String::new(),
            page_count: 0,
            backend,
            ocr_pages: Vec::new(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A strategy that turns PDF bytes into text
pub trait TextBackend: Send + Sync {
    /// Backend identifier for logging
    fn name(&self) -> &'static str;

    /// Whether everything the backend needs is present
    fn is_available(&self) -> bool;

    /// Whether empty pages can be sent through OCR
    fn supports_ocr(&self) -> bool {
        false
    }

    fn extract(
        &self,
        document: &DocumentBytes,
        use_ocr: bool,
    ) -> Result<ExtractionOutcome, BackendError>;
}

/// An OCR engine for pages that have no text layer
pub trait PageOcr: Send + Sync {
    fn name(&self) -> &'static str;

    /// Stage a document once so that any number of its pages can be recognized
    fn open<'a>(
        &'a self,
        document: &DocumentBytes,
    ) -> Result<Box<dyn OcrSession + 'a>, BackendError>;
}

/// Page recognition over one staged document
pub trait OcrSession {
    /// Recognize the text of one page (1-based)
    fn recognize_page(&mut self, page_number: u32) -> Result<String, BackendError>;
}

/// Run a third-party parser, turning a panic into a backend failure
#[cfg(any(feature = "lopdf-backend", feature = "pdf-extract-backend"))]
pub(crate) fn guard_panics<T>(
    backend: &'static str,
    f: impl FnOnce() -> T,
) -> Result<T, BackendError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f))
        .map_err(|_| BackendError::Panicked { backend })
}
