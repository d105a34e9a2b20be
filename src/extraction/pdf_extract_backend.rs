use tracing::debug;

use super::{guard_panics, ExtractionOutcome, TextBackend, PAGE_SEPARATOR};
use crate::error::BackendError;
use crate::source::DocumentBytes;

const NAME: &str = "pdf-extract";

/// Secondary structural backend. Has no page rendering, so it never runs OCR.
#[derive(Debug, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extract(
        &self,
        document: &DocumentBytes,
        _use_ocr: bool,
    ) -> Result<ExtractionOutcome, BackendError> {
        let bytes = document.as_bytes();
        let pages = guard_panics(NAME, || pdf_extract::extract_text_from_mem_by_pages(bytes))?
            .map_err(|e| BackendError::parse(NAME, e))?;

        let page_count = pages.len() as u32;
        let text = join_pages(&pages);
        debug!("Extracted {} pages with {}", page_count, NAME);

        Ok(ExtractionOutcome {
            text,
            page_count,
            backend: NAME,
            ocr_pages: Vec::new(),
        })
    }
}

/// Trimmed non-empty page texts separated by a blank line
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}
