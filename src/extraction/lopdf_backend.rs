use lopdf::Document;
use tracing::{debug, info, warn};

use super::{guard_panics, ExtractionOutcome, OcrSession, PageOcr, TextBackend, PAGE_SEPARATOR};
use crate::error::BackendError;
use crate::source::DocumentBytes;

const NAME: &str = "lopdf";

/// Primary structural backend. Extracts the text layer page by page and
/// sends pages without one to the OCR engine when requested.
pub struct LopdfBackend {
    ocr: Option<Box<dyn PageOcr>>,
}

impl LopdfBackend {
    pub fn new(ocr: Option<Box<dyn PageOcr>>) -> Self {
        Self { ocr }
    }

    pub fn without_ocr() -> Self {
        Self { ocr: None }
    }
}

/// Opens the OCR session on the first page that needs it
struct PageRecognizer<'a> {
    ocr: &'a dyn PageOcr,
    document: &'a DocumentBytes,
    session: Option<Box<dyn OcrSession + 'a>>,
    disabled: bool,
}

impl<'a> PageRecognizer<'a> {
    fn new(ocr: &'a dyn PageOcr, document: &'a DocumentBytes) -> Self {
        Self {
            ocr,
            document,
            session: None,
            disabled: false,
        }
    }

    fn recognize(&mut self, page_number: u32) -> Option<String> {
        if self.disabled {
            return None;
        }
        info!("Page {} has no text layer, running {} OCR", page_number, self.ocr.name());

        if self.session.is_none() {
            match self.ocr.open(self.document) {
                Ok(session) => self.session = Some(session),
                Err(e) => {
                    warn!("Could not prepare document for OCR: {}", e);
                    self.disabled = true;
                    return None;
                }
            }
        }
        let session = self.session.as_mut()?;

        match session.recognize_page(page_number) {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!("OCR produced no text for page {}", page_number);
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                warn!("OCR failed for page {}: {}", page_number, e);
                None
            }
        }
    }
}

impl TextBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    fn supports_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    fn extract(
        &self,
        document: &DocumentBytes,
        use_ocr: bool,
    ) -> Result<ExtractionOutcome, BackendError> {
        let pdf = guard_panics(NAME, || Document::load_mem(document.as_bytes()))?
            .map_err(|e| BackendError::parse(NAME, e))?;

        let pages = pdf.get_pages();
        let page_count = pages.len() as u32;
        if page_count == 0 {
            debug!("Document has no pages");
            return Ok(ExtractionOutcome::empty(NAME));
        }

        let mut texts: Vec<String> = Vec::new();
        let mut ocr_pages = Vec::new();
        let mut recognizer = match self.ocr.as_deref() {
            Some(ocr) if use_ocr => Some(PageRecognizer::new(ocr, document)),
            _ => None,
        };

        for &page_number in pages.keys() {
            let raw = guard_panics(NAME, || pdf.extract_text(&[page_number]))?
                .map_err(|e| BackendError::parse(NAME, format!("page {}: {}", page_number, e)))?;

            let content = raw.trim();
            if !content.is_empty() {
                texts.push(content.to_string());
                continue;
            }

            if let Some(text) = recognizer.as_mut().and_then(|r| r.recognize(page_number)) {
                texts.push(text);
                ocr_pages.push(page_number);
            }
        }

        debug!(
            "Extracted text from {}/{} pages ({} via OCR)",
            texts.len(),
            page_count,
            ocr_pages.len()
        );

        Ok(ExtractionOutcome {
            text: texts.join(PAGE_SEPARATOR),
            page_count,
            backend: NAME,
            ocr_pages,
        })
    }
}
