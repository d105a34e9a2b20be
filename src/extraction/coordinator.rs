use tracing::{debug, info, warn};

use super::{BackendRegistry, ExtractionOutcome};
use crate::error::{BackendError, ExtractionUnavailable, FailedAttempt};
use crate::source::DocumentBytes;

/// Tries each registered backend in rank order until one succeeds
pub struct Extractor {
    registry: BackendRegistry,
}

impl Extractor {
    pub fn new(registry: BackendRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn extract(
        &self,
        document: &DocumentBytes,
        use_ocr: bool,
    ) -> Result<ExtractionOutcome, ExtractionUnavailable> {
        if use_ocr && !self.registry.ocr_available() {
            info!("OCR requested but no OCR-capable backend is available");
        }

        let mut attempts = Vec::new();

        for backend in self.registry.backends() {
            let name = backend.name();
            if !backend.is_available() {
                debug!("Skipping unavailable backend {}", name);
                attempts.push(FailedAttempt {
                    backend: name,
                    error: BackendError::Unavailable { backend: name },
                });
                continue;
            }

            match backend.extract(document, use_ocr) {
                Ok(outcome) => {
                    info!(
                        "Extracted {} characters from {} pages with {}",
                        outcome.text.len(),
                        outcome.page_count,
                        name
                    );
                    return Ok(outcome);
                }
                Err(e) => {
                    warn!("{} extraction failed, falling back: {}", name, e);
                    attempts.push(FailedAttempt {
                        backend: name,
                        error: e,
                    });
                }
            }
        }

        Err(ExtractionUnavailable::new(attempts))
    }
}
