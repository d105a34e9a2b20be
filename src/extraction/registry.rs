use tracing::info;

use super::TextBackend;
use crate::config::GraderConfig;

/// Ranked extraction backends, resolved once at startup
pub struct BackendRegistry {
    backends: Vec<Box<dyn TextBackend>>,
}

impl BackendRegistry {
    /// Register every backend compiled into this build, primary first
    pub fn detect(config: &GraderConfig) -> Self {
        let backends = primary_backend(config)
            .into_iter()
            .chain(secondary_backend())
            .collect();

        let registry = Self { backends };
        info!(
            "Extraction backends: [{}] (OCR {})",
            registry.available_names().join(", "),
            if registry.ocr_available() { "available" } else { "unavailable" }
        );
        registry
    }

    /// Build a registry from an explicit, already ranked list
    pub fn from_backends(backends: Vec<Box<dyn TextBackend>>) -> Self {
        Self { backends }
    }

    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    pub fn backends(&self) -> impl Iterator<Item = &dyn TextBackend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    pub fn available_names(&self) -> Vec<&'static str> {
        self.backends()
            .filter(|b| b.is_available())
            .map(|b| b.name())
            .collect()
    }

    pub fn has_available(&self) -> bool {
        self.backends().any(|b| b.is_available())
    }

    pub fn ocr_available(&self) -> bool {
        self.backends().any(|b| b.is_available() && b.supports_ocr())
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(feature = "lopdf-backend")]
fn primary_backend(config: &GraderConfig) -> Option<Box<dyn TextBackend>> {
    Some(Box::new(super::LopdfBackend::new(detect_ocr(config))))
}

#[cfg(not(feature = "lopdf-backend"))]
fn primary_backend(_config: &GraderConfig) -> Option<Box<dyn TextBackend>> {
    None
}

#[cfg(feature = "pdf-extract-backend")]
fn secondary_backend() -> Option<Box<dyn TextBackend>> {
    Some(Box::new(super::PdfExtractBackend::new()))
}

#[cfg(not(feature = "pdf-extract-backend"))]
fn secondary_backend() -> Option<Box<dyn TextBackend>> {
    None
}

#[cfg(all(feature = "lopdf-backend", feature = "ocr"))]
fn detect_ocr(config: &GraderConfig) -> Option<Box<dyn super::PageOcr>> {
    super::TesseractOcr::detect(&config.ocr).map(|ocr| Box::new(ocr) as Box<dyn super::PageOcr>)
}

#[cfg(all(feature = "lopdf-backend", not(feature = "ocr")))]
fn detect_ocr(_config: &GraderConfig) -> Option<Box<dyn super::PageOcr>> {
    None
}
