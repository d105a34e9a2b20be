use tracing::{debug, info};

use crate::analysis::LexicalAnalyzer;
use crate::config::GraderConfig;
use crate::error::{ExtractionUnavailable, GradeError};
use crate::extraction::{BackendRegistry, ExtractionOutcome, Extractor};
use crate::report::GradeResult;
use crate::scoring;
use crate::source::{DocumentBytes, PdfSource};

/// Extraction and heuristic scoring for one document at a time.
///
/// Holds only read-only state, so one grader can be shared across threads
/// grading different documents.
pub struct Grader {
    analyzer: LexicalAnalyzer,
    extractor: Extractor,
}

impl Grader {
    /// Detect available backends and build a grader from `config`
    pub fn new(config: &GraderConfig) -> Self {
        Self::with_registry(config, BackendRegistry::detect(config))
    }

    pub fn with_registry(config: &GraderConfig, registry: BackendRegistry) -> Self {
        Self {
            analyzer: LexicalAnalyzer::new(&config.rubric),
            extractor: Extractor::new(registry),
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        self.extractor.registry()
    }

    pub fn extract(
        &self,
        document: &DocumentBytes,
        use_ocr: bool,
    ) -> Result<ExtractionOutcome, ExtractionUnavailable> {
        self.extractor.extract(document, use_ocr)
    }

    /// Score already extracted text
    pub fn grade_text(&self, text: &str) -> GradeResult {
        let analysis = self.analyzer.analyze(text);
        debug!("Analysis: {:?}", analysis.metrics);

        let card = scoring::score(&analysis.metrics);
        GradeResult::assemble(analysis, card)
    }

    pub fn grade_document(
        &self,
        document: &DocumentBytes,
        use_ocr: bool,
    ) -> Result<GradeResult, ExtractionUnavailable> {
        let outcome = self.extract(document, use_ocr)?;
        let result = self.grade_text(&outcome.text);
        info!(
            "Graded {} page document: {:.2}/{} ({})",
            outcome.page_count,
            result.score(),
            result.max_score(),
            if result.passed() { "passed" } else { "not passed" }
        );
        Ok(result)
    }

    /// Load `source` from a path or buffer and grade it
    pub fn grade(&self, source: impl Into<PdfSource>, use_ocr: bool) -> Result<GradeResult, GradeError> {
        let document = source.into().load()?;
        Ok(self.grade_document(&document, use_ocr)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::extraction::TextBackend;

    struct FixedText(&'static str);

    impl TextBackend for FixedText {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn extract(&self, _: &DocumentBytes, _: bool) -> Result<ExtractionOutcome, BackendError> {
            Ok(ExtractionOutcome {
                text: self.0.to_string(),
                page_count: 1,
                backend: "fixed",
                ocr_pages: Vec::new(),
            })
        }
    }

    fn grader_with(text: &'static str) -> Grader {
        let registry = BackendRegistry::from_backends(vec![Box::new(FixedText(text))]);
        Grader::with_registry(&GraderConfig::default(), registry)
    }

    #[test]
    fn test_grade_bytes() {
        let grader = grader_with("analysis evidence explain");
        let result = grader.grade(&b"%PDF-1.4"[..], false).unwrap();

        assert_eq!(result.breakdown().keyword_hits, 3);
        // length +1, keywords +3, readability and sentence length +0
        assert_eq!(result.score(), 4.0);
        assert!(!result.passed());
    }

    #[test]
    fn test_no_backends_yields_no_result() {
        let grader = Grader::with_registry(&GraderConfig::default(), BackendRegistry::empty());
        let err = grader.grade(&b"%PDF-1.4"[..], false).unwrap_err();
        assert!(matches!(err, GradeError::Extraction(_)));
    }

    #[test]
    fn test_grade_text_is_deterministic() {
        let grader = grader_with("");
        let text = "The solution follows the method. Each step is justified.";
        assert_eq!(grader.grade_text(text), grader.grade_text(text));
    }

    #[test]
    fn test_grader_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Grader>();
    }
}
