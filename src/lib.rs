// Library exports for the grading binaries and callers embedding the engine

pub mod analysis;
pub mod config;
pub mod error;
pub mod extraction;
pub mod grader;
pub mod report;
pub mod scoring;
pub mod source;

// Re-export commonly used types
pub use analysis::{AnalysisMetrics, LexicalAnalyzer};
pub use config::{GraderConfig, MAX_SCORE, PASS_THRESHOLD};
pub use error::{BackendError, ExtractionUnavailable, GradeError};
pub use extraction::{BackendRegistry, ExtractionOutcome, Extractor, TextBackend};
pub use grader::Grader;
pub use report::{GradeReport, GradeResult};
pub use source::{DocumentBytes, PdfSource};
