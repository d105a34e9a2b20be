//! Error types for extraction and grading.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single extraction backend. Recovered by falling back to the
/// next backend in the registry.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend is not compiled in or its tools are missing.
    #[error("{backend} backend is not available")]
    Unavailable { backend: &'static str },

    /// The backend could not parse the document.
    #[error("{backend} failed to parse document: {message}")]
    Parse {
        backend: &'static str,
        message: String,
    },

    /// The underlying parser panicked.
    #[error("{backend} panicked while extracting text")]
    Panicked { backend: &'static str },

    /// Page rendering or recognition failed.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    pub fn parse(backend: &'static str, err: impl fmt::Display) -> Self {
        BackendError::Parse {
            backend,
            message: err.to_string(),
        }
    }

    pub fn ocr(msg: impl Into<String>) -> Self {
        BackendError::Ocr(msg.into())
    }
}

/// One failed backend attempt, kept for diagnostics.
#[derive(Debug)]
pub struct FailedAttempt {
    pub backend: &'static str,
    pub error: BackendError,
}

/// No extraction backend could produce text for the document.
#[derive(Error, Debug)]
#[error("No PDF extraction backend available{}", describe_attempts(.attempts))]
pub struct ExtractionUnavailable {
    attempts: Vec<FailedAttempt>,
}

impl ExtractionUnavailable {
    pub fn new(attempts: Vec<FailedAttempt>) -> Self {
        Self { attempts }
    }

    pub fn attempts(&self) -> &[FailedAttempt] {
        &self.attempts
    }

    /// Error reported by the last backend tried
    pub fn last_cause(&self) -> Option<&BackendError> {
        self.attempts.last().map(|a| &a.error)
    }
}

fn describe_attempts(attempts: &[FailedAttempt]) -> String {
    if attempts.is_empty() {
        return " (no backends registered)".to_string();
    }
    let causes: Vec<String> = attempts
        .iter()
        .map(|a| format!("{}: {}", a.backend, a.error))
        .collect();
    format!(" ({})", causes.join("; "))
}

/// Errors surfaced by the grading pipeline.
#[derive(Error, Debug)]
pub enum GradeError {
    #[error("Failed to read PDF {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractionUnavailable),
}
