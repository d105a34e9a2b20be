use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::GradeError;

/// Raw PDF content, owned and read-only once constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBytes {
    bytes: Vec<u8>,
}

impl DocumentBytes {
    /// Read a PDF from disk
    pub fn from_path(path: &Path) -> Result<Self, GradeError> {
        let bytes = fs::read(path).map_err(|source| GradeError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded {} bytes from {:?}", bytes.len(), path);
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for DocumentBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for DocumentBytes {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

/// Anything the grader accepts as input
#[derive(Debug, Clone)]
pub enum PdfSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl PdfSource {
    pub fn load(self) -> Result<DocumentBytes, GradeError> {
        match self {
            PdfSource::Path(path) => DocumentBytes::from_path(&path),
            PdfSource::Bytes(bytes) => Ok(DocumentBytes::from(bytes)),
        }
    }
}

impl From<PathBuf> for PdfSource {
    fn from(path: PathBuf) -> Self {
        PdfSource::Path(path)
    }
}

impl From<&Path> for PdfSource {
    fn from(path: &Path) -> Self {
        PdfSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for PdfSource {
    fn from(bytes: Vec<u8>) -> Self {
        PdfSource::Bytes(bytes)
    }
}

impl From<&[u8]> for PdfSource {
    fn from(bytes: &[u8]) -> Self {
        PdfSource::Bytes(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_bytes() {
        let doc = PdfSource::from(&b"%PDF-1.4"[..]).load().unwrap();
        assert_eq!(doc.as_bytes(), b"%PDF-1.4");
        assert_eq!(doc.len(), 8);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.7 body").unwrap();

        let doc = PdfSource::from(file.path()).load().unwrap();
        assert_eq!(doc.as_bytes(), b"%PDF-1.7 body");
    }

    #[test]
    fn test_missing_path_is_load_error() {
        let err = PdfSource::from(PathBuf::from("/nonexistent/submission.pdf"))
            .load()
            .unwrap_err();
        assert!(matches!(err, GradeError::Load { .. }));
    }
}
