use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Highest score a document can receive.
pub const MAX_SCORE: f64 = 10.0;

/// Scores at or above this value pass.
pub const PASS_THRESHOLD: f64 = 6.0;

/// Rubric vocabulary counted by the analyzer.
pub const DEFAULT_KEYWORDS: [&str; 8] = [
    "analysis",
    "evidence",
    "explain",
    "justify",
    "solution",
    "conclusion",
    "hypothesis",
    "method",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricConfig {
    pub keywords: Vec<String>,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl RubricConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.keywords.is_empty(), "rubric.keywords must not be empty");
        ensure!(
            self.keywords.iter().all(|k| !k.trim().is_empty()),
            "rubric.keywords must not contain blank entries"
        );
        Ok(())
    }
}

/// Settings for the page rasterizer and OCR engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub dpi: u32,
    pub language: String,
    pub pdftoppm_path: PathBuf,
    pub tesseract_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 200,
            language: "eng".to_string(),
            pdftoppm_path: PathBuf::from("pdftoppm"),
            tesseract_path: PathBuf::from("tesseract"),
        }
    }
}

impl OcrConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (50..=1200).contains(&self.dpi),
            "ocr.dpi must be within [50,1200], got {}",
            self.dpi
        );
        ensure!(!self.language.trim().is_empty(), "ocr.language must not be empty");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    pub rubric: RubricConfig,
    pub ocr: OcrConfig,
}

impl GraderConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: GraderConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Use the file at `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.rubric.validate()?;
        self.ocr.validate()?;
        Ok(())
    }
}

impl fmt::Display for GraderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "keywords={}, ocr(dpi={}, lang={})",
            self.rubric.keywords.len(),
            self.ocr.dpi,
            self.ocr.language
        )
    }
}
