use serde::{Deserialize, Serialize};

use crate::analysis::{round2, AnalysisMetrics, TextAnalysis};
use crate::config::{MAX_SCORE, PASS_THRESHOLD};
use crate::scoring::ScoreCard;

/// Final grade for one document
#[derive(Debug, Clone, PartialEq)]
pub struct GradeResult {
    score: f64,
    rationale: Vec<String>,
    breakdown: AnalysisMetrics,
    text_preview: String,
}

impl GradeResult {
    pub fn assemble(analysis: TextAnalysis, card: ScoreCard) -> Self {
        Self {
            score: card.score.clamp(0.0, MAX_SCORE),
            rationale: card.rationale,
            breakdown: analysis.metrics,
            text_preview: analysis.preview,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn max_score(&self) -> f64 {
        MAX_SCORE
    }

    pub fn passed(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }

    pub fn rationale(&self) -> &[String] {
        &self.rationale
    }

    pub fn summary(&self) -> String {
        self.rationale.join("; ")
    }

    pub fn breakdown(&self) -> &AnalysisMetrics {
        &self.breakdown
    }

    pub fn text_preview(&self) -> &str {
        &self.text_preview
    }
}

/// Serialized form of a [`GradeResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub score: f64,
    pub max_score: f64,
    pub passed: bool,
    pub summary: String,
    pub breakdown: AnalysisMetrics,
    pub raw_text_preview: String,
}

impl GradeReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&GradeResult> for GradeReport {
    fn from(result: &GradeResult) -> Self {
        Self {
            score: round2(result.score()),
            max_score: result.max_score(),
            passed: result.passed(),
            summary: result.summary(),
            breakdown: result.breakdown().clone(),
            raw_text_preview: result.text_preview().to_string(),
        }
    }
}
