//! Threshold-band scoring of analysis metrics.
//!
//! Bands are applied in a fixed order (length, keywords, readability,
//! sentence length) and each contributes one rationale fragment.

use crate::analysis::AnalysisMetrics;
use crate::config::{MAX_SCORE, PASS_THRESHOLD};

/// Points awarded by the keyword band never exceed this.
pub const KEYWORD_POINTS_CAP: usize = 3;

/// Score and the rationale fragments that produced it, in band order
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: f64,
    pub rationale: Vec<String>,
}

impl ScoreCard {
    pub fn passed(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }

    pub fn summary(&self) -> String {
        self.rationale.join("; ")
    }
}

pub fn length_band(word_count: usize) -> (f64, &'static str) {
    if word_count >= 400 {
        (4.0, "Strong word count")
    } else if word_count >= 250 {
        (3.0, "Adequate length")
    } else if word_count >= 150 {
        (2.0, "Short but usable response")
    } else {
        (1.0, "Response is very brief")
    }
}

pub fn keyword_band(keyword_hits: usize) -> (f64, &'static str) {
    let points = keyword_hits.min(KEYWORD_POINTS_CAP) as f64;
    let comment = match keyword_hits {
        0 => "Consider referencing rubric terms",
        1 | 2 => "Some rubric vocabulary present",
        _ => "Incorporates rubric vocabulary",
    };
    (points, comment)
}

pub fn readability_band(reading_ease: f64) -> (f64, &'static str) {
    if (40.0..=80.0).contains(&reading_ease) {
        (2.0, "Readable sentence structure")
    } else {
        (0.0, "Sentence complexity outside ideal range")
    }
}

pub fn sentence_length_band(avg_sentence_length: f64) -> (f64, &'static str) {
    if (12.0..=24.0).contains(&avg_sentence_length) {
        (1.0, "Balanced sentence length")
    } else {
        (0.0, "Vary sentence lengths for clarity")
    }
}

/// Score metrics against the fixed bands, clamped to [`MAX_SCORE`]
pub fn score(metrics: &AnalysisMetrics) -> ScoreCard {
    let bands = [
        length_band(metrics.word_count),
        keyword_band(metrics.keyword_hits),
        readability_band(metrics.reading_ease),
        sentence_length_band(metrics.avg_sentence_length),
    ];

    let total: f64 = bands.iter().map(|(points, _)| points).sum();
    let rationale = bands.iter().map(|(_, comment)| comment.to_string()).collect();

    ScoreCard {
        score: total.clamp(0.0, MAX_SCORE),
        rationale,
    }
}
