use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::AnalysisMetrics;
use crate::config::RubricConfig;

/// Only the first tokens are syllabified to bound cost on huge inputs
pub const SYLLABLE_TOKEN_CAP: usize = 2000;

pub const PREVIEW_MAX_LINES: usize = 5;
pub const PREVIEW_MAX_CHARS: usize = 400;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w']+").expect("word pattern"));
static SENTENCE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence break pattern"));
static VOWEL_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").expect("vowel pattern"));
// Unicode line boundaries, `\r\n` matched before a lone `\r`
static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]").expect("line break pattern")
});

/// Metrics plus the preview shown alongside a grade
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    pub metrics: AnalysisMetrics,
    pub preview: String,
}

/// Computes [`AnalysisMetrics`] against a fixed rubric vocabulary
#[derive(Debug, Clone)]
pub struct LexicalAnalyzer {
    keywords: Vec<String>,
}

impl LexicalAnalyzer {
    pub fn new(rubric: &RubricConfig) -> Self {
        let mut seen = HashSet::new();
        let keywords: Vec<String> = rubric
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn analyze(&self, text: &str) -> TextAnalysis {
        let tokens = tokenize(text);
        let word_count = tokens.len();
        let sentence_count = split_sentences(text).len();

        let avg_sentence_length = if sentence_count > 0 {
            round2(word_count as f64 / sentence_count as f64)
        } else {
            0.0
        };

        let capped = &tokens[..tokens.len().min(SYLLABLE_TOKEN_CAP)];
        let syllables = estimate_syllables(capped);
        let reading_ease = round2(reading_ease(word_count, sentence_count, syllables));

        let metrics = AnalysisMetrics {
            word_count,
            sentence_count,
            avg_sentence_length,
            keyword_hits: self.keyword_hits(text),
            reading_ease,
        };

        TextAnalysis {
            metrics,
            preview: preview(text),
        }
    }

    /// Number of distinct keywords present anywhere in the text
    pub fn keyword_hits(&self, text: &str) -> usize {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .count()
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new(&RubricConfig::default())
    }
}

pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Split after `.`, `!` or `?` followed by whitespace, dropping empty fragments
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK_RE.find_iter(text) {
        // punctuation is a single byte
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences.retain(|s| !s.is_empty());
    sentences
}

pub fn count_syllables(token: &str) -> usize {
    let letters: String = token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }
    VOWEL_RUN_RE.find_iter(&letters).count().max(1)
}

pub fn estimate_syllables(tokens: &[&str]) -> usize {
    tokens.iter().map(|t| count_syllables(t)).sum()
}

/// Flesch reading ease, with word and sentence counts floored at 1
pub fn reading_ease(words: usize, sentences: usize, syllables: usize) -> f64 {
    let words = words.max(1) as f64;
    let sentences = sentences.max(1) as f64;
    206.835 - 1.015 * (words / sentences) - 84.6 * (syllables as f64 / words)
}

/// First non-empty lines of the trimmed text, capped in characters after joining
pub fn preview(text: &str) -> String {
    let joined = LINE_BREAK_RE
        .split(text.trim())
        .filter(|line| !line.trim().is_empty())
        .take(PREVIEW_MAX_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    joined.chars().take(PREVIEW_MAX_CHARS).collect()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
